//! The five stage operations.
//!
//! Each stage is an async function over the shared `CommandRunner` seam,
//! returning a typed per-stage error on failure. The external tools are
//! opaque: success is a zero exit, everything else is that stage's error
//! carrying the tool's diagnostic output.

mod acquire;
mod build;
mod cleanup;
mod provision;
mod publish;

pub use acquire::acquire;
pub use build::build;
pub use cleanup::cleanup;
pub use provision::provision;
pub use publish::publish;

/// Checkout tool binary name
pub const CHECKOUT_TOOL: &str = "git";

/// Build/upload tool binary name
pub const BUILD_TOOL: &str = "uv";
