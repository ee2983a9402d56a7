//! # PyPI Release Runner
//!
//! Release-publishing pipeline: given a "release published" event, check out
//! the tagged source, provision the pinned toolchain, build the
//! distributable artifacts, upload them to the package index, and prune the
//! cache the run accumulated.
//!
//! Five stages, strictly ordered, fail-fast: a stage runs only if every
//! earlier stage succeeded, and nothing runs after a failure. There is no
//! retry, no resume, and no state that outlives the run.
//!
//! ## Usage
//!
//! ```bash
//! pypi_release_runner run --event "$RELEASE_EVENT_PATH"
//! pypi_release_runner plan
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod process;
pub mod stages;

// Re-export main types for the public API
pub use cli::{Args, OutputManager};
pub use config::{Credentials, RunConfig};
pub use error::{PublisherError, Result};
pub use event::ReleaseEvent;
pub use pipeline::{ArtifactSet, RunContext, RunReport, RunStatus, Stage, STAGES};
pub use process::{CapturedOutput, CommandRunner, CommandSpec, ProcessRunner};
