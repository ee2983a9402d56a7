//! Cache Cleanup: prune the tool cache populated during this run.
//!
//! `--ci` scopes the prune to what non-interactive runs can safely drop.
//! The stage is still a required stage: its failure fails the run, even
//! though the publish outcome already stands.

use super::BUILD_TOOL;
use crate::config::RunConfig;
use crate::error::CleanupError;
use crate::process::{CommandRunner, CommandSpec};

/// Prune cache entries accumulated by provisioning and building
pub async fn cleanup<R: CommandRunner>(
    _config: &RunConfig,
    runner: &R,
) -> Result<(), CleanupError> {
    let spec = CommandSpec::new(BUILD_TOOL).args(["cache", "prune", "--ci"]);

    let output = runner
        .run(&spec)
        .await
        .map_err(|e| CleanupError::ToolFailed {
            diagnostic: e.to_string(),
        })?;

    if !output.success {
        return Err(CleanupError::ToolFailed {
            diagnostic: output.diagnostic(),
        });
    }

    Ok(())
}
