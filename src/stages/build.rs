//! Build: produce distributable artifacts into the output directory.

use super::BUILD_TOOL;
use crate::config::RunConfig;
use crate::error::BuildError;
use crate::pipeline::ArtifactSet;
use crate::process::{CommandRunner, CommandSpec};
use std::path::Path;

/// Run the build tool and enumerate what it produced
///
/// The artifact set is whatever regular files the tool left in the output
/// directory, non-recursively. Zero artifacts is not a build failure; the
/// Publish stage still runs and the upload tool decides what an empty set
/// means.
pub async fn build<R: CommandRunner>(
    config: &RunConfig,
    runner: &R,
    working_copy: &Path,
) -> Result<ArtifactSet, BuildError> {
    let spec = CommandSpec::new(BUILD_TOOL)
        .arg("build")
        .args(["--out-dir", &config.output_dir])
        .current_dir(working_copy);

    let output = runner.run(&spec).await.map_err(|e| BuildError::ToolFailed {
        diagnostic: e.to_string(),
    })?;

    if !output.success {
        return Err(BuildError::ToolFailed {
            diagnostic: output.diagnostic(),
        });
    }

    ArtifactSet::from_dir(&config.output_dir_path(working_copy))
}
