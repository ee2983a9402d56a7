//! Publish: upload the artifact set to the package index.
//!
//! The two secret credentials are resolved from the environment here and
//! injected into the upload command's environment only. They never enter the
//! runner's own environment and never appear in logs or errors.

use super::BUILD_TOOL;
use crate::config::{Credentials, RunConfig};
use crate::error::PublishError;
use crate::pipeline::ArtifactSet;
use crate::process::{CommandRunner, CommandSpec};
use std::path::Path;

/// Upload every artifact from this run's build to the index
///
/// Index-side versioning policy is the index's own: a duplicate-version
/// rejection comes back as `AlreadyPublished`, never as silent success.
pub async fn publish<R: CommandRunner>(
    config: &RunConfig,
    runner: &R,
    working_copy: &Path,
    artifacts: &ArtifactSet,
) -> Result<(), PublishError> {
    let credentials = Credentials::resolve(config)?;

    let mut spec = CommandSpec::new(BUILD_TOOL)
        .arg("publish")
        .current_dir(working_copy)
        .env(&config.username_var, credentials.username())
        .env(&config.token_var, credentials.token());

    if let Some(index_url) = &config.index_url {
        spec = spec.args(["--publish-url", index_url.as_str()]);
    }

    for path in artifacts.paths() {
        spec = spec.arg(path.to_string_lossy().into_owned());
    }

    let output = runner
        .run(&spec)
        .await
        .map_err(|e| PublishError::ToolFailed {
            diagnostic: e.to_string(),
        })?;

    if !output.success {
        return Err(classify_failure(&output.diagnostic()));
    }

    Ok(())
}

/// Map the upload tool's diagnostics onto the publish error taxonomy
fn classify_failure(diagnostic: &str) -> PublishError {
    let lowered = diagnostic.to_lowercase();

    if lowered.contains("already exists") || lowered.contains("409") {
        return PublishError::AlreadyPublished {
            diagnostic: diagnostic.to_string(),
        };
    }

    if lowered.contains("401")
        || lowered.contains("403")
        || lowered.contains("unauthorized")
        || lowered.contains("forbidden")
        || lowered.contains("invalid or non-existent authentication")
    {
        return PublishError::AuthenticationFailed {
            diagnostic: diagnostic.to_string(),
        };
    }

    PublishError::ToolFailed {
        diagnostic: diagnostic.to_string(),
    }
}
