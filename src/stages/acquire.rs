//! Source Acquisition: check out the exact ref named by the event.

use super::CHECKOUT_TOOL;
use crate::config::RunConfig;
use crate::error::AcquisitionError;
use crate::event::ReleaseEvent;
use crate::process::{CommandRunner, CommandSpec};
use std::path::PathBuf;

/// Fetch the release ref into the configured working directory
///
/// A shallow clone of the tag is enough: the pipeline never walks history,
/// it only needs the tree the release was cut from.
pub async fn acquire<R: CommandRunner>(
    config: &RunConfig,
    event: &ReleaseEvent,
    runner: &R,
) -> Result<PathBuf, AcquisitionError> {
    runner
        .locate(CHECKOUT_TOOL)
        .map_err(|_| AcquisitionError::ToolNotFound {
            tool: CHECKOUT_TOOL.to_string(),
        })?;

    prepare_workdir(config)?;

    let spec = CommandSpec::new(CHECKOUT_TOOL)
        .args(["clone", "--depth", "1", "--branch"])
        .arg(event.reference())
        .arg(event.clone_url())
        .arg(config.workdir.to_string_lossy().into_owned());

    let output = runner
        .run(&spec)
        .await
        .map_err(|e| AcquisitionError::FetchFailed {
            repository: event.clone_url().to_string(),
            reference: event.reference().to_string(),
            diagnostic: e.to_string(),
        })?;

    if !output.success {
        return Err(AcquisitionError::FetchFailed {
            repository: event.clone_url().to_string(),
            reference: event.reference().to_string(),
            diagnostic: output.diagnostic(),
        });
    }

    Ok(config.workdir.clone())
}

/// The clone target must be absent or an empty directory
fn prepare_workdir(config: &RunConfig) -> Result<(), AcquisitionError> {
    let workdir = &config.workdir;

    if workdir.exists() {
        let mut entries =
            std::fs::read_dir(workdir).map_err(|e| AcquisitionError::WorkdirUnavailable {
                path: workdir.clone(),
                reason: e.to_string(),
            })?;
        if entries.next().is_some() {
            return Err(AcquisitionError::WorkdirUnavailable {
                path: workdir.clone(),
                reason: "directory is not empty".to_string(),
            });
        }
        return Ok(());
    }

    if let Some(parent) = workdir.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AcquisitionError::WorkdirUnavailable {
            path: workdir.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn nonempty_workdir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("leftover"), b"x").unwrap();

        let config = RunConfig::new(dir.path().to_path_buf());
        let err = prepare_workdir(&config).unwrap_err();
        assert!(matches!(err, AcquisitionError::WorkdirUnavailable { .. }));
    }

    #[test]
    fn absent_workdir_is_acceptable() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(dir.path().join("checkout"));
        prepare_workdir(&config).unwrap();
        assert!(!config.workdir.exists());
    }

    #[test]
    fn empty_workdir_is_acceptable() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(PathBuf::from(dir.path()));
        prepare_workdir(&config).unwrap();
    }
}
