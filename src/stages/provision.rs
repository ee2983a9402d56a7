//! Toolchain Provisioning: verify the build tool pin, install the runtime.
//!
//! The worker image is expected to carry the pinned `uv` already; this stage
//! verifies the pin rather than installing the tool. The language runtime is
//! whatever the repository's version file declares, installed through the
//! build tool itself.

use super::BUILD_TOOL;
use crate::config::RunConfig;
use crate::error::ProvisioningError;
use crate::pipeline::ResolvedToolchain;
use crate::process::{CommandRunner, CommandSpec};
use std::path::Path;

/// Verify the pinned build tool and install the pinned runtime
pub async fn provision<R: CommandRunner>(
    config: &RunConfig,
    runner: &R,
    working_copy: &Path,
) -> Result<ResolvedToolchain, ProvisioningError> {
    runner
        .locate(BUILD_TOOL)
        .map_err(|_| ProvisioningError::ToolNotFound {
            tool: BUILD_TOOL.to_string(),
        })?;

    let uv_version = check_tool_pin(config, runner).await?;
    let runtime_version = read_runtime_pin(config, working_copy)?;
    install_runtime(runner, working_copy, &runtime_version).await?;

    Ok(ResolvedToolchain {
        uv_version,
        runtime_version,
    })
}

async fn check_tool_pin<R: CommandRunner>(
    config: &RunConfig,
    runner: &R,
) -> Result<semver::Version, ProvisioningError> {
    let spec = CommandSpec::new(BUILD_TOOL).arg("--version");
    let output = runner
        .run(&spec)
        .await
        .map_err(|e| ProvisioningError::VersionUnreadable {
            diagnostic: e.to_string(),
        })?;

    if !output.success {
        return Err(ProvisioningError::VersionUnreadable {
            diagnostic: output.diagnostic(),
        });
    }

    let found = parse_reported_version(&output.stdout).ok_or_else(|| {
        ProvisioningError::VersionUnreadable {
            diagnostic: output.stdout.trim().to_string(),
        }
    })?;

    let pinned = semver::Version::parse(&config.uv_version).map_err(|e| {
        ProvisioningError::VersionUnreadable {
            diagnostic: format!("pinned version '{}' is invalid: {e}", config.uv_version),
        }
    })?;

    if found != pinned {
        return Err(ProvisioningError::VersionMismatch {
            pinned: pinned.to_string(),
            found: found.to_string(),
        });
    }

    Ok(found)
}

/// Parse the version out of the tool's banner line, e.g. `uv 0.9.11 (abc 2025-01-01)`
fn parse_reported_version(stdout: &str) -> Option<semver::Version> {
    let token = stdout.split_whitespace().nth(1)?;
    semver::Version::parse(token).ok()
}

fn read_runtime_pin(
    config: &RunConfig,
    working_copy: &Path,
) -> Result<String, ProvisioningError> {
    let path = config.runtime_pin_path(working_copy);
    if !path.is_file() {
        return Err(ProvisioningError::RuntimePinMissing { path });
    }

    let contents =
        std::fs::read_to_string(&path).map_err(|_| ProvisioningError::RuntimePinMissing {
            path: path.clone(),
        })?;

    let version = contents.trim();
    if version.is_empty() {
        return Err(ProvisioningError::RuntimePinMissing { path });
    }

    Ok(version.to_string())
}

async fn install_runtime<R: CommandRunner>(
    runner: &R,
    working_copy: &Path,
    version: &str,
) -> Result<(), ProvisioningError> {
    let spec = CommandSpec::new(BUILD_TOOL)
        .args(["python", "install"])
        .arg(version)
        .current_dir(working_copy);

    let output = runner
        .run(&spec)
        .await
        .map_err(|e| ProvisioningError::RuntimeInstallFailed {
            version: version.to_string(),
            diagnostic: e.to_string(),
        })?;

    if !output.success {
        return Err(ProvisioningError::RuntimeInstallFailed {
            version: version.to_string(),
            diagnostic: output.diagnostic(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_from_banner() {
        let v = parse_reported_version("uv 0.9.11 (a1b2c3d 2025-06-01)").unwrap();
        assert_eq!(v, semver::Version::new(0, 9, 11));
    }

    #[test]
    fn parses_bare_banner() {
        let v = parse_reported_version("uv 0.5.2\n").unwrap();
        assert_eq!(v, semver::Version::new(0, 5, 2));
    }

    #[test]
    fn rejects_garbage_banner() {
        assert!(parse_reported_version("not a version line").is_none());
        assert!(parse_reported_version("").is_none());
    }

    #[test]
    fn runtime_pin_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".python-version"), "3.12\n").unwrap();

        let config = RunConfig::new(dir.path().to_path_buf());
        let version = read_runtime_pin(&config, dir.path()).unwrap();
        assert_eq!(version, "3.12");
    }

    #[test]
    fn missing_runtime_pin_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(dir.path().to_path_buf());
        let err = read_runtime_pin(&config, dir.path()).unwrap_err();
        assert!(matches!(err, ProvisioningError::RuntimePinMissing { .. }));
    }

    #[test]
    fn blank_runtime_pin_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".python-version"), "  \n").unwrap();

        let config = RunConfig::new(dir.path().to_path_buf());
        let err = read_runtime_pin(&config, dir.path()).unwrap_err();
        assert!(matches!(err, ProvisioningError::RuntimePinMissing { .. }));
    }
}
