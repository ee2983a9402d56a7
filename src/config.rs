//! Immutable run configuration and publish credentials.
//!
//! One `RunConfig` is built at run start from CLI arguments plus defaults
//! and passed by reference to every stage. Nothing reads pinned versions or
//! secrets from ambient global state.

use crate::error::PublishError;
use std::path::{Path, PathBuf};

/// Build tool version the pipeline is pinned to
pub const DEFAULT_UV_VERSION: &str = "0.9.11";

/// File in the working copy that pins the language runtime version
pub const RUNTIME_VERSION_FILE: &str = ".python-version";

/// Conventional build output directory, relative to the working copy
pub const OUTPUT_DIR: &str = "dist";

/// Environment variable carrying the upload identity
pub const USERNAME_VAR: &str = "UV_PUBLISH_USERNAME";

/// Environment variable carrying the upload token
pub const TOKEN_VAR: &str = "UV_PUBLISH_TOKEN";

/// Configuration for one pipeline run
///
/// Constructed once, never mutated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Exact build tool version the worker must provide
    pub uv_version: String,
    /// Runtime pin file name, relative to the working copy
    pub runtime_version_file: String,
    /// Build output directory name, relative to the working copy
    pub output_dir: String,
    /// Directory the release ref is checked out into
    pub workdir: PathBuf,
    /// Upload endpoint override; `None` means the index default
    pub index_url: Option<String>,
    /// Environment variable holding the upload identity
    pub username_var: String,
    /// Environment variable holding the upload token
    pub token_var: String,
}

impl RunConfig {
    /// Create a configuration with conventional defaults for the given workdir
    pub fn new(workdir: PathBuf) -> Self {
        Self {
            uv_version: DEFAULT_UV_VERSION.to_string(),
            runtime_version_file: RUNTIME_VERSION_FILE.to_string(),
            output_dir: OUTPUT_DIR.to_string(),
            workdir,
            index_url: None,
            username_var: USERNAME_VAR.to_string(),
            token_var: TOKEN_VAR.to_string(),
        }
    }

    /// Runtime pin file path inside a working copy
    pub fn runtime_pin_path(&self, working_copy: &Path) -> PathBuf {
        working_copy.join(&self.runtime_version_file)
    }

    /// Build output directory path inside a working copy
    pub fn output_dir_path(&self, working_copy: &Path) -> PathBuf {
        working_copy.join(&self.output_dir)
    }
}

/// Publish credentials: an upload identity and an upload token
///
/// Resolved from the environment inside the Publish stage only. Values are
/// redacted from `Debug` output and never serialized.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    token: String,
}

impl Credentials {
    /// Resolve both credential variables from the process environment
    pub fn resolve(config: &RunConfig) -> Result<Self, PublishError> {
        let username = read_secret(&config.username_var)?;
        let token = read_secret(&config.token_var)?;
        Ok(Self { username, token })
    }

    /// Upload identity
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Upload token
    pub fn token(&self) -> &str {
        &self.token
    }
}

fn read_secret(variable: &str) -> Result<String, PublishError> {
    match std::env::var(variable) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(PublishError::MissingCredentials {
            variable: variable.to_string(),
        }),
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}
