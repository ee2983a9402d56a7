//! Error types for the release pipeline.
//!
//! One error enum per stage, each carrying the failing tool's diagnostic
//! output, plus an umbrella error for everything that crosses the CLI
//! boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PublisherError>;

/// Umbrella error type for all pipeline operations
#[derive(Error, Debug)]
pub enum PublisherError {
    /// Source acquisition stage errors
    #[error("Acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// Toolchain provisioning stage errors
    #[error("Provisioning error: {0}")]
    Provisioning(#[from] ProvisioningError),

    /// Build stage errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Publish stage errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// Cache cleanup stage errors
    #[error("Cleanup error: {0}")]
    Cleanup(#[from] CleanupError),

    /// Trigger event errors
    #[error("Event error: {0}")]
    Event(#[from] EventError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal sequencing errors (a stage ran before its input existed)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Source acquisition errors
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// Checkout tool not present on the worker
    #[error("Checkout tool '{tool}' not found on this worker")]
    ToolNotFound {
        /// Tool binary name
        tool: String,
    },

    /// Clone of the release ref failed
    #[error("Failed to fetch '{reference}' from {repository}: {diagnostic}")]
    FetchFailed {
        /// Repository clone URL
        repository: String,
        /// Release ref that was requested
        reference: String,
        /// Tool diagnostic output
        diagnostic: String,
    },

    /// Working directory could not be prepared
    #[error("Cannot prepare working directory {path}: {reason}")]
    WorkdirUnavailable {
        /// Working directory path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Toolchain provisioning errors
#[derive(Error, Debug)]
pub enum ProvisioningError {
    /// Build tool not present on the worker
    #[error("Build tool '{tool}' not found on this worker")]
    ToolNotFound {
        /// Tool binary name
        tool: String,
    },

    /// Build tool version output could not be parsed
    #[error("Cannot read build tool version: {diagnostic}")]
    VersionUnreadable {
        /// Raw version output or tool diagnostic
        diagnostic: String,
    },

    /// Installed build tool does not match the pin
    #[error("Build tool version {found} does not match pinned version {pinned}")]
    VersionMismatch {
        /// Pinned version string
        pinned: String,
        /// Version actually installed
        found: String,
    },

    /// Runtime version pin file missing from the working copy
    #[error("Runtime version file not found at {path}")]
    RuntimePinMissing {
        /// Expected pin file path
        path: PathBuf,
    },

    /// Runtime installation failed
    #[error("Failed to install runtime {version}: {diagnostic}")]
    RuntimeInstallFailed {
        /// Runtime version that was requested
        version: String,
        /// Tool diagnostic output
        diagnostic: String,
    },
}

/// Build stage errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Build tool exited nonzero
    #[error("Build failed: {diagnostic}")]
    ToolFailed {
        /// Tool diagnostic output
        diagnostic: String,
    },

    /// Output directory could not be read after the build
    #[error("Cannot read build output directory {path}: {reason}")]
    OutputUnreadable {
        /// Output directory path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Publish stage errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// Required credential variable absent from the environment
    #[error("Missing credential: environment variable '{variable}' is not set")]
    MissingCredentials {
        /// Name of the missing variable
        variable: String,
    },

    /// Index rejected the supplied credentials
    #[error("Package index rejected the credentials: {diagnostic}")]
    AuthenticationFailed {
        /// Tool diagnostic output
        diagnostic: String,
    },

    /// Index already holds this version
    #[error("Version already published to the index: {diagnostic}")]
    AlreadyPublished {
        /// Tool diagnostic output
        diagnostic: String,
    },

    /// Upload tool exited nonzero for any other reason
    #[error("Upload failed: {diagnostic}")]
    ToolFailed {
        /// Tool diagnostic output
        diagnostic: String,
    },
}

/// Cache cleanup errors
#[derive(Error, Debug)]
pub enum CleanupError {
    /// Cache prune exited nonzero
    #[error("Cache prune failed: {diagnostic}")]
    ToolFailed {
        /// Tool diagnostic output
        diagnostic: String,
    },
}

/// Trigger event errors
#[derive(Error, Debug)]
pub enum EventError {
    /// Event payload file missing
    #[error("Event payload not found at {path}")]
    NotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// Event payload could not be parsed
    #[error("Malformed event payload: {reason}")]
    Malformed {
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Report could not be written
    #[error("Failed to write run report to {path}: {reason}")]
    ReportWriteFailed {
        /// Report path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

impl PublisherError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PublisherError::Acquisition(AcquisitionError::ToolNotFound { tool })
            | PublisherError::Provisioning(ProvisioningError::ToolNotFound { tool }) => vec![
                format!("Install '{tool}' on the worker image"),
                format!("Verify '{tool}' is on PATH for the pipeline user"),
            ],
            PublisherError::Provisioning(ProvisioningError::VersionMismatch { pinned, .. }) => {
                vec![
                    format!("Install build tool version {pinned} on the worker image"),
                    "Update the pin with --uv-version if the new version is intended".to_string(),
                ]
            }
            PublisherError::Publish(PublishError::MissingCredentials { variable }) => vec![
                format!("Export {variable} in the worker environment"),
                "Check the secret injection configuration of the host scheduler".to_string(),
            ],
            PublisherError::Publish(PublishError::AuthenticationFailed { .. }) => vec![
                "Verify the upload identity and token are current".to_string(),
                "Rotate the index token if it has expired".to_string(),
            ],
            PublisherError::Publish(PublishError::AlreadyPublished { .. }) => vec![
                "Bump the package version and raise a new release event".to_string(),
                "Package indexes do not allow re-uploading an existing version".to_string(),
            ],
            PublisherError::Event(EventError::NotFound { .. }) => vec![
                "Pass --event with the payload path delivered by the trigger".to_string(),
            ],
            _ => vec!["Check the diagnostic output above for details".to_string()],
        }
    }
}
