//! Release event payload parsing.
//!
//! The pipeline is triggered by exactly one kind of event: a release marked
//! published upstream. The forge delivers the event as a JSON payload file;
//! this module reads it and decides whether the run activates at all.

use crate::error::{EventError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Event action value that activates the pipeline
pub const PUBLISHED_ACTION: &str = "published";

/// A release event as delivered by the forge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseEvent {
    /// Event action ("published", "created", "deleted", ...)
    pub action: String,
    /// The release the event refers to
    pub release: ReleaseInfo,
    /// The repository the release belongs to
    pub repository: RepositoryInfo,
}

/// Release portion of the event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Tag the release was cut from (e.g. "v1.2.0")
    pub tag_name: String,
    /// Human-readable release name, if set
    #[serde(default)]
    pub name: Option<String>,
}

/// Repository portion of the event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// "owner/name" form
    pub full_name: String,
    /// HTTPS clone URL
    pub clone_url: String,
}

impl ReleaseEvent {
    /// Load an event payload from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EventError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse an event payload from a JSON string
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| {
            EventError::Malformed {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Whether this event activates the pipeline
    ///
    /// Only "release published" does; every other action is a clean no-op.
    pub fn is_published(&self) -> bool {
        self.action == PUBLISHED_ACTION
    }

    /// Release ref to check out
    pub fn reference(&self) -> &str {
        &self.release.tag_name
    }

    /// Clone URL of the repository
    pub fn clone_url(&self) -> &str {
        &self.repository.clone_url
    }

    /// "owner/name" of the repository
    pub fn repository_name(&self) -> &str {
        &self.repository.full_name
    }
}
