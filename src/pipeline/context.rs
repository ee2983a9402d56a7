//! Per-run context: what earlier stages produced for later ones.
//!
//! Everything here lives exactly as long as the run and is dropped with it;
//! nothing is persisted.

use crate::error::BuildError;
use std::path::{Path, PathBuf};

/// State accumulated by a single pipeline run
#[derive(Debug, Default)]
pub struct RunContext {
    /// Working copy checked out by the Acquisition stage
    pub working_copy: Option<PathBuf>,
    /// Tool and runtime versions resolved by the Provisioning stage
    pub toolchain: Option<ResolvedToolchain>,
    /// Artifacts produced by the Build stage
    pub artifacts: Option<ArtifactSet>,
}

impl RunContext {
    /// Create an empty context for a fresh run
    pub fn new() -> Self {
        Self::default()
    }
}

/// Versions selected by the Provisioning stage
#[derive(Debug, Clone)]
pub struct ResolvedToolchain {
    /// Build tool version actually installed on the worker
    pub uv_version: semver::Version,
    /// Runtime version read from the working copy's pin file
    pub runtime_version: String,
}

/// The build outputs of this run, owned by the run and read-only after Build
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    paths: Vec<PathBuf>,
}

impl ArtifactSet {
    /// Enumerate the output directory, non-recursively
    ///
    /// Regular files only; subdirectories are ignored. A missing directory
    /// yields an empty set (the upload tool decides what that means). Paths
    /// are sorted by file name so logs and uploads are deterministic.
    pub fn from_dir(dir: &Path) -> Result<Self, BuildError> {
        if !dir.exists() {
            return Ok(Self { paths: Vec::new() });
        }

        let entries = std::fs::read_dir(dir).map_err(|e| BuildError::OutputUnreadable {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BuildError::OutputUnreadable {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(Self { paths })
    }

    /// Number of artifacts
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the build produced nothing
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Artifact paths, sorted
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Artifact file names, for display
    pub fn file_names(&self) -> Vec<String> {
        self.paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_regular_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pkg-1.2.0.tar.gz"), b"sdist").unwrap();
        std::fs::write(dir.path().join("pkg-1.2.0-py3-none-any.whl"), b"wheel").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("ignored.whl"), b"x").unwrap();

        let set = ArtifactSet::from_dir(dir.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.file_names(),
            vec!["pkg-1.2.0-py3-none-any.whl", "pkg-1.2.0.tar.gz"]
        );
    }

    #[test]
    fn missing_directory_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let set = ArtifactSet::from_dir(&dir.path().join("dist")).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
