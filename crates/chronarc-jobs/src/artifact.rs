//! Archive locations on disk.

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ArtifactError, JobId};

/// Directory holding finished archives, one `{job_id}.zip` per job.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Opens the archive directory at `root`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ArtifactError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| ArtifactError::CreateDir {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    /// Returns the default archive directory.
    ///
    /// This is `archives` under the platform data directory, or
    /// `~/.chronarc/archives` when that cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "chronarc")
            .map_or_else(dirs_fallback, |proj_dirs| proj_dirs.data_dir().to_path_buf())
            .join("archives")
    }

    /// Returns the archive directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the archive path for a job.
    #[must_use]
    pub fn path_for(&self, id: JobId) -> PathBuf {
        self.root.join(format!("{id}.zip"))
    }

    /// Returns true if the archive for a job exists on disk.
    #[must_use]
    pub fn exists(&self, id: JobId) -> bool {
        self.path_for(id).is_file()
    }
}

fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".chronarc")
}
