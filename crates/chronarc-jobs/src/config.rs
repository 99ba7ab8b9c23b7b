//! Archive manager configuration.

use chronarc_pack::PackConfig;
use std::path::PathBuf;

use crate::ArtifactStore;

/// How the manager runs a job's worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Spawn the worker on the current tokio runtime and return immediately.
    #[default]
    Background,
    /// Run the worker to completion before returning the job id.
    Inline,
}

/// Configuration for [`ArchiveManager`](crate::ArchiveManager).
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Directory where finished archives are written.
    pub archive_dir: PathBuf,
    /// Maximum number of unfinished jobs; further requests are rejected.
    pub max_active_jobs: usize,
    /// Packaging settings applied to every job.
    pub pack: PackConfig,
    /// How workers are run.
    pub mode: DispatchMode,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            archive_dir: ArtifactStore::default_path(),
            max_active_jobs: 64,
            pack: PackConfig::default(),
            mode: DispatchMode::Background,
        }
    }
}

impl ManagerConfig {
    /// Sets the archive directory.
    #[must_use]
    pub fn with_archive_dir(mut self, archive_dir: impl Into<PathBuf>) -> Self {
        self.archive_dir = archive_dir.into();
        self
    }

    /// Sets the maximum number of unfinished jobs.
    #[must_use]
    pub fn with_max_active_jobs(mut self, max_active_jobs: usize) -> Self {
        self.max_active_jobs = max_active_jobs;
        self
    }

    /// Sets the packaging settings.
    #[must_use]
    pub fn with_pack(mut self, pack: PackConfig) -> Self {
        self.pack = pack;
        self
    }

    /// Sets the dispatch mode.
    #[must_use]
    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the job limit, never less than one.
    #[must_use]
    pub fn effective_max_active_jobs(&self) -> usize {
        self.max_active_jobs
            .clamp(1, tokio::sync::Semaphore::MAX_PERMITS)
    }
}
