//! Job dispatch and status/artifact queries.

use chronarc_catalog::{Catalog, SourceStore};
use chronarc_pack::PackEngine;
use chronarc_types::TimeRange;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::worker::Worker;
use crate::{
    AccessError, ArchiveJob, ArtifactError, ArtifactStore, DispatchError, DispatchMode, JobId,
    JobRegistry, JobStatus, ManagerConfig,
};

/// Completion of a background job task, awaitable from any number of waiters.
type TaskDone = Shared<BoxFuture<'static, Result<(), String>>>;

/// Starts archive jobs and answers questions about them.
///
/// Each accepted request gets a fresh [`JobId`] and a `Pending` record in the
/// registry before [`start_archive`](Self::start_archive) returns. In
/// [`DispatchMode::Background`] the job then runs on the tokio runtime while
/// the caller polls [`job_status`](Self::job_status) or
/// [`artifact_path`](Self::artifact_path).
///
/// # Example
///
/// ```no_run
/// use chronarc_catalog::{LocalStore, ManifestCatalog};
/// use chronarc_jobs::{ArchiveManager, ManagerConfig};
/// use chronarc_types::TimeRange;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = Arc::new(ManifestCatalog::load("images.json")?);
/// let manager = ArchiveManager::new(
///     ManagerConfig::default(),
///     catalog,
///     Arc::new(LocalStore::new()),
/// )?;
///
/// let range = TimeRange::parse("2024-01-01", "2024-01-31")?;
/// let id = manager.start_archive(range).await?;
/// let job = manager.wait(id).await?;
/// println!("{} -> {}", job.id(), job.status());
/// # Ok(())
/// # }
/// ```
pub struct ArchiveManager {
    worker: Worker,
    mode: DispatchMode,
    limit: usize,
    slots: Arc<Semaphore>,
    tasks: Arc<Mutex<HashMap<JobId, TaskDone>>>,
}

impl std::fmt::Debug for ArchiveManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveManager")
            .field("worker", &self.worker)
            .field("mode", &self.mode)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl ArchiveManager {
    /// Creates a manager with its own, empty job registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive directory cannot be created.
    pub fn new(
        config: ManagerConfig,
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn SourceStore>,
    ) -> Result<Self, ArtifactError> {
        Self::with_registry(config, Arc::new(JobRegistry::new()), catalog, store)
    }

    /// Creates a manager that records jobs in `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive directory cannot be created.
    pub fn with_registry(
        config: ManagerConfig,
        registry: Arc<JobRegistry>,
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn SourceStore>,
    ) -> Result<Self, ArtifactError> {
        let artifacts = ArtifactStore::new(&config.archive_dir)?;
        let limit = config.effective_max_active_jobs();

        Ok(Self {
            worker: Worker {
                registry,
                catalog,
                engine: PackEngine::new(store, config.pack),
                artifacts,
            },
            mode: config.mode,
            limit,
            slots: Arc::new(Semaphore::new(limit)),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Returns the job registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.worker.registry
    }

    /// Returns the archive store.
    #[must_use]
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.worker.artifacts
    }

    /// Returns how many more jobs can be started right now.
    #[must_use]
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Registers an archive job for `range` and starts processing it.
    ///
    /// In background mode this returns as soon as the job is registered. In
    /// inline mode it returns after the job reached a terminal status.
    /// Processing failures never surface here; they are recorded on the job.
    ///
    /// # Errors
    ///
    /// Returns an error if too many jobs are active, or if background mode is
    /// used outside a tokio runtime. No job is registered in either case.
    pub async fn start_archive(&self, range: TimeRange) -> Result<JobId, DispatchError> {
        let permit = Arc::clone(&self.slots)
            .try_acquire_owned()
            .map_err(|_| DispatchError::Saturated { limit: self.limit })?;

        let runtime = match self.mode {
            DispatchMode::Background => {
                Some(Handle::try_current().map_err(|_| DispatchError::NoRuntime)?)
            }
            DispatchMode::Inline => None,
        };

        let id = self.register(range);
        tracing::info!(job_id = %id, %range, mode = ?self.mode, "Archive job accepted");

        match runtime {
            Some(runtime) => {
                let worker = self.worker.clone();
                let tasks = Arc::clone(&self.tasks);
                // Held across spawn so the task's own removal cannot precede the insert.
                let mut pending = self.tasks.lock();
                let handle = runtime.spawn(async move {
                    let _permit = permit;
                    worker.run(id, range).await;
                    tasks.lock().remove(&id);
                });
                let done = handle
                    .map(|joined| joined.map_err(|e| e.to_string()))
                    .boxed()
                    .shared();
                pending.insert(id, done);
            }
            None => {
                self.worker.run(id, range).await;
                drop(permit);
            }
        }

        Ok(id)
    }

    /// Returns a snapshot of the job with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if no such job is registered.
    pub fn job(&self, id: JobId) -> Result<ArchiveJob, AccessError> {
        self.worker
            .registry
            .get(id)
            .ok_or(AccessError::NotFound(id))
    }

    /// Returns the status and recorded errors of the job with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if no such job is registered.
    pub fn job_status(&self, id: JobId) -> Result<(JobStatus, Vec<String>), AccessError> {
        let job = self.job(id)?;
        Ok((job.status(), job.errors().to_vec()))
    }

    /// Returns snapshots of all known jobs, newest first.
    #[must_use]
    pub fn jobs(&self) -> Vec<ArchiveJob> {
        self.worker.registry.snapshot()
    }

    /// Returns the archive path of a completed job.
    ///
    /// # Errors
    ///
    /// Returns an error if the job is unknown, has not completed successfully,
    /// or its archive no longer exists.
    pub fn artifact_path(&self, id: JobId) -> Result<PathBuf, AccessError> {
        let job = self.job(id)?;
        if job.status() != JobStatus::Completed {
            return Err(AccessError::NotReady {
                id,
                status: job.status(),
            });
        }

        let path = self.worker.artifacts.path_for(id);
        if !path.is_file() {
            return Err(AccessError::MissingArtifact { id, path });
        }
        Ok(path)
    }

    /// Waits for the background task of job `id` and returns its final snapshot.
    ///
    /// Any number of callers may wait on the same job; all of them return
    /// after the task finished. Returns immediately for jobs without a
    /// running task.
    ///
    /// # Errors
    ///
    /// Returns an error if no such job is registered.
    pub async fn wait(&self, id: JobId) -> Result<ArchiveJob, AccessError> {
        let done = self.tasks.lock().get(&id).cloned();
        if let Some(done) = done {
            self.join(id, done).await;
        }
        self.job(id)
    }

    /// Waits for every background task started so far.
    pub async fn wait_all(&self) {
        let pending: Vec<(JobId, TaskDone)> = self
            .tasks
            .lock()
            .iter()
            .map(|(id, done)| (*id, done.clone()))
            .collect();
        for (id, done) in pending {
            self.join(id, done).await;
        }
    }

    async fn join(&self, id: JobId, done: TaskDone) {
        if let Err(e) = done.await {
            self.tasks.lock().remove(&id);
            let unfinished = self
                .worker
                .registry
                .get(id)
                .is_some_and(|job| !job.is_finished());
            if unfinished {
                self.worker.fail(id, format!("Processing task failed: {e}"));
            }
        }
    }

    fn register(&self, range: TimeRange) -> JobId {
        self.register_with(range, Uuid::new_v4)
    }

    fn register_with(&self, range: TimeRange, mut next_id: impl FnMut() -> JobId) -> JobId {
        loop {
            let job = ArchiveJob::new(next_id(), range);
            let id = job.id();
            if self.worker.registry.create(job) {
                return id;
            }
            tracing::warn!(job_id = %id, "Job id collision, retrying");
        }
    }
}
