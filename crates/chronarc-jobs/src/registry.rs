//! Concurrent in-memory job table.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::{ArchiveJob, JobId, RegistryError};

/// The set of known archive jobs, keyed by id.
///
/// Safe to share between the dispatching caller, background workers, and
/// status readers. Every read returns a clone, so a reader never observes a
/// record halfway through an update.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<JobId, ArchiveJob>,
}

impl JobRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `job` unless its id is already taken.
    ///
    /// Returns false, leaving the existing record untouched, on collision.
    pub fn create(&self, job: ArchiveJob) -> bool {
        match self.jobs.entry(job.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(job);
                true
            }
        }
    }

    /// Returns a snapshot of the job with `id`.
    #[must_use]
    pub fn get(&self, id: JobId) -> Option<ArchiveJob> {
        self.jobs.get(&id).map(|job| job.value().clone())
    }

    /// Returns true if a job with `id` is registered.
    #[must_use]
    pub fn contains(&self, id: JobId) -> bool {
        self.jobs.contains_key(&id)
    }

    /// Applies `f` to the job with `id` atomically with respect to other
    /// updates and reads of the same job.
    ///
    /// `f` runs while the job's shard is locked and must not call back into
    /// the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if no job with `id` is registered.
    pub fn update<R>(
        &self,
        id: JobId,
        f: impl FnOnce(&mut ArchiveJob) -> R,
    ) -> Result<R, RegistryError> {
        let mut job = self.jobs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        Ok(f(job.value_mut()))
    }

    /// Returns the number of registered jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if no job is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns the ids of all registered jobs, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<JobId> {
        self.jobs.iter().map(|job| *job.key()).collect()
    }

    /// Returns snapshots of all jobs, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ArchiveJob> {
        let mut jobs: Vec<ArchiveJob> = self.jobs.iter().map(|job| job.value().clone()).collect();
        jobs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        jobs
    }

    /// Returns snapshots of jobs that have not reached a terminal status.
    #[must_use]
    pub fn active(&self) -> Vec<ArchiveJob> {
        self.snapshot()
            .into_iter()
            .filter(|job| !job.is_finished())
            .collect()
    }
}
