//! Background processing of a single archive job.

use chronarc_catalog::Catalog;
use chronarc_pack::{EntryFailure, PackEngine, PackProgress, panic_message};
use chronarc_types::TimeRange;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::{ArchiveJob, ArtifactStore, JobId, JobRegistry, ProcessError};

/// Everything a job needs to run, cheap to clone into a spawned task.
#[derive(Clone)]
pub(crate) struct Worker {
    pub(crate) registry: Arc<JobRegistry>,
    pub(crate) catalog: Arc<dyn Catalog>,
    pub(crate) engine: PackEngine,
    pub(crate) artifacts: ArtifactStore,
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("engine", &self.engine)
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}

/// Mirrors per-entry progress into the job record.
struct RegistryProgress<'a> {
    registry: &'a JobRegistry,
    id: JobId,
}

impl PackProgress for RegistryProgress<'_> {
    fn entry_written(&self, _archive_name: &str) {
        if let Err(e) = self.registry.update(self.id, ArchiveJob::record_written) {
            tracing::warn!(job_id = %self.id, error = %e, "Dropped progress update");
        }
    }
}

impl Worker {
    /// Runs the job to a terminal status.
    ///
    /// Errors and panics inside processing are caught and recorded on the
    /// job, so it never stays `Processing` after this returns.
    pub(crate) async fn run(&self, id: JobId, range: TimeRange) {
        let outcome = AssertUnwindSafe(self.process(id, range))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.fail(id, format!("Processing failed: {e}")),
            Err(panic) => self.fail(
                id,
                format!("Processing failed: worker panicked: {}", panic_message(&*panic)),
            ),
        }
    }

    /// Records an unrecoverable failure on a job that is not yet terminal.
    pub(crate) fn fail(&self, id: JobId, message: String) {
        tracing::error!(job_id = %id, error = %message, "Archive job failed");
        match self.registry.update(id, |job| job.mark_failed([message])) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(job_id = %id, error = %e, "Could not record failure"),
            Err(e) => tracing::error!(job_id = %id, error = %e, "Could not record failure"),
        }
    }

    async fn process(&self, id: JobId, range: TimeRange) -> Result<(), ProcessError> {
        self.registry.update(id, ArchiveJob::mark_processing)??;
        tracing::info!(job_id = %id, %range, "Processing archive job");

        let entries = self.catalog.query_by_time_range(&range).await?;
        let total = entries.len();
        self.registry
            .update(id, |job| job.set_entries_total(total))?;

        let path = self.artifacts.path_for(id);
        let progress = RegistryProgress {
            registry: &self.registry,
            id,
        };
        let report = self
            .engine
            .pack_with_progress(entries, &path, &progress)
            .await?;

        let warnings: Vec<String> = report.skipped.iter().map(EntryFailure::message).collect();
        let mut errors: Vec<String> = report.failures.iter().map(EntryFailure::message).collect();
        if errors.is_empty() && report.archived_nothing() {
            errors.push(format!(
                "No entries archived out of {} candidates",
                report.candidates
            ));
        }

        let failed = !errors.is_empty();
        self.registry.update(id, |job| {
            job.add_warnings(warnings);
            if failed {
                job.mark_failed(errors)
            } else {
                job.mark_completed()
            }
        })??;

        if failed {
            tracing::warn!(
                job_id = %id,
                written = report.written_count(),
                failed = report.failures.len(),
                elapsed_ms = report.elapsed.as_millis() as u64,
                "Archive job finished with errors"
            );
        } else {
            tracing::info!(
                job_id = %id,
                written = report.written_count(),
                skipped = report.skipped.len(),
                archive_bytes = report.archive_bytes,
                elapsed_ms = report.elapsed.as_millis() as u64,
                archive = %path.display(),
                "Archive job completed"
            );
        }
        Ok(())
    }
}
