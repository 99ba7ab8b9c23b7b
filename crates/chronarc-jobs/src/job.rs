//! Archive job definitions and types.

use chrono::{DateTime, TimeDelta, Utc};
use chronarc_types::TimeRange;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::JobError;

/// Unique identifier for an archive job.
pub type JobId = Uuid;

/// Status of an archive job.
///
/// Legal transitions:
///
/// ```text
/// Unknown -> Pending -> Processing -> Completed
///                    \            \-> Failed
///                     \-> Failed
///                      \-> Canceled
/// ```
///
/// `Completed`, `Failed`, and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Not yet registered.
    #[default]
    Unknown,
    /// Registered and waiting for its worker.
    Pending,
    /// The worker is building the archive.
    Processing,
    /// The archive was built without errors.
    Completed,
    /// Reserved for cancellation support; nothing triggers it yet.
    Canceled,
    /// Processing ended with errors.
    Failed,
}

impl JobStatus {
    /// Returns true if the job can no longer change status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }

    /// Returns true if moving from `self` to `next` is allowed.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unknown, Self::Pending)
                | (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Canceled)
                | (Self::Pending, Self::Failed)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }

    /// Position along the lifecycle; never decreases for a given job.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Pending => 1,
            Self::Processing => 2,
            Self::Completed | Self::Canceled | Self::Failed => 3,
        }
    }

    /// Returns the status as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One archive request and its evolving outcome.
///
/// Status changes go through the `mark_*` methods, which reject illegal
/// transitions. Registry readers only ever see clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveJob {
    id: JobId,
    range: TimeRange,
    status: JobStatus,
    errors: Vec<String>,
    warnings: Vec<String>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    entries_total: usize,
    entries_written: usize,
}

impl ArchiveJob {
    /// Creates a new pending job for `range`.
    #[must_use]
    pub fn new(id: JobId, range: TimeRange) -> Self {
        Self {
            id,
            range,
            status: JobStatus::Pending,
            errors: Vec::new(),
            warnings: Vec::new(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            entries_total: 0,
            entries_written: 0,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the requested time range.
    #[must_use]
    pub const fn range(&self) -> &TimeRange {
        &self.range
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the recorded errors, oldest first.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns the recorded non-fatal warnings, oldest first.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Timestamp when the job was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp when processing started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Timestamp when the job reached a terminal status.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Number of candidate entries found for the range.
    #[must_use]
    pub const fn entries_total(&self) -> usize {
        self.entries_total
    }

    /// Number of entries written into the archive so far.
    #[must_use]
    pub const fn entries_written(&self) -> usize {
        self.entries_written
    }

    /// Returns true if the job is in a terminal state.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the progress percentage over the candidate entries.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.entries_total == 0 {
            return if self.is_finished() { 100.0 } else { 0.0 };
        }
        (self.entries_written as f64 / self.entries_total as f64) * 100.0
    }

    /// Returns the processing time, once processing has started.
    ///
    /// For a job still running this is the time elapsed so far.
    #[must_use]
    pub fn elapsed(&self) -> Option<TimeDelta> {
        let started = self.started_at?;
        Some(self.completed_at.unwrap_or_else(Utc::now) - started)
    }

    /// Marks the job as picked up by its worker.
    ///
    /// # Errors
    ///
    /// Returns an error unless the job is pending.
    pub fn mark_processing(&mut self) -> Result<(), JobError> {
        self.transition(JobStatus::Processing)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Marks the job as completed successfully.
    ///
    /// # Errors
    ///
    /// Returns an error unless the job is processing, or if errors have
    /// already been recorded.
    pub fn mark_completed(&mut self) -> Result<(), JobError> {
        if !self.errors.is_empty() {
            return Err(JobError::UnresolvedErrors {
                id: self.id,
                count: self.errors.len(),
            });
        }
        self.transition(JobStatus::Completed)?;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Marks the job as failed, appending `errors` to the error list.
    ///
    /// A generic message is recorded if `errors` is empty, so a failed job
    /// always carries at least one error.
    ///
    /// # Errors
    ///
    /// Returns an error if the job is already terminal.
    pub fn mark_failed<I>(&mut self, errors: I) -> Result<(), JobError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.transition(JobStatus::Failed)?;
        self.errors.extend(errors.into_iter().map(Into::into));
        if self.errors.is_empty() {
            self.errors.push("Processing failed".to_string());
        }
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Marks a pending job as canceled.
    ///
    /// # Errors
    ///
    /// Returns an error unless the job is pending.
    pub fn mark_canceled(&mut self) -> Result<(), JobError> {
        self.transition(JobStatus::Canceled)?;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Records the number of candidate entries.
    pub const fn set_entries_total(&mut self, total: usize) {
        self.entries_total = total;
    }

    /// Counts one more entry as written.
    pub const fn record_written(&mut self) {
        self.entries_written += 1;
    }

    /// Appends non-fatal warnings.
    pub fn add_warnings<I>(&mut self, warnings: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.warnings.extend(warnings.into_iter().map(Into::into));
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), JobError> {
        if !self.status.can_transition_to(next) {
            return Err(JobError::InvalidTransition {
                id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
