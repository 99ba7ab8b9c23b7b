//! Error types for job orchestration.

use chronarc_catalog::CatalogError;
use chronarc_pack::PackError;
use std::path::PathBuf;
use thiserror::Error;

use crate::{JobId, JobStatus};

/// Errors raised by the job state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The requested status change is not allowed.
    #[error("Job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The job identifier.
        id: JobId,
        /// The current status.
        from: JobStatus,
        /// The requested status.
        to: JobStatus,
    },

    /// The job cannot complete while it carries errors.
    #[error("Job {id} cannot complete with {count} recorded error(s)")]
    UnresolvedErrors {
        /// The job identifier.
        id: JobId,
        /// Number of recorded errors.
        count: usize,
    },
}

/// Errors raised by the job registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No job with this identifier is registered.
    #[error("Job not found: {0}")]
    NotFound(JobId),
}

/// Errors raised while preparing the archive directory.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Failed to create the archive directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors returned when a job cannot be started.
///
/// A rejected request never leaves a job record behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The configured number of unfinished jobs is already running.
    #[error("Too many active archive jobs (limit {limit})")]
    Saturated {
        /// The configured limit.
        limit: usize,
    },

    /// Background dispatch was requested outside a tokio runtime.
    #[error("No tokio runtime available to run the archive job")]
    NoRuntime,
}

/// Errors returned by job status and artifact queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No job with this identifier is registered.
    #[error("Job not found: {0}")]
    NotFound(JobId),

    /// The job has not completed successfully.
    #[error("Job {id} is not completed (status: {status})")]
    NotReady {
        /// The job identifier.
        id: JobId,
        /// The job's current status.
        status: JobStatus,
    },

    /// The job completed but its archive is gone.
    #[error("Archive for job {id} is missing: {}", path.display())]
    MissingArtifact {
        /// The job identifier.
        id: JobId,
        /// Where the archive was expected.
        path: PathBuf,
    },
}

impl From<RegistryError> for AccessError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => Self::NotFound(id),
        }
    }
}

/// Errors that abort the processing of one job.
///
/// These are recorded on the job as its failure message; they never reach
/// the caller that started the job.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The catalog query failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The archive could not be created or finalized.
    #[error(transparent)]
    Pack(#[from] PackError),

    /// The job record disappeared.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The job record rejected a status change.
    #[error(transparent)]
    Job(#[from] JobError),
}
