//! Job-level packaging errors.

use std::any::Any;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a packaging run as a whole.
///
/// Failures scoped to a single entry are not errors at this level; they are
/// collected into the [`PackReport`](crate::PackReport).
#[derive(Error, Debug)]
pub enum PackError {
    /// Failed to create the archive file.
    #[error("Failed to create archive '{path}': {source}")]
    CreateSink {
        /// The archive path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to start or write an archive entry.
    #[error("Failed to write entry '{name}': {source}")]
    WriteEntry {
        /// The in-archive entry name.
        name: String,
        /// The underlying ZIP error.
        source: zip::result::ZipError,
    },

    /// Failed to finalize the archive.
    #[error("Failed to finalize archive '{path}': {source}")]
    Finish {
        /// The archive path.
        path: PathBuf,
        /// The underlying ZIP error.
        source: zip::result::ZipError,
    },

    /// The archive was already finalized.
    #[error("Archive '{0}' is already closed")]
    SinkClosed(PathBuf),

    /// A blocking archive task panicked or was cancelled.
    #[error("Archive task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for PackError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Extracts the message from a caught panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
