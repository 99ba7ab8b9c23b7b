//! Outcome of a packaging run.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Why a single entry could not be archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The source file does not exist.
    Missing,
    /// The source file exists but could not be read.
    Read,
    /// The bytes could not be written into the archive.
    Write,
    /// Processing the entry panicked.
    Panic,
}

impl FailureKind {
    /// Returns the kind as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Read => "read",
            Self::Write => "write",
            Self::Panic => "panic",
        }
    }
}

/// A failure scoped to one source entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    /// Catalog identifier of the entry.
    pub entry_id: i64,
    /// Source file of the entry.
    pub file_path: PathBuf,
    /// Planned in-archive name of the entry.
    pub archive_name: String,
    /// Failure category.
    pub kind: FailureKind,
    /// Underlying cause.
    pub detail: String,
}

impl EntryFailure {
    /// Creates a new entry failure.
    #[must_use]
    pub fn new(
        entry_id: i64,
        file_path: PathBuf,
        archive_name: String,
        kind: FailureKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            entry_id,
            file_path,
            archive_name,
            kind,
            detail: detail.into(),
        }
    }

    /// Returns a one-line message naming the entry and the cause.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entry #{} ({}): {}",
            self.entry_id,
            self.file_path.display(),
            self.detail
        )
    }
}

/// Result of packing one batch of entries into an archive.
///
/// Failed and skipped entries are ordered by entry id; written names are
/// sorted, so reports over identical input compare equal regardless of the
/// order in which entries finished.
#[derive(Debug, Clone, Serialize)]
pub struct PackReport {
    /// Path of the archive that was written.
    pub archive_path: PathBuf,
    /// Number of candidate entries handed to the engine.
    pub candidates: usize,
    /// Archive names of the entries that were written.
    pub written: Vec<String>,
    /// Entries skipped under the skip policy for missing sources.
    pub skipped: Vec<EntryFailure>,
    /// Entries that failed.
    pub failures: Vec<EntryFailure>,
    /// Uncompressed bytes copied into the archive.
    pub bytes_in: u64,
    /// Size of the finalized archive.
    pub archive_bytes: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl PackReport {
    /// Returns true if no entry failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns true if there were candidates but none of them was written.
    #[must_use]
    pub fn archived_nothing(&self) -> bool {
        self.candidates > 0 && self.written.is_empty()
    }

    /// Returns the number of entries written.
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.written.len()
    }
}
