//! Catalogued source file representation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// A single file known to the catalog, with the time it was captured.
///
/// Entries are read-only for the whole archiving pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Catalog identifier.
    pub id: i64,
    /// Display name of the file.
    pub name: String,
    /// Location of the file on the source store.
    pub file_path: PathBuf,
    /// Capture timestamp used for range selection and entry naming.
    pub date_time: NaiveDateTime,
}

impl SourceEntry {
    /// Creates a new source entry.
    #[must_use]
    pub fn new(
        id: i64,
        name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        date_time: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            file_path: file_path.into(),
            date_time,
        }
    }

    /// Returns the path of the source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the extension of the source file, without the leading dot.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`.
    #[must_use]
    pub fn extension(&self) -> Option<Cow<'_, str>> {
        self.file_path
            .extension()
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_string_lossy())
    }

    /// Returns the capture time as seconds since the Unix epoch.
    #[must_use]
    pub fn unix_time(&self) -> i64 {
        self.date_time.and_utc().timestamp()
    }
}

impl std::fmt::Display for SourceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.file_path.display(), self.date_time)
    }
}
