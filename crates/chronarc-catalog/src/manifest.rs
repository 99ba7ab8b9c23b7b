//! Catalog loaded from a JSON manifest.
//!
//! The manifest is a JSON array of records exported from the metadata table:
//!
//! ```json
//! [
//!   { "id": 1, "name": "dawn", "file_path": "/srv/images/dawn.jpg",
//!     "date_time": "2024-01-05T06:12:00", "unix_time": 1704435120 }
//! ]
//! ```
//!
//! Unknown fields such as `unix_time` are accepted and ignored.

use async_trait::async_trait;
use chronarc_types::{SourceEntry, TimeRange};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::select;
use crate::{Catalog, CatalogError};

/// Catalog backed by a JSON manifest file.
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    path: PathBuf,
    entries: Vec<SourceEntry>,
}

impl ManifestCatalog {
    /// Loads a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref().to_path_buf();

        let content = fs::read_to_string(&path).map_err(|e| CatalogError::Read {
            path: path.clone(),
            source: e,
        })?;

        let entries: Vec<SourceEntry> =
            serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
                path: path.clone(),
                source: e,
            })?;

        tracing::debug!(path = %path.display(), entries = entries.len(), "Loaded manifest");

        Ok(Self { path, entries })
    }

    /// Returns the path the manifest was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns all entries in manifest order.
    pub fn all(&self) -> impl Iterator<Item = &SourceEntry> {
        self.entries.iter()
    }

    /// Returns the total number of entries in the manifest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Catalog for ManifestCatalog {
    async fn query_by_time_range(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<SourceEntry>, CatalogError> {
        Ok(select(&self.entries, range))
    }
}
