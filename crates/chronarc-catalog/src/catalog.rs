//! Time-range query interface over catalogued files.

use async_trait::async_trait;
use chronarc_types::{SourceEntry, TimeRange};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while querying a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to read the catalog backing file.
    #[error("Failed to read catalog '{path}': {source}")]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the catalog backing file.
    #[error("Failed to parse catalog '{path}': {source}")]
    Parse {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The catalog backend rejected or failed the query.
    #[error("Catalog query failed: {0}")]
    Query(String),
}

/// A read-only record store queryable by capture time.
///
/// Implementations must tolerate concurrent queries from many jobs and must
/// not mutate state while answering them.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns every entry whose timestamp lies in `range`, bounds included.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    async fn query_by_time_range(&self, range: &TimeRange)
    -> Result<Vec<SourceEntry>, CatalogError>;
}

/// Filters `entries` to `range` and orders the result by timestamp, then id.
pub(crate) fn select<'a>(
    entries: impl IntoIterator<Item = &'a SourceEntry>,
    range: &TimeRange,
) -> Vec<SourceEntry> {
    let mut selected: Vec<SourceEntry> = entries
        .into_iter()
        .filter(|entry| range.contains(entry.date_time))
        .cloned()
        .collect();
    selected.sort_by(|a, b| a.date_time.cmp(&b.date_time).then(a.id.cmp(&b.id)));
    selected
}
