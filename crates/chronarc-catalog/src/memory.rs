//! In-memory catalog.

use async_trait::async_trait;
use chronarc_types::{SourceEntry, TimeRange};

use crate::catalog::select;
use crate::{Catalog, CatalogError};

/// Catalog holding its entries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entries: Vec<SourceEntry>,
}

impl MemoryCatalog {
    /// Creates a catalog from the given entries.
    #[must_use]
    pub const fn new(entries: Vec<SourceEntry>) -> Self {
        Self { entries }
    }

    /// Adds an entry to the catalog.
    pub fn insert(&mut self, entry: SourceEntry) {
        self.entries.push(entry);
    }

    /// Returns all entries as an iterator.
    pub fn all(&self) -> impl Iterator<Item = &SourceEntry> {
        self.entries.iter()
    }

    /// Returns the total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<SourceEntry> for MemoryCatalog {
    fn from_iter<I: IntoIterator<Item = SourceEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn query_by_time_range(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<SourceEntry>, CatalogError> {
        Ok(select(&self.entries, range))
    }
}
