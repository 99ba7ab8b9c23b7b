//! Source file access.

use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::path::Path;

/// Read access to the files referenced by catalog entries.
///
/// Implementations must tolerate concurrent reads from many jobs.
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Returns true if a file exists at `path`.
    async fn exists(&self, path: &Path) -> bool;

    /// Reads the whole file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is absent, or any other I/O error
    /// raised while reading.
    async fn read(&self, path: &Path) -> io::Result<Bytes>;
}

/// Source store backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    /// Creates a new local store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SourceStore for LocalStore {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read(&self, path: &Path) -> io::Result<Bytes> {
        tokio::fs::read(path).await.map(Bytes::from)
    }
}
