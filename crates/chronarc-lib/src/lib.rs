//! Bundle time-ranged image captures into ZIP archives in the background.
//!
//! This is a facade crate that re-exports functionality from the chronarc
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use chronarc_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Arc::new(ManifestCatalog::load("images.json")?);
//!     let manager = ArchiveManager::new(
//!         ManagerConfig::default(),
//!         catalog,
//!         Arc::new(LocalStore::new()),
//!     )?;
//!
//!     let range = TimeRange::parse("2024-01-01", "2024-01-31")?;
//!     let id = manager.start_archive(range).await?;
//!
//!     let job = manager.wait(id).await?;
//!     match job.status() {
//!         JobStatus::Completed => println!("{}", manager.artifact_path(id)?.display()),
//!         status => println!("{status}: {:?}", job.errors()),
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use chronarc_types::*;

// Re-export catalogs and source access
pub use chronarc_catalog::{
    Catalog, CatalogError, LocalStore, ManifestCatalog, MemoryCatalog, SourceStore,
};

// Re-export packaging
pub use chronarc_pack::{
    EntryFailure, FailureKind, MissingSourcePolicy, PackConfig, PackEngine, PackError,
    PackProgress, PackReport, PlannedEntry, SinkSummary, ZipSink, entry_name, plan_entries,
};

// Re-export job orchestration
#[cfg(feature = "jobs")]
pub use chronarc_jobs::{
    AccessError, ArchiveJob, ArchiveManager, ArtifactError, ArtifactStore, DispatchError,
    DispatchMode, JobError, JobId, JobRegistry, JobStatus, ManagerConfig, ProcessError,
    RegistryError,
};

/// Prelude module for convenient imports.
///
/// ```
/// use chronarc_lib::prelude::*;
/// ```
pub mod prelude {
    pub use chronarc_types::{SourceEntry, TimeRange, TimeRangeError};

    pub use chronarc_catalog::{Catalog, LocalStore, ManifestCatalog, MemoryCatalog, SourceStore};

    pub use chronarc_pack::{MissingSourcePolicy, PackConfig, PackEngine, PackReport};

    #[cfg(feature = "jobs")]
    pub use chronarc_jobs::{
        ArchiveJob, ArchiveManager, DispatchMode, JobId, JobStatus, ManagerConfig,
    };
}
