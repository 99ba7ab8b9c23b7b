//! Metadata catalog and source store collaborators for chronarc.
//!
//! - [`Catalog`] - Time-range queries over catalogued files
//! - [`MemoryCatalog`] - In-memory catalog
//! - [`ManifestCatalog`] - Catalog loaded from a JSON manifest
//! - [`SourceStore`] - Existence checks and reads of source files
//! - [`LocalStore`] - Source store backed by the local file system

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod manifest;
mod memory;
mod store;

pub use catalog::{Catalog, CatalogError};
pub use manifest::ManifestCatalog;
pub use memory::MemoryCatalog;
pub use store::{LocalStore, SourceStore};
