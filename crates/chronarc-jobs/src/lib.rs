//! Asynchronous archive job orchestration for chronarc.
//!
//! This crate provides job tracking and background execution for archive
//! requests:
//!
//! - [`JobId`] - Unique identifier for archive jobs
//! - [`JobStatus`] - Current status of a job and its legal transitions
//! - [`ArchiveJob`] - One archive request and its evolving outcome
//! - [`JobRegistry`] - Concurrent in-memory job table
//! - [`ArtifactStore`] - Deterministic archive locations keyed by job id
//! - [`ArchiveManager`] - Dispatches jobs and serves status/artifact queries

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod artifact;
mod config;
mod error;
mod job;
mod manager;
mod registry;
mod worker;

pub use artifact::ArtifactStore;
pub use config::{DispatchMode, ManagerConfig};
pub use error::{AccessError, ArtifactError, DispatchError, JobError, ProcessError, RegistryError};
pub use job::{ArchiveJob, JobId, JobStatus};
pub use manager::ArchiveManager;
pub use registry::JobRegistry;
