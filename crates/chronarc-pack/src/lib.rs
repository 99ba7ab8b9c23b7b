//! Concurrent ZIP packaging engine for chronarc.
//!
//! - [`PackEngine`] - Reads source entries in parallel and writes them into one archive
//! - [`PackConfig`] - Concurrency, compression, and missing-source policy
//! - [`ZipSink`] - Mutex-guarded, single-writer ZIP container
//! - [`entry_name`] / [`plan_entries`] - Deterministic in-archive naming
//! - [`PackReport`] - Written, skipped, and failed entries of one run

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod engine;
mod error;
mod naming;
mod report;
mod sink;

pub use config::{MissingSourcePolicy, PackConfig};
pub use engine::{PackEngine, PackProgress};
pub use error::{PackError, panic_message};
pub use naming::{PlannedEntry, entry_name, plan_entries};
pub use report::{EntryFailure, FailureKind, PackReport};
pub use sink::{SinkSummary, ZipSink};
