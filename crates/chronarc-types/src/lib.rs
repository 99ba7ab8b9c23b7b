//! Core types for the chronarc time-range archiver.
//!
//! This crate provides the fundamental data structures used throughout chronarc:
//!
//! - [`TimeRange`] - Inclusive time range used to select source entries
//! - [`SourceEntry`] - A catalogued file with its capture timestamp

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod entry;
mod error;
mod time_range;

pub use entry::SourceEntry;
pub use error::TimeRangeError;
pub use time_range::TimeRange;
