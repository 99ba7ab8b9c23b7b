//! Error types for chronarc core types.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Error for invalid time ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeRangeError {
    /// Start is after end.
    #[error("Invalid time range: {start} > {end}")]
    InvalidRange {
        /// The start of the range.
        start: NaiveDateTime,
        /// The end of the range.
        end: NaiveDateTime,
    },

    /// A bound could not be parsed as a date or date-time.
    #[error("Invalid date or date-time '{input}' (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)")]
    Parse {
        /// The rejected input.
        input: String,
    },
}
