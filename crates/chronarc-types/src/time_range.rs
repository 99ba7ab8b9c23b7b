//! Inclusive time range for entry selection.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::TimeRangeError;

/// First instant of a day.
const START_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(0, 0, 0) {
    Some(time) => time,
    None => panic!("invalid start-of-day time"),
};

/// Last representable instant of a day.
const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999) {
    Some(time) => time,
    None => panic!("invalid end-of-day time"),
};

/// Accepted date-time layouts, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// An inclusive range of timestamps.
///
/// Both bounds are part of the range: an entry stamped exactly at `start` or
/// exactly at `end` is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the range (inclusive).
    pub start: NaiveDateTime,
    /// End of the range (inclusive).
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Creates a new time range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, TimeRangeError> {
        if start > end {
            return Err(TimeRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering whole days, from midnight of `start` to the
    /// last instant of `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, TimeRangeError> {
        Self::new(start.and_time(START_OF_DAY), end.and_time(END_OF_DAY))
    }

    /// Parses both bounds from user input.
    ///
    /// A bare date (`YYYY-MM-DD`) expands to the start of the day for the
    /// lower bound and to the end of the day for the upper bound.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound cannot be parsed or start > end.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeRangeError> {
        let start = parse_bound(start, START_OF_DAY)?;
        let end = parse_bound(end, END_OF_DAY)?;
        Self::new(start, end)
    }

    /// Returns true if the range contains the given timestamp.
    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn parse_bound(input: &str, date_only_time: NaiveTime) -> Result<NaiveDateTime, TimeRangeError> {
    let trimmed = input.trim();

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(date_only_time))
        .map_err(|_| TimeRangeError::Parse {
            input: input.to_string(),
        })
}
