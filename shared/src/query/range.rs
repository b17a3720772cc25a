//! Time range construction for series queries.
//!
//! A range is built from a start and end date, each combined with an
//! `HH:MM` time of day, and includes both of its ends.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `strftime` format accepted for a time of day.
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// `strftime` format accepted for a date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur while building a time range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The time of day is not a valid `HH:MM` value.
    #[error("Invalid time of day: '{0}'. Expected 'HH:MM'")]
    InvalidTimeOfDay(String),

    /// The date is not a valid `YYYY-MM-DD` value.
    #[error("Invalid date: '{0}'. Expected 'YYYY-MM-DD'")]
    InvalidDate(String),
}

/// Parses an `HH:MM` time of day.
///
/// # Errors
///
/// Returns `RangeError::InvalidTimeOfDay` if the input is not a valid time.
///
/// # Examples
///
/// ```
/// use shared::query::parse_time_of_day;
///
/// assert!(parse_time_of_day("23:59").is_ok());
/// assert!(parse_time_of_day("25:99").is_err());
/// ```
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, RangeError> {
    NaiveTime::parse_from_str(input, TIME_OF_DAY_FORMAT)
        .map_err(|_| RangeError::InvalidTimeOfDay(input.to_string()))
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `RangeError::InvalidDate` if the input is not a valid date.
pub fn parse_date(input: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| RangeError::InvalidDate(input.to_string()))
}

/// An inclusive range of timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// First timestamp included in the range.
    pub start: NaiveDateTime,
    /// Last timestamp included in the range.
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Creates a range from two timestamps.
    ///
    /// A range whose start lies after its end is valid and contains nothing.
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Creates a range from dates and `HH:MM` times of day.
    ///
    /// # Errors
    ///
    /// Returns `RangeError::InvalidTimeOfDay` if either time string does not
    /// parse.
    pub fn from_parts(
        start_date: NaiveDate,
        start_time: &str,
        end_date: NaiveDate,
        end_time: &str,
    ) -> Result<Self, RangeError> {
        let start = start_date.and_time(parse_time_of_day(start_time)?);
        let end = end_date.and_time(parse_time_of_day(end_time)?);
        Ok(Self::new(start, end))
    }

    /// Returns true if `timestamp` lies within the range, ends included.
    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}
