//! Measurement and bucket data models.
//!
//! Defines the `Measurement` read from the pulse log and the `Bucket`
//! produced when measurements are aggregated for display.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the timestamp and the value in a pulse log line.
pub const LINE_SEPARATOR: &str = " - Pulses_per_10s: ";

/// `strftime` format of the timestamp at the start of each log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single timestamped pulse count.
///
/// Timestamps are local wall-clock time without a zone, exactly as the
/// recorder stamps them.
///
/// # Example
///
/// ```
/// use shared::chrono::NaiveDate;
/// use shared::models::Measurement;
///
/// let timestamp = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// let measurement = Measurement::new(timestamp, 42);
///
/// assert_eq!(
///     measurement.to_string(),
///     "2024-01-01 10:00:00 - Pulses_per_10s: 42"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// When the reading was recorded.
    pub timestamp: NaiveDateTime,
    /// Pulses counted in the reading's interval.
    pub value: i64,
}

impl Measurement {
    /// Creates a new measurement.
    #[must_use]
    pub const fn new(timestamp: NaiveDateTime, value: i64) -> Self {
        Self { timestamp, value }
    }
}

/// Renders the measurement as a log line, without the trailing newline.
impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            LINE_SEPARATOR,
            self.value
        )
    }
}

/// A group of consecutive measurements reduced to one point.
///
/// The timestamp is taken from the first measurement of the group while the
/// value is the sum over every measurement in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Timestamp of the first measurement in the group.
    pub timestamp: NaiveDateTime,
    /// Sum of the values of all measurements in the group.
    pub value: i64,
}

impl Bucket {
    /// Creates a new bucket.
    #[must_use]
    pub const fn new(timestamp: NaiveDateTime, value: i64) -> Self {
        Self { timestamp, value }
    }
}
