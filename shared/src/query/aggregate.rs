//! Filtering and bucket aggregation of a measurement series.

use super::range::{RangeError, TimeRange};
use crate::models::{Bucket, Measurement};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dashboard query: a date/time window plus the bucket size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowQuery {
    /// Date of the first included timestamp.
    pub start_date: NaiveDate,
    /// Time of day on `start_date`, as `HH:MM`.
    pub start_time: String,
    /// Date of the last included timestamp.
    pub end_date: NaiveDate,
    /// Time of day on `end_date`, as `HH:MM`.
    pub end_time: String,
    /// Number of measurements summed into each bucket. Values below 1 act as 1.
    pub points: i64,
}

impl WindowQuery {
    /// Creates a query covering whole days from `start_date` to `end_date`
    /// (`00:00` to `23:59`) with one measurement per bucket.
    #[must_use]
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            start_time: "00:00".to_string(),
            end_date,
            end_time: "23:59".to_string(),
            points: 1,
        }
    }

    /// Sets the start time of day.
    #[must_use]
    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = start_time.into();
        self
    }

    /// Sets the end time of day.
    #[must_use]
    pub fn with_end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = end_time.into();
        self
    }

    /// Sets the bucket size.
    #[must_use]
    pub fn with_points(mut self, points: i64) -> Self {
        self.points = points;
        self
    }

    /// Builds the inclusive time range of this query.
    ///
    /// # Errors
    ///
    /// Returns `RangeError` if either time of day is not `HH:MM`.
    pub fn time_range(&self) -> Result<TimeRange, RangeError> {
        TimeRange::from_parts(
            self.start_date,
            &self.start_time,
            self.end_date,
            &self.end_time,
        )
    }

    /// Returns the bucket size after clamping to at least 1.
    #[must_use]
    pub fn bucket_size(&self) -> usize {
        clamp_bucket_size(self.points)
    }
}

/// Clamps a requested bucket size to a usable one (at least 1).
#[must_use]
pub fn clamp_bucket_size(points: i64) -> usize {
    usize::try_from(points.max(1)).unwrap_or(usize::MAX)
}

/// Returns the measurements inside `range`, in their original order.
#[must_use]
pub fn filter(series: &[Measurement], range: &TimeRange) -> Vec<Measurement> {
    series
        .iter()
        .filter(|m| range.contains(m.timestamp))
        .copied()
        .collect()
}

/// Groups consecutive measurements `points` at a time and sums each group.
///
/// Each bucket carries the timestamp of its group's first measurement. A
/// trailing group with fewer than `points` measurements is dropped, so the
/// result has `len / points` buckets. Sums saturate at the `i64` bounds.
///
/// # Example
///
/// ```
/// use shared::chrono::NaiveDate;
/// use shared::models::Measurement;
/// use shared::query::aggregate;
///
/// let t0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let t1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(10, 0, 10).unwrap();
/// let buckets = aggregate(&[Measurement::new(t0, 3), Measurement::new(t1, 5)], 2);
///
/// assert_eq!(buckets.len(), 1);
/// assert_eq!(buckets[0].timestamp, t0);
/// assert_eq!(buckets[0].value, 8);
/// ```
#[must_use]
pub fn aggregate(measurements: &[Measurement], points: i64) -> Vec<Bucket> {
    measurements
        .chunks_exact(clamp_bucket_size(points))
        .map(|group| {
            let value = group
                .iter()
                .fold(0i64, |sum, m| sum.saturating_add(m.value));
            Bucket::new(group[0].timestamp, value)
        })
        .collect()
}

/// Filters `series` to the query window and aggregates the result.
///
/// # Errors
///
/// Returns `RangeError` if either time of day in the query is malformed.
pub fn filter_and_aggregate(
    series: &[Measurement],
    query: &WindowQuery,
) -> Result<Vec<Bucket>, RangeError> {
    let range = query.time_range()?;
    let filtered = filter(series, &range);
    let buckets = aggregate(&filtered, query.points);

    tracing::debug!(
        total = series.len(),
        filtered = filtered.len(),
        buckets = buckets.len(),
        points = query.bucket_size(),
        "Aggregated series"
    );
    Ok(buckets)
}
