//! Series queries for Pulsewatch.
//!
//! A query selects the measurements inside an inclusive date/time window and
//! reduces them into fixed-size buckets for plotting.
//!
//! # Example
//!
//! ```
//! use shared::chrono::NaiveDate;
//! use shared::query::{filter_and_aggregate, WindowQuery};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let query = WindowQuery::new(day, day).with_points(6);
//!
//! let buckets = filter_and_aggregate(&[], &query).unwrap();
//! assert!(buckets.is_empty());
//! ```

mod aggregate;
mod range;

pub use aggregate::{aggregate, clamp_bucket_size, filter, filter_and_aggregate, WindowQuery};
pub use range::{
    parse_date, parse_time_of_day, RangeError, TimeRange, DATE_FORMAT, TIME_OF_DAY_FORMAT,
};
