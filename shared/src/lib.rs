//! Pulsewatch Shared Library
//!
//! This crate contains the pulse log pipeline used by the Pulsewatch server
//! and CLI: parsing log lines, loading the log, filtering and aggregating
//! measurements, and recording new readings from a device.
//!
//! # Modules
//!
//! - [`models`] - Measurement and bucket types and the log line parser
//! - [`storage`] - The file-backed pulse log
//! - [`query`] - Time window filtering and bucket aggregation
//! - [`recorder`] - Device-to-log recorder
//! - [`pipeline`] - Load, filter and aggregate in one call
//!
//! # Example
//!
//! ```
//! use shared::models::parse_line;
//! use shared::query::aggregate;
//!
//! let series = vec![
//!     parse_line("2024-01-01 10:00:00 - Pulses_per_10s: 3").unwrap(),
//!     parse_line("2024-01-01 10:00:10 - Pulses_per_10s: 5").unwrap(),
//! ];
//!
//! let buckets = aggregate(&series, 2);
//! assert_eq!(buckets[0].value, 8);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod models;
pub mod pipeline;
pub mod query;
pub mod recorder;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
