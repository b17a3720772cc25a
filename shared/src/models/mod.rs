//! Data models for the Pulsewatch pipeline.
//!
//! This module contains the measurement and bucket types together with the
//! parser for the pulse log line format.

pub mod line;
pub mod measurement;

pub use line::{parse_line, ParseError};
pub use measurement::{Bucket, Measurement, LINE_SEPARATOR, TIMESTAMP_FORMAT};
