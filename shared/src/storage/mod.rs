//! Storage for pulse measurements.
//!
//! The pulse log is a plain append-only text file with one measurement per
//! line. `PulseLog` loads it in full on every call and hands out appenders
//! for the recorder.

pub mod pulse_log;

pub use pulse_log::{load_series, read_series, LoadError, PulseLog, PulseLogAppender};
