//! Pulse recorder.
//!
//! Reads readings from a device line by line, stamps each with the local
//! time and appends it to the pulse log. The device is expected to emit
//! lines such as `Pulses_per_10s: 42`, which become log lines of the form
//! `2024-01-01 10:00:00 - Pulses_per_10s: 42`.
//!
//! # Example
//!
//! ```
//! use shared::recorder::{FixedClock, Recorder};
//! use shared::chrono::NaiveDate;
//!
//! let clock = FixedClock::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap(),
//! );
//! let mut output = Vec::new();
//! let stats = Recorder::new(&b"Pulses_per_10s: 7\n"[..], &mut output)
//!     .with_clock(clock)
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(stats.lines_written, 1);
//! assert_eq!(output, b"2024-01-01 10:00:00 - Pulses_per_10s: 7\n");
//! ```

use crate::models::TIMESTAMP_FORMAT;
use chrono::{Local, NaiveDateTime};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while recording.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Reading from the device or writing to the log failed.
    #[error("Recorder I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Source of timestamps for recorded readings.
pub trait Clock {
    /// Returns the current wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Summary of a finished recording run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecorderStats {
    /// Number of log lines written.
    pub lines_written: u64,
}

/// Copies device readings into the pulse log.
pub struct Recorder<R, W, C = LocalClock> {
    reader: R,
    writer: W,
    clock: C,
    stop: Arc<AtomicBool>,
    lines_written: Arc<AtomicU64>,
}

impl<R: BufRead, W: Write> Recorder<R, W, LocalClock> {
    /// Creates a recorder using the local clock.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            clock: LocalClock,
            stop: Arc::new(AtomicBool::new(false)),
            lines_written: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<R: BufRead, W: Write, C: Clock> Recorder<R, W, C> {
    /// Replaces the clock used to stamp readings.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Recorder<R, W, C2> {
        Recorder {
            reader: self.reader,
            writer: self.writer,
            clock,
            stop: self.stop,
            lines_written: self.lines_written,
        }
    }

    /// Uses `stop` as the stop flag instead of a private one.
    #[must_use]
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Returns the flag that ends the run once set.
    ///
    /// The flag is checked between readings, so a run blocked on a quiet
    /// device stops after its next reading.
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Returns a counter of lines written, readable while the run is in
    /// progress on another thread.
    #[must_use]
    pub fn lines_written_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.lines_written)
    }

    /// Records readings until the device reaches end of input or the stop
    /// flag is set.
    ///
    /// Blank readings are skipped. Every written line is flushed before the
    /// next reading is taken.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the device or writing to the log
    /// fails.
    pub fn run(&mut self) -> Result<RecorderStats, RecorderError> {
        let mut stats = RecorderStats::default();
        let mut raw = Vec::new();

        while !self.stop.load(Ordering::Relaxed) {
            raw.clear();
            if self.reader.read_until(b'\n', &mut raw)? == 0 {
                tracing::info!("Device reached end of input");
                break;
            }

            let reading = String::from_utf8_lossy(&raw);
            let reading = reading.trim();
            if reading.is_empty() {
                continue;
            }

            let line = format!(
                "{} - {}\n",
                self.clock.now().format(TIMESTAMP_FORMAT),
                reading
            );
            self.writer.write_all(line.as_bytes())?;
            self.writer.flush()?;
            stats.lines_written += 1;
            self.lines_written.fetch_add(1, Ordering::Relaxed);

            tracing::info!(line = %line.trim_end(), "Recorded reading");
        }

        Ok(stats)
    }
}
