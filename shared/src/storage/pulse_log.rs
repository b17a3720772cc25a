//! File-backed pulse log.
//!
//! Provides `PulseLog`, which loads the whole measurement series from the
//! append-only text log, and `PulseLogAppender` for writing new lines to it.
//! Every load re-reads the file so newly appended lines become visible on the
//! next call.

use crate::models::{parse_line, Measurement, ParseError};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur while reading or appending to the pulse log.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The log file could not be opened, read or written.
    #[error("Failed to access pulse log '{}': {source}", .path.display())]
    Io {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A line of the log is malformed.
    #[error("Malformed pulse log line {line}: {source}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Parse failure for that line.
        #[source]
        source: ParseError,
    },

    /// Failed to acquire the log lock.
    #[error("Failed to acquire lock on pulse log")]
    LockError,
}

/// Handle to a pulse log file.
///
/// Clones share one read/write lock, so loads never observe a line that an
/// appender from the same process is still writing.
#[derive(Debug, Clone)]
pub struct PulseLog {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl PulseLog {
    /// Creates a handle for the log at `path`. The file is not opened.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// Returns the path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every measurement in file order.
    ///
    /// The first malformed line aborts the load; no partial series is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - Any line fails to parse
    pub fn load(&self) -> Result<Vec<Measurement>, LoadError> {
        let _guard = self.lock.read().map_err(|_| LoadError::LockError)?;

        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let series = read_series(BufReader::new(file)).map_err(|err| match err {
            LoadError::Io { source, .. } => self.io_error(source),
            other => other,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            count = series.len(),
            "Loaded pulse log"
        );
        Ok(series)
    }

    /// Opens the log for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for writing.
    pub fn appender(&self) -> Result<PulseLogAppender, LoadError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;

        Ok(PulseLogAppender {
            file,
            lock: Arc::clone(&self.lock),
            pending: Vec::new(),
        })
    }

    fn io_error(&self, source: io::Error) -> LoadError {
        LoadError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Loads the series stored at `path`.
///
/// # Errors
///
/// See [`PulseLog::load`].
pub fn load_series(path: impl AsRef<Path>) -> Result<Vec<Measurement>, LoadError> {
    PulseLog::new(path.as_ref()).load()
}

/// Parses every line from `reader`, stopping at the first malformed one.
///
/// A line that is not valid UTF-8 is malformed, not an I/O failure.
///
/// I/O failures are reported with an empty path; [`PulseLog::load`] fills in
/// the real one.
///
/// # Errors
///
/// Returns an error if reading fails or a line does not parse.
pub fn read_series<R: BufRead>(reader: R) -> Result<Vec<Measurement>, LoadError> {
    let mut series = Vec::new();

    for (index, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(|source| LoadError::Io {
            path: PathBuf::new(),
            source,
        })?;
        let parse_error = |source: ParseError| LoadError::Parse {
            line: index + 1,
            source,
        };

        let line = std::str::from_utf8(&bytes)
            .map_err(|_| parse_error(ParseError::InvalidEncoding))?;
        let line = line.strip_suffix('\r').unwrap_or(line);
        series.push(parse_line(line).map_err(parse_error)?);
    }

    Ok(series)
}

/// Append-mode writer for a pulse log.
///
/// Bytes are buffered until `flush`, which writes them with a single call
/// while holding the log's write lock. Callers flush once per complete line.
#[derive(Debug)]
pub struct PulseLogAppender {
    file: File,
    lock: Arc<RwLock<()>>,
    pending: Vec<u8>,
}

impl Write for PulseLogAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let _guard = self
            .lock
            .write()
            .map_err(|_| io::Error::other("pulse log lock poisoned"))?;
        self.file.write_all(&self.pending)?;
        self.file.flush()?;
        self.pending.clear();
        Ok(())
    }
}

impl Drop for PulseLogAppender {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "Failed to flush pulse log on close");
        }
    }
}
