//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use crate::config::Config;
use crate::recorder::{ProcessRecorder, RecorderControl};
use shared::storage::PulseLog;
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Holds the pulse log handle and the recorder supervisor. Both are built
/// explicitly and injected, so tests can substitute their own.
#[derive(Clone)]
pub struct AppState {
    /// The pulse log read by series queries.
    pulse_log: PulseLog,
    /// Supervisor for the recorder process.
    recorder: Arc<dyn RecorderControl>,
}

impl AppState {
    /// Creates a new application state from its parts.
    pub fn new(pulse_log: PulseLog, recorder: Arc<dyn RecorderControl>) -> Self {
        Self {
            pulse_log,
            recorder,
        }
    }

    /// Creates the application state described by `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            PulseLog::new(&config.log_file),
            Arc::new(ProcessRecorder::new(config.recorder_command.clone())),
        )
    }

    /// Returns a reference to the pulse log.
    #[must_use]
    pub fn pulse_log(&self) -> &PulseLog {
        &self.pulse_log
    }

    /// Returns a reference to the recorder supervisor.
    #[must_use]
    pub fn recorder(&self) -> &dyn RecorderControl {
        self.recorder.as_ref()
    }

    /// Returns a shared handle to the recorder supervisor for blocking work.
    #[must_use]
    pub fn recorder_handle(&self) -> Arc<dyn RecorderControl> {
        Arc::clone(&self.recorder)
    }
}
