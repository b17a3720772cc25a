//! Recorder process supervision.
//!
//! The dashboard can start and stop the recorder. Supervision sits behind the
//! `RecorderControl` trait so the server never inspects the process table
//! itself; `ProcessRecorder` runs a configured command as a child process.
//!
//! Stopping asks the child to exit with SIGTERM (via the system `kill`
//! command) and falls back to `Child::kill` once the grace period runs out.

use std::io;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can occur while controlling the recorder.
#[derive(Debug, Error)]
pub enum RecorderControlError {
    /// No command has been configured for starting the recorder.
    #[error("No recorder command configured; set PULSEWATCH_RECORDER_CMD")]
    Unconfigured,

    /// The recorder process could not be spawned.
    #[error("Failed to start recorder: {0}")]
    Spawn(#[source] io::Error),

    /// The recorder process could not be terminated.
    #[error("Failed to stop recorder: {0}")]
    Stop(#[source] io::Error),

    /// Failed to acquire the lock on the supervised process.
    #[error("Failed to acquire lock on recorder process")]
    LockError,
}

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The recorder was started by this request.
    Started,
    /// The recorder was already running.
    AlreadyRunning,
}

/// Result of a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The recorder was stopped by this request.
    Stopped,
    /// The recorder was not running.
    NotRunning,
}

/// Trait for recorder supervision.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait RecorderControl: Send + Sync {
    /// Returns true while the recorder is alive.
    fn is_running(&self) -> bool;

    /// Starts the recorder unless it is already running.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder cannot be started.
    fn start(&self) -> Result<StartOutcome, RecorderControlError>;

    /// Stops the recorder if it is running.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder cannot be stopped.
    fn stop(&self) -> Result<StopOutcome, RecorderControlError>;
}

/// Time a recorder gets to exit after SIGTERM before it is killed.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// Runs the recorder as a child process of the server.
#[derive(Debug)]
pub struct ProcessRecorder {
    command: Option<Vec<String>>,
    child: Mutex<Option<Child>>,
    stop_grace: Duration,
}

impl ProcessRecorder {
    /// Creates a supervisor for `command` (program followed by arguments).
    ///
    /// With `None`, every start request fails with
    /// `RecorderControlError::Unconfigured`.
    #[must_use]
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self {
            command,
            child: Mutex::new(None),
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }

    /// Sets how long `stop` waits after SIGTERM before killing the child.
    #[must_use]
    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }

    /// Clears `slot` if its child has exited and reports whether it is alive.
    fn reap(slot: &mut Option<Child>) -> bool {
        let Some(child) = slot.as_mut() else {
            return false;
        };

        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                tracing::info!(pid = child.id(), %status, "Recorder process exited");
                *slot = None;
                false
            }
            Err(e) => {
                tracing::warn!(pid = child.id(), error = %e, "Failed to poll recorder process");
                *slot = None;
                false
            }
        }
    }
}

impl RecorderControl for ProcessRecorder {
    fn is_running(&self) -> bool {
        match self.child.lock() {
            Ok(mut slot) => Self::reap(&mut slot),
            Err(_) => {
                tracing::warn!("Recorder process lock poisoned");
                false
            }
        }
    }

    fn start(&self) -> Result<StartOutcome, RecorderControlError> {
        let mut slot = self
            .child
            .lock()
            .map_err(|_| RecorderControlError::LockError)?;

        if Self::reap(&mut slot) {
            return Ok(StartOutcome::AlreadyRunning);
        }

        let (program, args) = self
            .command
            .as_deref()
            .and_then(<[String]>::split_first)
            .ok_or(RecorderControlError::Unconfigured)?;

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(RecorderControlError::Spawn)?;

        tracing::info!(pid = child.id(), %program, "Recorder process started");
        *slot = Some(child);
        Ok(StartOutcome::Started)
    }

    fn stop(&self) -> Result<StopOutcome, RecorderControlError> {
        let mut slot = self
            .child
            .lock()
            .map_err(|_| RecorderControlError::LockError)?;

        if !Self::reap(&mut slot) {
            return Ok(StopOutcome::NotRunning);
        }

        if let Some(mut child) = slot.take() {
            let pid = child.id();
            terminate(&mut child, self.stop_grace).map_err(RecorderControlError::Stop)?;
            tracing::info!(pid, "Recorder process stopped");
        }
        Ok(StopOutcome::Stopped)
    }
}

/// Sends SIGTERM and waits up to `grace` for `child` to exit, then kills it.
fn terminate(child: &mut Child, grace: Duration) -> io::Result<()> {
    if send_sigterm(child.id()) {
        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if child.try_wait()?.is_some() {
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        tracing::warn!(pid = child.id(), "Recorder ignored SIGTERM, killing it");
    }

    child.kill()?;
    child.wait()?;
    Ok(())
}

#[cfg(unix)]
fn send_sigterm(pid: u32) -> bool {
    match Command::new("kill")
        .arg("-TERM")
        .arg(pid.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to run kill");
            false
        }
    }
}

#[cfg(not(unix))]
fn send_sigterm(_pid: u32) -> bool {
    false
}

impl Drop for ProcessRecorder {
    fn drop(&mut self) {
        if let Ok(slot) = self.child.get_mut() {
            if let Some(child) = slot.as_mut() {
                if let Err(e) = child.kill() {
                    tracing::debug!(error = %e, "Recorder process already gone");
                }
                let _ = child.wait();
            }
        }
    }
}
