//! Recorder control endpoints.
//!
//! Backs the dashboard's start/stop buttons and status line.

use crate::recorder::{RecorderControlError, StartOutcome, StopOutcome};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Recorder status response.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecorderStatusResponse {
    /// Whether the recorder is alive after the request.
    pub running: bool,
    /// Human-readable status line.
    pub message: String,
}

impl RecorderStatusResponse {
    fn new(running: bool, message: &str) -> Self {
        Self {
            running,
            message: message.to_string(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecorderError {
    pub error: String,
    pub message: String,
}

fn control_error(e: &RecorderControlError) -> (StatusCode, Json<RecorderError>) {
    let (status, error) = match e {
        RecorderControlError::Unconfigured => {
            (StatusCode::SERVICE_UNAVAILABLE, "recorder_unconfigured")
        }
        RecorderControlError::Spawn(_) | RecorderControlError::Stop(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "recorder_control_failed")
        }
        RecorderControlError::LockError => (StatusCode::INTERNAL_SERVER_ERROR, "lock_error"),
    };

    tracing::warn!(error = %e, "Recorder control request failed");
    (
        status,
        Json(RecorderError {
            error: error.to_string(),
            message: e.to_string(),
        }),
    )
}

/// Creates the recorder control routes.
///
/// # Routes
///
/// - `GET /api/v1/recorder` - Report whether the recorder is running
/// - `POST /api/v1/recorder/start` - Start the recorder
/// - `POST /api/v1/recorder/stop` - Stop the recorder
pub fn recorder_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/recorder", get(recorder_status))
        .route("/api/v1/recorder/start", post(start_recorder))
        .route("/api/v1/recorder/stop", post(stop_recorder))
        .with_state(state)
}

async fn recorder_status(State(state): State<AppState>) -> Json<RecorderStatusResponse> {
    let running = state.recorder().is_running();
    let message = if running {
        "recorder is running"
    } else {
        "recorder is not running"
    };
    Json(RecorderStatusResponse::new(running, message))
}

async fn start_recorder(
    State(state): State<AppState>,
) -> Result<Json<RecorderStatusResponse>, (StatusCode, Json<RecorderError>)> {
    let message = match state.recorder().start().map_err(|e| control_error(&e))? {
        StartOutcome::Started => "recorder is running",
        StartOutcome::AlreadyRunning => "recorder is already running",
    };
    Ok(Json(RecorderStatusResponse::new(true, message)))
}

async fn stop_recorder(
    State(state): State<AppState>,
) -> Result<Json<RecorderStatusResponse>, (StatusCode, Json<RecorderError>)> {
    let recorder = state.recorder_handle();
    let outcome = tokio::task::spawn_blocking(move || recorder.stop())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Recorder stop task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RecorderError {
                    error: "internal_error".to_string(),
                    message: "Recorder stop task failed".to_string(),
                }),
            )
        })?;

    let message = match outcome.map_err(|e| control_error(&e))? {
        StopOutcome::Stopped => "recorder has been stopped",
        StopOutcome::NotRunning => "recorder is not running",
    };
    Ok(Json(RecorderStatusResponse::new(false, message)))
}
