//! Health check endpoint.
//!
//! Reports that the server is up, which log file it serves and whether the
//! recorder is running.

use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status (always "healthy" if reachable).
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Path of the pulse log being served.
    pub log_file: String,
    /// Whether the log file currently exists.
    pub log_file_present: bool,
    /// Whether the recorder process is alive.
    pub recorder_running: bool,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

/// The server itself is healthy whenever it answers; a missing log file only
/// means nothing has been recorded yet.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let path = state.pulse_log().path();

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "pulsewatch-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        log_file: path.display().to_string(),
        log_file_present: path.is_file(),
        recorder_running: state.recorder().is_running(),
    })
}
