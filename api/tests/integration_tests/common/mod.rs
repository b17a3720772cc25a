//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup and HTTP request helpers.

use api::{create_router, AppState, ProcessRecorder, RecorderControl};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use shared::storage::PulseLog;
use std::sync::Arc;
use tempfile::TempDir;

/// A router over a pulse log living in a temporary directory.
///
/// The directory is removed when the value is dropped, so keep it alive for
/// the duration of the test.
pub struct TestApp {
    pub dir: TempDir,
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Returns a clone of the router for a single request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Creates a test app whose pulse log holds `contents`.
///
/// With `None` the log file is not created.
pub fn test_app(contents: Option<&str>) -> TestApp {
    test_app_with_recorder(contents, Arc::new(ProcessRecorder::new(None)))
}

/// Creates a test app with a custom recorder supervisor.
pub fn test_app_with_recorder(
    contents: Option<&str>,
    recorder: Arc<dyn RecorderControl>,
) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pulses.txt");
    if let Some(contents) = contents {
        std::fs::write(&path, contents).unwrap();
    }

    let state = AppState::new(PulseLog::new(path), recorder);
    let router = create_router(state.clone());
    TestApp { dir, router, state }
}

/// Helper to send a request without a body.
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri).await
}

/// Helper to make a POST request.
pub async fn post(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "POST", uri).await
}
