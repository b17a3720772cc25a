//! Integration tests for recorder control.

use api::{ProcessRecorder, RecorderControl};
use axum::http::StatusCode;
use std::sync::Arc;

use super::common::{get, post, test_app, test_app_with_recorder};

#[tokio::test]
async fn test_status_when_unconfigured() {
    let app = test_app(Some(""));

    let (status, response) = get(app.app(), "/api/v1/recorder").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["running"], false);
    assert_eq!(response["message"], "recorder is not running");

    let (status, response) = post(app.app(), "/api/v1/recorder/start").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response["error"], "recorder_unconfigured");
}

#[cfg(unix)]
#[tokio::test]
async fn test_start_and_stop_process() {
    let recorder: Arc<dyn RecorderControl> = Arc::new(ProcessRecorder::new(Some(vec![
        "sleep".to_string(),
        "30".to_string(),
    ])));
    let app = test_app_with_recorder(Some(""), Arc::clone(&recorder));

    let (status, response) = post(app.app(), "/api/v1/recorder/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "recorder is running");
    assert!(recorder.is_running());

    let (_, response) = get(app.app(), "/health").await;
    assert_eq!(response["recorder_running"], true);

    let (_, response) = post(app.app(), "/api/v1/recorder/start").await;
    assert_eq!(response["message"], "recorder is already running");

    let (status, response) = post(app.app(), "/api/v1/recorder/stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "recorder has been stopped");
    assert!(!recorder.is_running());

    let (_, response) = post(app.app(), "/api/v1/recorder/stop").await;
    assert_eq!(response["message"], "recorder is not running");
}
