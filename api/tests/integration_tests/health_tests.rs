//! Integration tests for the health check.

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let app = test_app(Some(""));

    let (status, response) = get(app.app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "pulsewatch-api");
    assert_eq!(response["log_file_present"], true);
    assert_eq!(response["recorder_running"], false);
}

#[tokio::test]
async fn test_health_check_without_log_file() {
    let app = test_app(None);

    let (status, response) = get(app.app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["log_file_present"], false);
}
