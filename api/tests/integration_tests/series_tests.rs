//! Integration tests for series queries.
//!
//! Tests cover:
//! - Filtering by date and time of day, both ends inclusive
//! - Bucket labelling and the dropped trailing bucket
//! - Error mapping for malformed logs and ranges
//! - Picking up lines appended between requests

use axum::http::StatusCode;
use std::io::Write;

use super::common::{get, test_app};

const DAY: &str = "2024-01-01 10:00:00 - Pulses_per_10s: 3
2024-01-01 10:00:10 - Pulses_per_10s: 5
2024-01-01 10:00:20 - Pulses_per_10s: 7
2024-01-01 10:00:30 - Pulses_per_10s: 11
2024-01-01 10:00:40 - Pulses_per_10s: 13
2024-01-02 09:00:00 - Pulses_per_10s: 100
";

fn values(response: &serde_json::Value) -> Vec<i64> {
    response["buckets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["value"].as_i64().unwrap())
        .collect()
}

fn timestamps(response: &serde_json::Value) -> Vec<String> {
    response["buckets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["timestamp"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_bucket_labels_and_sums() {
    let app = test_app(Some(DAY));

    let (status, response) = get(
        app.app(),
        "/api/v1/series?start_date=2024-01-01&end_date=2024-01-01&points=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(values(&response), vec![8, 18]);
    assert_eq!(
        timestamps(&response),
        vec!["2024-01-01T10:00:00", "2024-01-01T10:00:20"]
    );
}

#[tokio::test]
async fn test_range_ends_are_inclusive() {
    let app = test_app(Some(DAY));

    let (status, response) = get(
        app.app(),
        "/api/v1/series?start_date=2024-01-01&end_date=2024-01-02&start_time=10:00&end_time=09:00",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(values(&response), vec![3, 5, 7, 11, 13, 100]);
}

#[tokio::test]
async fn test_time_of_day_filter() {
    let app = test_app(Some(DAY));

    let (_, response) = get(
        app.app(),
        "/api/v1/series?start_date=2024-01-01&end_date=2024-01-01&start_time=09:00&end_time=10:00",
    )
    .await;

    assert_eq!(values(&response), vec![3]);
}

#[tokio::test]
async fn test_zero_points_acts_as_one() {
    let app = test_app(Some(DAY));

    let (_, response) = get(
        app.app(),
        "/api/v1/series?start_date=2024-01-01&end_date=2024-01-01&points=0",
    )
    .await;

    assert_eq!(response["points"], 1);
    assert_eq!(values(&response), vec![3, 5, 7, 11, 13]);
}

#[tokio::test]
async fn test_empty_log_yields_no_buckets() {
    let app = test_app(Some(""));

    let (status, response) = get(app.app(), "/api/v1/series?points=5").await;

    assert_eq!(status, StatusCode::OK);
    assert!(response["buckets"].as_array().unwrap().is_empty());
    assert_eq!(response["title"], "Sum of Every 5 Pulses_per_10s Over Time");
}

#[tokio::test]
async fn test_bad_time_of_day_is_rejected() {
    let app = test_app(Some(DAY));

    let (status, response) = get(app.app(), "/api/v1/series?start_time=25:99").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_range");
    assert!(response["message"].as_str().unwrap().contains("25:99"));
}

#[tokio::test]
async fn test_malformed_line_fails_whole_query() {
    let app = test_app(Some(
        "2024-01-01 10:00:00 - Pulses_per_10s: 3\n2024-01-01 10:00:10 - Pulses_per_10s: abc\n",
    ));

    let (status, response) = get(app.app(), "/api/v1/series").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"], "invalid_log_line");
    assert!(response["message"].as_str().unwrap().contains("line 2"));
}

#[tokio::test]
async fn test_non_utf8_line_is_malformed() {
    let app = test_app(None);
    std::fs::write(
        app.dir.path().join("pulses.txt"),
        b"2024-01-01 10:00:00 - Pulses_per_10s: 3\n\xff\xfe garbage\n",
    )
    .unwrap();

    let (status, response) = get(app.app(), "/api/v1/series").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"], "invalid_log_line");
    assert!(response["message"].as_str().unwrap().contains("line 2"));
}

#[tokio::test]
async fn test_points_parameter_errors_are_json() {
    let app = test_app(Some(DAY));

    let (status, response) = get(app.app(), "/api/v1/series?points=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_points");

    let (status, response) = get(
        app.app(),
        "/api/v1/series?start_date=2024-01-01&end_date=2024-01-01&points=",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["points"], 1);
    assert_eq!(values(&response), vec![3, 5, 7, 11, 13]);
}

#[tokio::test]
async fn test_appended_lines_visible_on_next_query() {
    let app = test_app(Some("2024-01-01 10:00:00 - Pulses_per_10s: 3\n"));
    let uri = "/api/v1/series?start_date=2024-01-01&end_date=2024-01-01";

    let (_, response) = get(app.app(), uri).await;
    assert_eq!(values(&response), vec![3]);

    let mut appender = app.state.pulse_log().appender().unwrap();
    writeln!(appender, "2024-01-01 10:00:10 - Pulses_per_10s: 5").unwrap();
    appender.flush().unwrap();

    let (_, response) = get(app.app(), uri).await;
    assert_eq!(values(&response), vec![3, 5]);
    assert!(app.dir.path().join("pulses.txt").is_file());
}
