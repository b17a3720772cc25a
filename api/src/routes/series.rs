//! Series query endpoint.
//!
//! Serves the bucketed pulse series the dashboard plots. Every request
//! re-reads the pulse log, so refreshing the plot picks up new readings.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::models::Bucket;
use shared::pipeline::{run_query, QueryError};
use shared::query::{parse_date, RangeError, WindowQuery};
use shared::storage::LoadError;
use thiserror::Error;

/// Query parameters for the series endpoint.
///
/// Missing values fall back to the dashboard defaults: from yesterday
/// `00:00` to today `23:59`, one measurement per bucket.
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub points: Option<String>,
}

/// Rejected query parameters.
#[derive(Debug, Error)]
enum ParamsError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("Invalid points: '{0}'. Expected an integer")]
    Points(String),
}

impl SeriesQueryParams {
    /// Builds the window query, resolving defaults relative to `today`.
    ///
    /// An empty `points` value counts as missing.
    fn into_window_query(self, today: NaiveDate) -> Result<WindowQuery, ParamsError> {
        let start_date = match self.start_date {
            Some(date) => parse_date(&date)?,
            None => today - Duration::days(1),
        };
        let end_date = match self.end_date {
            Some(date) => parse_date(&date)?,
            None => today,
        };

        let mut query = WindowQuery::new(start_date, end_date);
        if let Some(start_time) = self.start_time {
            query = query.with_start_time(start_time);
        }
        if let Some(end_time) = self.end_time {
            query = query.with_end_time(end_time);
        }
        if let Some(points) = self.points.as_deref().map(str::trim) {
            if !points.is_empty() {
                let points = points
                    .parse::<i64>()
                    .map_err(|_| ParamsError::Points(points.to_string()))?;
                query = query.with_points(points);
            }
        }
        Ok(query)
    }
}

/// Response for series queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct SeriesResponse {
    /// Plot title.
    pub title: String,
    /// Measurements summed into each bucket, after clamping.
    pub points: usize,
    /// The buckets, in log order.
    pub buckets: Vec<Bucket>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SeriesError {
    pub error: String,
    pub message: String,
}

type SeriesResult<T> = Result<T, (StatusCode, Json<SeriesError>)>;

fn error_response(
    status: StatusCode,
    error: &str,
    message: String,
) -> (StatusCode, Json<SeriesError>) {
    (
        status,
        Json(SeriesError {
            error: error.to_string(),
            message,
        }),
    )
}

fn range_error(e: &RangeError) -> (StatusCode, Json<SeriesError>) {
    error_response(StatusCode::BAD_REQUEST, "invalid_range", e.to_string())
}

fn params_error(e: &ParamsError) -> (StatusCode, Json<SeriesError>) {
    match e {
        ParamsError::Range(e) => range_error(e),
        ParamsError::Points(_) => {
            error_response(StatusCode::BAD_REQUEST, "invalid_points", e.to_string())
        }
    }
}

fn query_error(e: &QueryError) -> (StatusCode, Json<SeriesError>) {
    match e {
        QueryError::Range(e) => range_error(e),
        QueryError::Load(LoadError::Parse { .. }) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_log_line",
            e.to_string(),
        ),
        QueryError::Load(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "log_unavailable",
            e.to_string(),
        ),
    }
}

/// Creates the series routes.
pub fn series_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/series", get(query_series))
        .with_state(state)
}

async fn query_series(
    State(state): State<AppState>,
    Query(params): Query<SeriesQueryParams>,
) -> SeriesResult<Json<SeriesResponse>> {
    let query = params
        .into_window_query(Local::now().date_naive())
        .map_err(|e| params_error(&e))?;
    let points = query.bucket_size();

    let log = state.pulse_log().clone();
    let buckets = tokio::task::spawn_blocking(move || run_query(&log, &query))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Series query task failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Series query task failed".to_string(),
            )
        })?
        .map_err(|e| {
            tracing::warn!(error = %e, "Series query rejected");
            query_error(&e)
        })?;

    Ok(Json(SeriesResponse {
        title: format!("Sum of Every {points} Pulses_per_10s Over Time"),
        points,
        buckets,
    }))
}
