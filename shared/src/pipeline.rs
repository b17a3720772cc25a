//! End-to-end series query: load the pulse log, then filter and aggregate.

use crate::models::Bucket;
use crate::query::{filter_and_aggregate, RangeError, WindowQuery};
use crate::storage::{LoadError, PulseLog};
use thiserror::Error;

/// Errors that can occur while answering a series query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The pulse log could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The query window is malformed.
    #[error(transparent)]
    Range(#[from] RangeError),
}

/// Loads `log` afresh and returns the buckets for `query`.
///
/// Nothing is cached between calls, so each query sees every line appended
/// to the log so far.
///
/// # Errors
///
/// Returns an error if the log cannot be loaded or the query window is
/// malformed.
pub fn run_query(log: &PulseLog, query: &WindowQuery) -> Result<Vec<Bucket>, QueryError> {
    let series = log.load()?;
    let buckets = filter_and_aggregate(&series, query)?;
    Ok(buckets)
}
