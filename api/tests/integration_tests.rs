//! Integration tests for the Pulsewatch API.
//!
//! These tests drive the full router against a temporary pulse log and
//! cover series queries, recorder control and the health check.

#[path = "integration_tests/common/mod.rs"]
mod common;
#[path = "integration_tests/health_tests.rs"]
mod health_tests;
#[path = "integration_tests/recorder_tests.rs"]
mod recorder_tests;
#[path = "integration_tests/series_tests.rs"]
mod series_tests;
