//! API route definitions.
//!
//! This module organizes all HTTP routes for the Pulsewatch API server.

mod health;
mod recorder;
mod series;

pub use health::health_routes;
pub use recorder::recorder_routes;
pub use series::series_routes;
