//! Core data models for the food tracker.
//!
//! Records map to database tables via `sqlx::FromRow` and serialize as JSON
//! via `serde`. The `report` module holds the aggregated output shapes.

pub mod center;
pub mod donation;
pub mod report;
pub mod request;
pub mod waste;
