//! `GET /reports` — aggregated waste/donation statistics.

use crate::{
    auth::AuthenticatedUser, errors::AppError, models::report::Report,
    services::time_window::TimeRange, state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub time_range: Option<String>,
}

/// Build the report for `?time_range=week|month|year`.
///
/// Unrecognized or missing ranges produce the 30-day report. Failing facets
/// come back empty; only an assembler failure yields a 500.
pub async fn get_report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(q): Query<ReportQuery>,
) -> Result<Json<Report>, AppError> {
    let range = TimeRange::parse(q.time_range.as_deref());
    tracing::debug!("report requested by {} for range {}", user.id, range);

    let report = state.reports.build_report(range, Utc::now()).await?;
    Ok(Json(report))
}
