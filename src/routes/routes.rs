//! Defines routes for the food tracker API.
//!
//! ## Structure
//! - **Health** (no auth)
//!   - `GET   /healthz`, `GET /readyz`
//!
//! - **Reports**
//!   - `GET   /reports?time_range=week|month|year`
//!
//! - **Records**
//!   - `GET   /donations` / `POST /donations`
//!   - `PATCH /donations/{id}/status`
//!   - `GET   /donations/expiring` / `POST /donations/expire`
//!   - `GET   /requests` / `POST /requests`
//!   - `PATCH /requests/{id}/status`
//!   - `GET   /waste` / `POST /waste`
//!   - `GET   /centers` / `POST /centers`
//!
//! Everything except the health checks requires `Authorization: Bearer <token>`.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        record_handlers::{
            create_center, create_donation, create_request, create_waste, expire_donations,
            list_centers, list_donations, list_expiring_donations, list_requests, list_waste,
            update_donation_status, update_request_status,
        },
        report_handlers::get_report,
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Build and return the router for the whole API.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/reports", get(get_report))
        .route("/donations", get(list_donations).post(create_donation))
        .route("/donations/expiring", get(list_expiring_donations))
        .route("/donations/expire", post(expire_donations))
        .route("/donations/{id}/status", patch(update_donation_status))
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/{id}/status", patch(update_request_status))
        .route("/waste", get(list_waste).post(create_waste))
        .route("/centers", get(list_centers).post(create_center))
}
