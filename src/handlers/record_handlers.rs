//! HTTP handlers for logging and listing donations, waste, centers and
//! donation requests.
//! Validation lives in `RecordStore`; handlers only map requests onto it.

use crate::{
    auth::AuthenticatedUser,
    errors::AppError,
    models::{
        center::{DonationCenter, NewDonationCenter},
        donation::{Donation, DonationStatus, NewDonation},
        request::{DonationRequest, NewDonationRequest, RequestStatus},
        waste::{NewWasteRecord, WasteRecord},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional filter for `GET /donations`.
#[derive(Debug, Deserialize)]
pub struct DonationListQuery {
    pub status: Option<DonationStatus>,
}

/// Body of `PATCH /donations/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: DonationStatus,
}

/// `POST /donations`
pub async fn create_donation(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<NewDonation>,
) -> Result<(StatusCode, Json<Donation>), AppError> {
    let donation = state.records.create_donation(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

/// `GET /donations?status=`
pub async fn list_donations(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(q): Query<DonationListQuery>,
) -> Result<Json<Vec<Donation>>, AppError> {
    Ok(Json(state.records.list_donations(q.status).await?))
}

/// `PATCH /donations/{id}/status`
pub async fn update_donation_status(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<Donation>, AppError> {
    let donation = state.records.update_donation_status(id, payload.status).await?;
    Ok(Json(donation))
}

/// Entry of `GET /donations/expiring`.
#[derive(Debug, Serialize)]
pub struct ExpiringDonation {
    #[serde(flatten)]
    pub donation: Donation,
    pub is_expired: bool,
}

/// `GET /donations/expiring`
///
/// The caller's available donations, soonest expiration first.
pub async fn list_expiring_donations(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<ExpiringDonation>>, AppError> {
    let today = Utc::now().date_naive();
    let donations = state.records.list_expiring(user.id).await?;
    Ok(Json(
        donations
            .into_iter()
            .map(|donation| ExpiringDonation {
                is_expired: donation.is_expired(today),
                donation,
            })
            .collect(),
    ))
}

#[derive(Debug, Serialize)]
pub struct ExpireSummary {
    pub expired: u64,
}

/// `POST /donations/expire`
pub async fn expire_donations(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<ExpireSummary>, AppError> {
    let expired = state.records.expire_overdue(Utc::now().date_naive()).await?;
    Ok(Json(ExpireSummary { expired }))
}

/// Optional filter for `GET /requests`.
#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<RequestStatus>,
}

/// Body of `PATCH /requests/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct RequestStatusUpdate {
    pub status: RequestStatus,
}

/// `POST /requests`
pub async fn create_request(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<NewDonationRequest>,
) -> Result<(StatusCode, Json<DonationRequest>), AppError> {
    let request = state.records.create_request(payload).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// `GET /requests?status=`
pub async fn list_requests(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(q): Query<RequestListQuery>,
) -> Result<Json<Vec<DonationRequest>>, AppError> {
    Ok(Json(state.records.list_requests(q.status).await?))
}

/// `PATCH /requests/{id}/status`
pub async fn update_request_status(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RequestStatusUpdate>,
) -> Result<Json<DonationRequest>, AppError> {
    let request = state.records.update_request_status(id, payload.status).await?;
    Ok(Json(request))
}

/// `POST /waste`
pub async fn create_waste(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<NewWasteRecord>,
) -> Result<(StatusCode, Json<WasteRecord>), AppError> {
    let record = state.records.create_waste(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /waste`
pub async fn list_waste(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<WasteRecord>>, AppError> {
    Ok(Json(state.records.list_waste().await?))
}

/// `POST /centers`
pub async fn create_center(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<NewDonationCenter>,
) -> Result<(StatusCode, Json<DonationCenter>), AppError> {
    let center = state.records.create_center(payload).await?;
    Ok((StatusCode::CREATED, Json(center)))
}

/// `GET /centers`
pub async fn list_centers(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<DonationCenter>>, AppError> {
    Ok(Json(state.records.list_centers().await?))
}
