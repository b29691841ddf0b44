//! Caller identification.
//!
//! Credentials are issued elsewhere; this service only resolves an opaque
//! bearer token to the owner id it was issued for.

use crate::{errors::AppError, services::record_store::db_timestamp, state::AppState};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// The owner on whose behalf a request is made.
#[derive(Clone, Copy, Debug)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Missing auth token"))?;

        let owner = sqlx::query_scalar::<_, Uuid>("SELECT owner_id FROM api_tokens WHERE token = ?")
            .bind(token)
            .fetch_optional(&*state.records.db)
            .await
            .map_err(|err| {
                tracing::error!("token lookup failed: {}", err);
                AppError::internal("token lookup failed")
            })?;

        match owner {
            Some(id) => Ok(AuthenticatedUser { id }),
            None => Err(AppError::unauthorized("Invalid auth token")),
        }
    }
}

/// Read `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Create a fresh token for a new owner id. Used by `--issue-token`.
pub async fn issue_token(db: &SqlitePool) -> sqlx::Result<(Uuid, String)> {
    let owner_id = Uuid::new_v4();
    let token = Uuid::new_v4().simple().to_string();
    sqlx::query("INSERT INTO api_tokens (token, owner_id, created_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(owner_id)
        .bind(db_timestamp(Utc::now()))
        .execute(db)
        .await?;
    Ok((owner_id, token))
}
