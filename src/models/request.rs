//! Represents a donation center asking for a specific donation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

/// Matches one donation with the center that wants it.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct DonationRequest {
    pub id: Uuid,

    /// Donation being requested.
    pub donation_id: Uuid,

    /// Center asking for it.
    pub center_id: Uuid,

    pub status: RequestStatus,

    /// Optional note from the center.
    pub message: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct NewDonationRequest {
    pub donation_id: Uuid,
    pub center_id: Uuid,
    #[serde(default)]
    pub message: String,
}
