//! Represents a donation center that receives food.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A physical location that accepts donations.
///
/// Centers are only aggregated indirectly, through the number of donation
/// and waste records that reference them.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct DonationCenter {
    /// Internal UUID for DB indexing.
    pub id: Uuid,

    /// Display name shown in reports.
    pub name: String,

    /// Street address.
    pub address: String,

    pub latitude: f64,
    pub longitude: f64,

    /// Contact phone number.
    pub phone: String,

    /// Contact e-mail address.
    pub email: String,

    /// Optional public website.
    pub website: Option<String>,

    /// Whether the center currently accepts donations.
    pub is_active: bool,

    /// When this center was registered.
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when registering a center.
#[derive(Deserialize, Clone, Debug)]
pub struct NewDonationCenter {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub website: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
