//! Represents food that was thrown away instead of donated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WasteReason {
    Spoilage,
    Overproduction,
    Expired,
    Damaged,
    Other,
}

/// A waste log entry. Waste records are immutable once written.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct WasteRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub reason: WasteReason,

    /// Quantity in kilograms. Always strictly positive.
    pub quantity: f64,

    pub center_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when logging new waste.
#[derive(Deserialize, Clone, Debug)]
pub struct NewWasteRecord {
    pub name: String,
    pub reason: WasteReason,
    pub quantity: f64,
    pub center_id: Option<Uuid>,
}
