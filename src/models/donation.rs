//! Represents a food donation logged by a user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of food being donated.
///
/// Stored as its variant name in SQLite and serialized the same way in JSON.
#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FoodCategory {
    Fruit,
    Vegetable,
    Meat,
    Dairy,
    Bakery,
    Canned,
    Other,
}

/// Lifecycle state of a donation. Only `Donated` counts toward the
/// environmental-impact figures of a report.
#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DonationStatus {
    #[default]
    Available,
    Reserved,
    Donated,
    Expired,
}

/// A single donation entry.
///
/// Everything except `status` and `updated_at` is fixed at creation.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Donation {
    /// Internal UUID for DB indexing.
    pub id: Uuid,

    /// User who logged the donation.
    pub owner_id: Uuid,

    /// Free-form label, e.g. "Day-old bread".
    pub name: String,

    pub category: FoodCategory,

    /// Optional notes from the donor.
    pub description: String,

    /// Quantity in kilograms. Always strictly positive.
    pub quantity: f64,

    pub status: DonationStatus,

    /// Last day the food is good to hand out.
    pub expiration_date: NaiveDate,

    /// Donation center this record is linked to, if any.
    pub center_id: Option<Uuid>,

    /// When the donation was logged. Never changes.
    pub created_at: DateTime<Utc>,

    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    /// True once `today` is past the expiration date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date < today
    }
}

/// Fields accepted when logging a new donation.
#[derive(Deserialize, Clone, Debug)]
pub struct NewDonation {
    pub name: String,
    pub category: FoodCategory,
    #[serde(default)]
    pub description: String,
    pub quantity: f64,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub status: DonationStatus,
    pub center_id: Option<Uuid>,
}
