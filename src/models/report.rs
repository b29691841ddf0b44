//! Shapes returned by `GET /reports`.
//!
//! Field names are camelCase on the wire to match what dashboard clients
//! already consume.

use super::{donation::FoodCategory, waste::WasteReason};
use chrono::NaiveDate;
use serde::Serialize;

/// Total waste logged on one calendar day.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WasteTrendPoint {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DonationStat {
    pub category: FoodCategory,
    pub amount: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WasteCategory {
    pub name: WasteReason,
    pub value: f64,
}

/// Number of records linked to a center, regardless of the report window.
#[derive(Serialize, Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct CenterPerformance {
    pub name: String,
    pub donations: i64,
    pub waste: i64,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub co2_saved: f64,
    pub water_saved: f64,
    pub food_saved: f64,
}

/// The full report body.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub waste_trends: Vec<WasteTrendPoint>,
    pub donation_stats: Vec<DonationStat>,
    pub waste_categories: Vec<WasteCategory>,
    pub center_performance: Vec<CenterPerformance>,
    pub environmental_impact: EnvironmentalImpact,
}
