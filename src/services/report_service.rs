//! src/services/report_service.rs
//!
//! ReportService — assembles the dashboard report from the grouped queries
//! of `RecordStore`.
//!
//! Every facet (waste trend, donation stats, waste categories, center
//! performance, environmental impact) is queried independently. A facet
//! whose query fails is logged and replaced by its empty value, so one
//! broken aggregation never takes the whole report down. Only failures
//! outside a facet surface as `ReportError`.

use crate::{
    models::report::{
        CenterPerformance, DonationStat, EnvironmentalImpact, Report, WasteCategory,
        WasteTrendPoint,
    },
    services::{
        record_store::{RecordStore, StoreResult},
        time_window::{TimeRange, TimeWindow},
    },
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

/// Kilograms of CO2 avoided per kilogram of food donated.
const CO2_PER_KG: f64 = 2.5;
/// Litres of water saved per kilogram of food donated.
const WATER_LITRES_PER_KG: f64 = 1000.0;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot compute a `{range}` window ending at {now}")]
    WindowOutOfRange { range: TimeRange, now: DateTime<Utc> },
}

#[derive(Clone)]
pub struct ReportService {
    store: RecordStore,
}

impl ReportService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Build the report for `range`, with the window ending at `now`.
    ///
    /// All five queries run concurrently against the pool. Nothing is
    /// cached: two calls with no writes in between return identical reports.
    #[tracing::instrument(skip(self))]
    pub async fn build_report(
        &self,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<Report, ReportError> {
        let window = TimeWindow::ending_at(range, now)
            .ok_or(ReportError::WindowOutOfRange { range, now })?;

        let (trend, donations, reasons, centers, donated) = tokio::join!(
            self.store.waste_trend(&window),
            self.store.donation_totals_by_category(&window),
            self.store.waste_totals_by_reason(&window),
            self.store.center_performance(),
            self.store.donated_total(&window),
        );

        let waste_trends = facet_or_default("waste_trends", trend)
            .into_iter()
            .map(|(date, amount)| WasteTrendPoint { date, amount })
            .collect();
        let donation_stats = facet_or_default("donation_stats", donations)
            .into_iter()
            .map(|(category, amount)| DonationStat { category, amount })
            .collect();
        let waste_categories = facet_or_default("waste_categories", reasons)
            .into_iter()
            .map(|(name, value)| WasteCategory { name, value })
            .collect();
        let center_performance: Vec<CenterPerformance> =
            facet_or_default("center_performance", centers);
        let environmental_impact =
            estimate_impact(facet_or_default("environmental_impact", donated));

        info!(
            start = %window.start,
            end = %window.end,
            "report assembled"
        );

        Ok(Report {
            waste_trends,
            donation_stats,
            waste_categories,
            center_performance,
            environmental_impact,
        })
    }
}

/// Unwrap a facet result, degrading to the empty value on failure.
fn facet_or_default<T: Default>(facet: &'static str, result: StoreResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(facet, error = %err, "report facet failed, returning empty result");
            T::default()
        }
    }
}

/// Environmental impact of `donated_kg` kilograms of donated food.
pub fn estimate_impact(donated_kg: f64) -> EnvironmentalImpact {
    EnvironmentalImpact {
        co2_saved: round2(donated_kg * CO2_PER_KG),
        water_saved: round2(donated_kg * WATER_LITRES_PER_KG),
        food_saved: round2(donated_kg),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
