//! src/services/record_store.rs
//!
//! RecordStore — SQLite-backed persistence for donations, waste records and
//! donation centers, plus the grouped queries the report is built from.
//!
//! Timestamps are written as fixed-width UTC RFC 3339 text so that window
//! filters can compare them lexically and the first ten characters are the
//! calendar day.

use crate::{
    models::{
        center::{DonationCenter, NewDonationCenter},
        donation::{Donation, DonationStatus, FoodCategory, NewDonation},
        report::CenterPerformance,
        request::{DonationRequest, NewDonationRequest, RequestStatus},
        waste::{NewWasteRecord, WasteReason, WasteRecord},
    },
    services::time_window::TimeWindow,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("quantity must be a positive number no larger than 1000000 kg, got {0}")]
    InvalidQuantity(f64),
    #[error("donation `{0}` not found")]
    DonationNotFound(Uuid),
    #[error("donation center `{0}` not found")]
    CenterNotFound(Uuid),
    #[error("donation request `{0}` not found")]
    RequestNotFound(Uuid),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Largest quantity accepted for a single record, in kilograms.
pub const MAX_QUANTITY_KG: f64 = 1_000_000.0;

const DONATION_COLUMNS: &str = "id, owner_id, name, category, description, quantity, status, \
     expiration_date, center_id, created_at, updated_at";
const WASTE_COLUMNS: &str = "id, owner_id, name, reason, quantity, center_id, created_at";
const CENTER_COLUMNS: &str =
    "id, name, address, latitude, longitude, phone, email, website, is_active, created_at";
const REQUEST_COLUMNS: &str = "id, donation_id, center_id, status, message, created_at, updated_at";

/// RecordStore provides:
/// - Record writes (donations, waste, centers) with quantity validation
/// - Donation status transitions and expiry sweeps
/// - Donation requests from centers
/// - Listing queries for the CRUD endpoints
/// - Window-restricted aggregate queries used by the report
#[derive(Clone)]
pub struct RecordStore {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl RecordStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Reject zero, negative, non-finite and oversized quantities.
    fn ensure_quantity_valid(quantity: f64) -> StoreResult<()> {
        if quantity.is_finite() && quantity > 0.0 && quantity <= MAX_QUANTITY_KG {
            Ok(())
        } else {
            Err(StoreError::InvalidQuantity(quantity))
        }
    }

    /// Verify an optional center reference points at an existing row.
    async fn ensure_center_exists(&self, center_id: Option<Uuid>) -> StoreResult<()> {
        let Some(id) = center_id else {
            return Ok(());
        };
        let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donation_centers WHERE id = ?")
            .bind(id)
            .fetch_one(&*self.db)
            .await?;
        if found == 0 {
            return Err(StoreError::CenterNotFound(id));
        }
        Ok(())
    }

    /// Log a donation owned by `owner_id`, timestamped now.
    pub async fn create_donation(&self, owner_id: Uuid, new: NewDonation) -> StoreResult<Donation> {
        self.create_donation_at(owner_id, new, Utc::now()).await
    }

    /// Log a donation with an explicit creation time.
    pub async fn create_donation_at(
        &self,
        owner_id: Uuid,
        new: NewDonation,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Donation> {
        Self::ensure_quantity_valid(new.quantity)?;
        self.ensure_center_exists(new.center_id).await?;

        let stamp = db_timestamp(created_at);
        let donation = sqlx::query_as::<_, Donation>(&format!(
            "INSERT INTO donations ({DONATION_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {DONATION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&new.name)
        .bind(new.category)
        .bind(&new.description)
        .bind(new.quantity)
        .bind(new.status)
        .bind(new.expiration_date)
        .bind(new.center_id)
        .bind(&stamp)
        .bind(&stamp)
        .fetch_one(&*self.db)
        .await?;

        debug!("created donation {} ({:?}, {})", donation.id, donation.category, donation.quantity);
        Ok(donation)
    }

    /// List donations newest first, optionally restricted to one status.
    pub async fn list_donations(&self, status: Option<DonationStatus>) -> StoreResult<Vec<Donation>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {DONATION_COLUMNS} FROM donations"));
        if let Some(status) = status {
            builder.push(" WHERE status = ");
            builder.push_bind(status);
        }
        builder.push(" ORDER BY created_at DESC, id ASC");

        let rows: Vec<Donation> = builder.build_query_as().fetch_all(&*self.db).await?;
        Ok(rows)
    }

    /// Move a donation to a new status. `created_at` is left untouched.
    pub async fn update_donation_status(
        &self,
        id: Uuid,
        status: DonationStatus,
    ) -> StoreResult<Donation> {
        sqlx::query_as::<_, Donation>(&format!(
            "UPDATE donations SET status = ?, updated_at = ? WHERE id = ?
             RETURNING {DONATION_COLUMNS}"
        ))
        .bind(status)
        .bind(db_timestamp(Utc::now()))
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => StoreError::DonationNotFound(id),
            other => StoreError::Sqlx(other),
        })
    }

    /// Available donations of `owner_id`, soonest expiration first.
    pub async fn list_expiring(&self, owner_id: Uuid) -> StoreResult<Vec<Donation>> {
        let rows = sqlx::query_as::<_, Donation>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations
             WHERE owner_id = ? AND status = ?
             ORDER BY expiration_date ASC, created_at ASC, id ASC"
        ))
        .bind(owner_id)
        .bind(DonationStatus::Available)
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    /// Mark every available or reserved donation whose expiration date is
    /// before `today` as `Expired`. Returns how many rows changed.
    pub async fn expire_overdue(&self, today: NaiveDate) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE donations SET status = ?, updated_at = ?
             WHERE status IN (?, ?) AND expiration_date < ?",
        )
        .bind(DonationStatus::Expired)
        .bind(db_timestamp(Utc::now()))
        .bind(DonationStatus::Available)
        .bind(DonationStatus::Reserved)
        .bind(today)
        .execute(&*self.db)
        .await?;

        let expired = result.rows_affected();
        if expired > 0 {
            debug!("expired {expired} donations past {today}");
        }
        Ok(expired)
    }

    /// Record a center's request for a donation. Starts out `Pending`.
    pub async fn create_request(&self, new: NewDonationRequest) -> StoreResult<DonationRequest> {
        let donations = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donations WHERE id = ?")
            .bind(new.donation_id)
            .fetch_one(&*self.db)
            .await?;
        if donations == 0 {
            return Err(StoreError::DonationNotFound(new.donation_id));
        }
        self.ensure_center_exists(Some(new.center_id)).await?;

        let stamp = db_timestamp(Utc::now());
        let request = sqlx::query_as::<_, DonationRequest>(&format!(
            "INSERT INTO donation_requests ({REQUEST_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.donation_id)
        .bind(new.center_id)
        .bind(RequestStatus::Pending)
        .bind(&new.message)
        .bind(&stamp)
        .bind(&stamp)
        .fetch_one(&*self.db)
        .await?;

        debug!("created request {} for donation {}", request.id, request.donation_id);
        Ok(request)
    }

    /// List requests newest first, optionally restricted to one status.
    pub async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> StoreResult<Vec<DonationRequest>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {REQUEST_COLUMNS} FROM donation_requests"));
        if let Some(status) = status {
            builder.push(" WHERE status = ");
            builder.push_bind(status);
        }
        builder.push(" ORDER BY created_at DESC, id ASC");

        let rows: Vec<DonationRequest> = builder.build_query_as().fetch_all(&*self.db).await?;
        Ok(rows)
    }

    /// Move a request to a new status.
    ///
    /// Approving a request reserves its donation and completing it marks the
    /// donation as donated. Both rows change in one transaction.
    pub async fn update_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> StoreResult<DonationRequest> {
        let stamp = db_timestamp(Utc::now());
        let mut tx = self.db.begin().await?;

        let request = sqlx::query_as::<_, DonationRequest>(&format!(
            "UPDATE donation_requests SET status = ?, updated_at = ? WHERE id = ?
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(status)
        .bind(&stamp)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => StoreError::RequestNotFound(id),
            other => StoreError::Sqlx(other),
        })?;

        let donation_status = match status {
            RequestStatus::Approved => Some(DonationStatus::Reserved),
            RequestStatus::Completed => Some(DonationStatus::Donated),
            RequestStatus::Pending | RequestStatus::Rejected => None,
        };
        if let Some(donation_status) = donation_status {
            sqlx::query("UPDATE donations SET status = ?, updated_at = ? WHERE id = ?")
                .bind(donation_status)
                .bind(&stamp)
                .bind(request.donation_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!("request {id} moved to {status:?}");
        Ok(request)
    }

    /// Log wasted food owned by `owner_id`, timestamped now.
    pub async fn create_waste(&self, owner_id: Uuid, new: NewWasteRecord) -> StoreResult<WasteRecord> {
        self.create_waste_at(owner_id, new, Utc::now()).await
    }

    pub async fn create_waste_at(
        &self,
        owner_id: Uuid,
        new: NewWasteRecord,
        created_at: DateTime<Utc>,
    ) -> StoreResult<WasteRecord> {
        Self::ensure_quantity_valid(new.quantity)?;
        self.ensure_center_exists(new.center_id).await?;

        let record = sqlx::query_as::<_, WasteRecord>(&format!(
            "INSERT INTO waste_records ({WASTE_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {WASTE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&new.name)
        .bind(new.reason)
        .bind(new.quantity)
        .bind(new.center_id)
        .bind(db_timestamp(created_at))
        .fetch_one(&*self.db)
        .await?;

        debug!("created waste record {} ({:?}, {})", record.id, record.reason, record.quantity);
        Ok(record)
    }

    pub async fn list_waste(&self) -> StoreResult<Vec<WasteRecord>> {
        let rows = sqlx::query_as::<_, WasteRecord>(&format!(
            "SELECT {WASTE_COLUMNS} FROM waste_records ORDER BY created_at DESC, id ASC"
        ))
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    /// Register a donation center.
    pub async fn create_center(&self, new: NewDonationCenter) -> StoreResult<DonationCenter> {
        let center = sqlx::query_as::<_, DonationCenter>(&format!(
            "INSERT INTO donation_centers ({CENTER_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {CENTER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.address)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.website)
        .bind(new.is_active)
        .bind(db_timestamp(Utc::now()))
        .fetch_one(&*self.db)
        .await?;
        Ok(center)
    }

    pub async fn list_centers(&self) -> StoreResult<Vec<DonationCenter>> {
        let rows = sqlx::query_as::<_, DonationCenter>(&format!(
            "SELECT {CENTER_COLUMNS} FROM donation_centers ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    /// Waste quantity per UTC calendar day inside `window`, oldest day first.
    pub async fn waste_trend(&self, window: &TimeWindow) -> StoreResult<Vec<(NaiveDate, f64)>> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            "SELECT substr(created_at, 1, 10) AS day, COALESCE(SUM(quantity), 0.0) AS amount
             FROM waste_records
             WHERE created_at >= ? AND created_at <= ?
             GROUP BY day
             ORDER BY day ASC",
        )
        .bind(db_timestamp(window.start))
        .bind(db_timestamp(window.end))
        .fetch_all(&*self.db)
        .await?;

        rows.into_iter()
            .map(|(day, amount)| {
                let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                    .map_err(|err| StoreError::Sqlx(sqlx::Error::Decode(Box::new(err))))?;
                Ok((date, amount))
            })
            .collect()
    }

    /// Donated quantity per category inside `window`, all statuses included.
    /// Categories without records are absent from the result.
    pub async fn donation_totals_by_category(
        &self,
        window: &TimeWindow,
    ) -> StoreResult<Vec<(FoodCategory, f64)>> {
        let rows = sqlx::query_as::<_, (FoodCategory, f64)>(
            "SELECT category, COALESCE(SUM(quantity), 0.0) AS amount
             FROM donations
             WHERE created_at >= ? AND created_at <= ?
             GROUP BY category
             ORDER BY category ASC",
        )
        .bind(db_timestamp(window.start))
        .bind(db_timestamp(window.end))
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    /// Wasted quantity per reason inside `window`.
    pub async fn waste_totals_by_reason(
        &self,
        window: &TimeWindow,
    ) -> StoreResult<Vec<(WasteReason, f64)>> {
        let rows = sqlx::query_as::<_, (WasteReason, f64)>(
            "SELECT reason, COALESCE(SUM(quantity), 0.0) AS value
             FROM waste_records
             WHERE created_at >= ? AND created_at <= ?
             GROUP BY reason
             ORDER BY reason ASC",
        )
        .bind(db_timestamp(window.start))
        .bind(db_timestamp(window.end))
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    /// Linked record counts for every center. Not restricted to a window.
    pub async fn center_performance(&self) -> StoreResult<Vec<CenterPerformance>> {
        let rows = sqlx::query_as::<_, CenterPerformance>(
            "SELECT c.name AS name,
                    (SELECT COUNT(DISTINCT d.id) FROM donations d WHERE d.center_id = c.id) AS donations,
                    (SELECT COUNT(DISTINCT w.id) FROM waste_records w WHERE w.center_id = c.id) AS waste
             FROM donation_centers c
             ORDER BY c.name ASC, c.id ASC",
        )
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    /// Total quantity of `Donated` donations created inside `window`.
    pub async fn donated_total(&self, window: &TimeWindow) -> StoreResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(quantity), 0.0)
             FROM donations
             WHERE status = ? AND created_at >= ? AND created_at <= ?",
        )
        .bind(DonationStatus::Donated)
        .bind(db_timestamp(window.start))
        .bind(db_timestamp(window.end))
        .fetch_one(&*self.db)
        .await?;
        Ok(total)
    }
}

/// Fixed-width UTC text form used for every stored timestamp.
pub fn db_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}


#[cfg(test)]
mod tests {
    use super::test_support::memory_pool;
    use super::*;
    use crate::services::time_window::TimeRange;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 18, 0, 0).unwrap()
    }

    fn donation(category: FoodCategory, quantity: f64, status: DonationStatus) -> NewDonation {
        NewDonation {
            name: "crate of food".into(),
            category,
            description: String::new(),
            quantity,
            expiration_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            status,
            center_id: None,
        }
    }

    fn expiring_on(date: NaiveDate) -> NewDonation {
        let mut new = donation(FoodCategory::Bakery, 1.0, DonationStatus::Available);
        new.expiration_date = date;
        new
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn waste(reason: WasteReason, quantity: f64) -> NewWasteRecord {
        NewWasteRecord {
            name: "leftovers".into(),
            reason,
            quantity,
            center_id: None,
        }
    }

    fn center(name: &str) -> NewDonationCenter {
        NewDonationCenter {
            name: name.into(),
            address: "1 Main St".into(),
            latitude: 40.0,
            longitude: -73.0,
            phone: String::new(),
            email: String::new(),
            website: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn rejects_out_of_range_quantities() {
        let store = RecordStore::new(memory_pool().await);
        let owner = Uuid::new_v4();

        for quantity in [0.0, -1.5, f64::NAN, f64::INFINITY, 1e306, MAX_QUANTITY_KG + 0.5] {
            let err = store
                .create_donation(owner, donation(FoodCategory::Fruit, quantity, DonationStatus::Available))
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::InvalidQuantity(_)));

            let err = store
                .create_waste(owner, waste(WasteReason::Spoilage, quantity))
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::InvalidQuantity(_)));
        }
        assert!(store.list_donations(None).await.unwrap().is_empty());
        assert!(store.list_waste().await.unwrap().is_empty());

        let largest = store
            .create_donation(owner, donation(FoodCategory::Fruit, MAX_QUANTITY_KG, DonationStatus::Available))
            .await
            .unwrap();
        assert_eq!(largest.quantity, MAX_QUANTITY_KG);
    }

    #[tokio::test]
    async fn rejects_unknown_center_reference() {
        let store = RecordStore::new(memory_pool().await);
        let missing = Uuid::new_v4();
        let mut new = donation(FoodCategory::Meat, 1.0, DonationStatus::Available);
        new.center_id = Some(missing);

        let err = store.create_donation(Uuid::new_v4(), new).await.unwrap_err();
        assert!(matches!(err, StoreError::CenterNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn status_update_keeps_creation_time() {
        let store = RecordStore::new(memory_pool().await);
        let created = store
            .create_donation_at(
                Uuid::new_v4(),
                donation(FoodCategory::Dairy, 3.0, DonationStatus::Available),
                now(),
            )
            .await
            .unwrap();

        let updated = store
            .update_donation_status(created.id, DonationStatus::Donated)
            .await
            .unwrap();
        assert_eq!(updated.status, DonationStatus::Donated);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let donated = store.list_donations(Some(DonationStatus::Donated)).await.unwrap();
        assert_eq!(donated.len(), 1);
        assert!(store.list_donations(Some(DonationStatus::Expired)).await.unwrap().is_empty());

        let err = store
            .update_donation_status(Uuid::new_v4(), DonationStatus::Expired)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DonationNotFound(_)));
    }

    #[tokio::test]
    async fn waste_trend_groups_by_day_inside_window() {
        let store = RecordStore::new(memory_pool().await);
        let owner = Uuid::new_v4();
        let day_one = now() - Duration::days(3);
        let day_two = now() - Duration::days(1);

        for offset in [0, 2, 4] {
            store
                .create_waste_at(owner, waste(WasteReason::Spoilage, 2.0), day_one + Duration::hours(offset))
                .await
                .unwrap();
        }
        store
            .create_waste_at(owner, waste(WasteReason::Damaged, 1.25), day_two)
            .await
            .unwrap();
        // outside the week window
        store
            .create_waste_at(owner, waste(WasteReason::Other, 50.0), now() - Duration::days(8))
            .await
            .unwrap();

        let window = TimeWindow::ending_at(TimeRange::Week, now()).unwrap();
        let trend = store.waste_trend(&window).await.unwrap();
        assert_eq!(
            trend,
            vec![
                (day_one.date_naive(), 6.0),
                (day_two.date_naive(), 1.25),
            ]
        );

        let reasons = store.waste_totals_by_reason(&window).await.unwrap();
        assert_eq!(
            reasons,
            vec![(WasteReason::Damaged, 1.25), (WasteReason::Spoilage, 6.0)]
        );
    }

    #[tokio::test]
    async fn category_totals_omit_empty_categories() {
        let store = RecordStore::new(memory_pool().await);
        let owner = Uuid::new_v4();
        let at = now() - Duration::days(2);

        store
            .create_donation_at(owner, donation(FoodCategory::Bakery, 4.0, DonationStatus::Available), at)
            .await
            .unwrap();
        store
            .create_donation_at(owner, donation(FoodCategory::Bakery, 1.5, DonationStatus::Donated), at)
            .await
            .unwrap();
        store
            .create_donation_at(owner, donation(FoodCategory::Canned, 2.0, DonationStatus::Donated), at)
            .await
            .unwrap();

        let window = TimeWindow::ending_at(TimeRange::Month, now()).unwrap();
        let totals = store.donation_totals_by_category(&window).await.unwrap();
        assert_eq!(
            totals,
            vec![(FoodCategory::Bakery, 5.5), (FoodCategory::Canned, 2.0)]
        );
        assert_eq!(store.donated_total(&window).await.unwrap(), 3.5);
    }

    #[tokio::test]
    async fn donated_total_is_zero_without_records() {
        let store = RecordStore::new(memory_pool().await);
        let window = TimeWindow::ending_at(TimeRange::Year, now()).unwrap();
        assert_eq!(store.donated_total(&window).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn center_performance_counts_linked_records_for_all_time() {
        let store = RecordStore::new(memory_pool().await);
        let owner = Uuid::new_v4();
        let north = store.create_center(center("North Pantry")).await.unwrap();
        store.create_center(center("South Kitchen")).await.unwrap();

        let long_ago = now() - Duration::days(900);
        for _ in 0..2 {
            let mut new = donation(FoodCategory::Vegetable, 1.0, DonationStatus::Available);
            new.center_id = Some(north.id);
            store.create_donation_at(owner, new, long_ago).await.unwrap();
        }
        let mut wasted = waste(WasteReason::Expired, 0.5);
        wasted.center_id = Some(north.id);
        store.create_waste_at(owner, wasted, long_ago).await.unwrap();

        let perf = store.center_performance().await.unwrap();
        assert_eq!(
            perf,
            vec![
                CenterPerformance { name: "North Pantry".into(), donations: 2, waste: 1 },
                CenterPerformance { name: "South Kitchen".into(), donations: 0, waste: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn window_edges_are_inclusive_at_microsecond_precision() {
        let store = RecordStore::new(memory_pool().await);
        let owner = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap() + Duration::nanoseconds(123_456_789);
        let window = TimeWindow::ending_at(TimeRange::Week, now).unwrap();
        let tick = Duration::microseconds(1);

        for (at, quantity) in [
            (window.start, 1.0),
            (window.start - tick, 2.0),
            (now, 4.0),
            (now + tick, 8.0),
        ] {
            store
                .create_waste_at(owner, waste(WasteReason::Spoilage, quantity), at)
                .await
                .unwrap();
            store
                .create_donation_at(owner, donation(FoodCategory::Dairy, quantity, DonationStatus::Donated), at)
                .await
                .unwrap();
        }

        let trend = store.waste_trend(&window).await.unwrap();
        assert_eq!(trend, vec![(day(2025, 8, 25), 1.0), (day(2025, 9, 1), 4.0)]);
        assert_eq!(
            store.waste_totals_by_reason(&window).await.unwrap(),
            vec![(WasteReason::Spoilage, 5.0)]
        );
        assert_eq!(
            store.donation_totals_by_category(&window).await.unwrap(),
            vec![(FoodCategory::Dairy, 5.0)]
        );
        assert_eq!(store.donated_total(&window).await.unwrap(), 5.0);
    }

    #[tokio::test]
    async fn expiring_lists_available_donations_soonest_first() {
        let store = RecordStore::new(memory_pool().await);
        let owner = Uuid::new_v4();
        let late = store.create_donation(owner, expiring_on(day(2025, 9, 20))).await.unwrap();
        let soon = store.create_donation(owner, expiring_on(day(2025, 9, 2))).await.unwrap();
        let mut donated = expiring_on(day(2025, 9, 1));
        donated.status = DonationStatus::Donated;
        store.create_donation(owner, donated).await.unwrap();
        store
            .create_donation(Uuid::new_v4(), expiring_on(day(2025, 9, 1)))
            .await
            .unwrap();

        let ids: Vec<Uuid> = store
            .list_expiring(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![soon.id, late.id]);
    }

    #[tokio::test]
    async fn expire_overdue_only_touches_open_donations_past_their_date() {
        let store = RecordStore::new(memory_pool().await);
        let owner = Uuid::new_v4();
        let today = day(2025, 9, 10);
        let stale = store.create_donation(owner, expiring_on(day(2025, 9, 9))).await.unwrap();
        let mut reserved = expiring_on(day(2025, 9, 1));
        reserved.status = DonationStatus::Reserved;
        store.create_donation(owner, reserved).await.unwrap();
        let mut donated = expiring_on(day(2025, 9, 1));
        donated.status = DonationStatus::Donated;
        store.create_donation(owner, donated).await.unwrap();
        let fresh = store.create_donation(owner, expiring_on(today)).await.unwrap();

        assert_eq!(store.expire_overdue(today).await.unwrap(), 2);
        let expired = store.list_donations(Some(DonationStatus::Expired)).await.unwrap();
        assert_eq!(expired.len(), 2);
        assert!(expired.iter().any(|d| d.id == stale.id));
        let still_open = store.list_expiring(owner).await.unwrap();
        assert_eq!(still_open.len(), 1);
        assert_eq!(still_open[0].id, fresh.id);
        assert!(!still_open[0].is_expired(today));

        assert_eq!(store.expire_overdue(today).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn requests_drive_donation_status() {
        let store = RecordStore::new(memory_pool().await);
        let shelter = store.create_center(center("Shelter")).await.unwrap();
        let gift = store
            .create_donation(Uuid::new_v4(), expiring_on(day(2030, 1, 1)))
            .await
            .unwrap();

        let request = store
            .create_request(NewDonationRequest {
                donation_id: gift.id,
                center_id: shelter.id,
                message: "for friday".into(),
            })
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(store.list_requests(Some(RequestStatus::Pending)).await.unwrap().len(), 1);

        let approved = store
            .update_request_status(request.id, RequestStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(approved.created_at, request.created_at);
        let reserved = store.list_donations(Some(DonationStatus::Reserved)).await.unwrap();
        assert_eq!(reserved.len(), 1);
        assert_eq!(reserved[0].id, gift.id);

        store
            .update_request_status(request.id, RequestStatus::Completed)
            .await
            .unwrap();
        assert_eq!(store.list_donations(Some(DonationStatus::Donated)).await.unwrap().len(), 1);
        assert!(store.list_requests(Some(RequestStatus::Pending)).await.unwrap().is_empty());
        assert_eq!(store.list_requests(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejecting_a_request_leaves_the_donation_alone() {
        let store = RecordStore::new(memory_pool().await);
        let shelter = store.create_center(center("Shelter")).await.unwrap();
        let gift = store
            .create_donation(Uuid::new_v4(), expiring_on(day(2030, 1, 1)))
            .await
            .unwrap();
        let request = store
            .create_request(NewDonationRequest {
                donation_id: gift.id,
                center_id: shelter.id,
                message: String::new(),
            })
            .await
            .unwrap();

        store
            .update_request_status(request.id, RequestStatus::Rejected)
            .await
            .unwrap();
        let available = store.list_donations(Some(DonationStatus::Available)).await.unwrap();
        assert_eq!(available.len(), 1);
    }

    #[tokio::test]
    async fn requests_need_existing_donation_and_center() {
        let store = RecordStore::new(memory_pool().await);
        let shelter = store.create_center(center("Shelter")).await.unwrap();
        let gift = store
            .create_donation(Uuid::new_v4(), expiring_on(day(2030, 1, 1)))
            .await
            .unwrap();

        let missing = Uuid::new_v4();
        let err = store
            .create_request(NewDonationRequest {
                donation_id: missing,
                center_id: shelter.id,
                message: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DonationNotFound(id) if id == missing));

        let err = store
            .create_request(NewDonationRequest {
                donation_id: gift.id,
                center_id: missing,
                message: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CenterNotFound(id) if id == missing));

        let err = store
            .update_request_status(missing, RequestStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RequestNotFound(id) if id == missing));
        assert!(store.list_requests(None).await.unwrap().is_empty());
    }

    #[test]
    fn timestamps_are_fixed_width_utc() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(db_timestamp(ts), "2025-01-02T03:04:05.000000Z");
        assert_eq!(&db_timestamp(ts)[..10], "2025-01-02");
    }
}
