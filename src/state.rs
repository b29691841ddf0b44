use crate::services::{record_store::RecordStore, report_service::ReportService};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared handler state. Cheap to clone: both services hold the same pool.
#[derive(Clone)]
pub struct AppState {
    pub records: RecordStore,
    pub reports: ReportService,
}

impl AppState {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        let records = RecordStore::new(db);
        let reports = ReportService::new(records.clone());
        Self { records, reports }
    }
}
