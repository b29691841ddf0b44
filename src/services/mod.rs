pub mod record_store;
pub mod report_service;
pub mod time_window;
