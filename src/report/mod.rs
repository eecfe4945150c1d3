//! Aggregate summaries and time-bucketed reports over a user's
//! transactions.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod db;
mod endpoints;

pub use db::{
    CategoryReportRow, MonthlyReportRow, Summary, YearlyReportRow, category_report,
    monthly_report, summary, yearly_report,
};
pub use endpoints::{
    get_category_report, get_monthly_report, get_summary, get_yearly_report,
};

/// The state needed by the report endpoints.
#[derive(Clone)]
pub struct ReportState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
