//! The endpoints serving the summary and the monthly, category, and yearly
//! reports.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    Error,
    auth::IdentityClaim,
    report::{
        ReportState,
        db::{
            CategoryReportRow, MonthlyReportRow, Summary, YearlyReportRow, category_report,
            monthly_report, summary, yearly_report,
        },
    },
    user::get_user_id_by_email,
};

/// The query parameters for the monthly report.
#[derive(Debug, Deserialize)]
pub struct MonthlyReportParams {
    /// The calendar year to report on.
    pub year: i32,
}

/// The query parameters for the category report.
#[derive(Debug, Deserialize)]
pub struct CategoryReportParams {
    /// A calendar month from 1 to 12.
    pub month: u8,
    /// The calendar year the month belongs to.
    pub year: i32,
}

/// A route handler for the authenticated user's overall summary.
///
/// # Errors
///
/// Returns [Error::UnknownUser] if the identity claim's email no longer
/// belongs to a registered user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn get_summary(
    State(state): State<ReportState>,
    Extension(claim): Extension<IdentityClaim>,
) -> Result<Json<Summary>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let user_id = get_user_id_by_email(&claim.email, &connection)?.ok_or(Error::UnknownUser)?;

    Ok(Json(summary(user_id, &connection)?))
}

/// A route handler for the per-month report of one year.
///
/// # Errors
///
/// Returns [Error::UnknownUser] if the identity claim's email no longer
/// belongs to a registered user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn get_monthly_report(
    State(state): State<ReportState>,
    Extension(claim): Extension<IdentityClaim>,
    Query(params): Query<MonthlyReportParams>,
) -> Result<Json<Vec<MonthlyReportRow>>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let user_id = get_user_id_by_email(&claim.email, &connection)?.ok_or(Error::UnknownUser)?;

    Ok(Json(monthly_report(user_id, params.year, &connection)?))
}

/// A route handler for the per-category report of one calendar month.
///
/// # Errors
///
/// Returns [Error::UnknownUser] if the identity claim's email no longer
/// belongs to a registered user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn get_category_report(
    State(state): State<ReportState>,
    Extension(claim): Extension<IdentityClaim>,
    Query(params): Query<CategoryReportParams>,
) -> Result<Json<Vec<CategoryReportRow>>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let user_id = get_user_id_by_email(&claim.email, &connection)?.ok_or(Error::UnknownUser)?;

    Ok(Json(category_report(
        user_id,
        params.month,
        params.year,
        &connection,
    )?))
}

/// A route handler for the per-year report over all of the user's activity.
///
/// # Errors
///
/// Returns [Error::UnknownUser] if the identity claim's email no longer
/// belongs to a registered user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn get_yearly_report(
    State(state): State<ReportState>,
    Extension(claim): Extension<IdentityClaim>,
) -> Result<Json<Vec<YearlyReportRow>>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let user_id = get_user_id_by_email(&claim.email, &connection)?.ok_or(Error::UnknownUser)?;

    Ok(Json(yearly_report(user_id, &connection)?))
}
