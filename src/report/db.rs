//! Aggregation queries for the summary and report endpoints.
//!
//! All queries are scoped to a single user. Income amounts count positively
//! and expense amounts negatively towards a balance, and sums over an empty
//! set are reported as zero.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionType, user::UserID};

/// Totals over every transaction a user owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all income amounts.
    pub total_income: f64,
    /// The sum of all expense amounts.
    pub total_expense: f64,
    /// Income minus expenses.
    pub balance: f64,
}

/// One month's totals in a [monthly_report].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReportRow {
    /// The calendar month from 1 to 12.
    pub month_number: u8,
    /// The English month name, e.g. "March".
    pub month_name: String,
    /// The sum of the month's income amounts.
    pub total_income: f64,
    /// The sum of the month's expense amounts.
    pub total_expense: f64,
    /// The month's income minus its expenses.
    pub balance: f64,
}

/// One category's total in a [category_report].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReportRow {
    /// The category text.
    pub category: String,
    /// Whether this row sums income or expense amounts.
    ///
    /// A category used for both income and expenses produces one row per
    /// type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The sum of the matching amounts.
    pub total_amount: f64,
}

/// One year's totals in a [yearly_report].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyReportRow {
    /// The calendar year.
    pub year: i32,
    /// The sum of the year's income amounts.
    pub total_income: f64,
    /// The sum of the year's expense amounts.
    pub total_expense: f64,
    /// The year's income minus its expenses.
    pub balance: f64,
}

fn month_name(month_number: u8) -> &'static str {
    match month_number {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

fn read_sum(row: &Row, index: usize) -> Result<f64, rusqlite::Error> {
    Ok(row.get::<_, Option<f64>>(index)?.unwrap_or(0.0))
}

/// Sum a user's income and expenses over every transaction they own.
///
/// A user with no transactions gets a summary of zeroes.
///
/// # Errors
///
/// This function will return an [Error::SqlError] if there is a SQL error.
pub fn summary(user_id: UserID, connection: &Connection) -> Result<Summary, Error> {
    connection
        .query_row(
            "SELECT
                SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END),
                SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END)
             FROM \"transaction\" WHERE user_id = ?1",
            (user_id.as_i64(),),
            |row| {
                let total_income = read_sum(row, 0)?;
                let total_expense = read_sum(row, 1)?;

                Ok(Summary {
                    total_income,
                    total_expense,
                    balance: total_income - total_expense,
                })
            },
        )
        .map_err(|error| error.into())
}

/// Sum a user's income and expenses per month of the given `year`.
///
/// Only months with at least one transaction appear, ordered by month
/// ascending.
///
/// # Errors
///
/// This function will return an [Error::SqlError] if there is a SQL error.
pub fn monthly_report(
    user_id: UserID,
    year: i32,
    connection: &Connection,
) -> Result<Vec<MonthlyReportRow>, Error> {
    connection
        .prepare(
            "SELECT
                CAST(strftime('%m', date) AS INTEGER) AS month_number,
                SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END) AS total_income,
                SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END) AS total_expense,
                SUM(CASE WHEN type = 'income' THEN amount ELSE -amount END) AS balance
             FROM \"transaction\"
             WHERE user_id = ?1 AND strftime('%Y', date) = ?2
             GROUP BY month_number
             ORDER BY month_number ASC",
        )?
        .query_map((user_id.as_i64(), year.to_string()), |row| {
            let month_number: u8 = row.get(0)?;

            Ok(MonthlyReportRow {
                month_number,
                month_name: month_name(month_number).to_string(),
                total_income: read_sum(row, 1)?,
                total_expense: read_sum(row, 2)?,
                balance: read_sum(row, 3)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(Error::SqlError))
        .collect()
}

/// Sum a user's amounts per category and type within one calendar month.
///
/// `month` is a calendar month from 1 to 12 and is zero-padded internally
/// for the date comparison.
///
/// # Errors
///
/// This function will return an [Error::SqlError] if there is a SQL error.
pub fn category_report(
    user_id: UserID,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Vec<CategoryReportRow>, Error> {
    connection
        .prepare(
            "SELECT category, type, SUM(amount) AS total_amount
             FROM \"transaction\"
             WHERE user_id = ?1 AND strftime('%Y', date) = ?2 AND strftime('%m', date) = ?3
             GROUP BY category, type
             ORDER BY category ASC, type ASC",
        )?
        .query_map(
            (user_id.as_i64(), year.to_string(), format!("{month:02}")),
            |row| {
                Ok(CategoryReportRow {
                    category: row.get(0)?,
                    transaction_type: row.get(1)?,
                    total_amount: read_sum(row, 2)?,
                })
            },
        )?
        .map(|maybe_row| maybe_row.map_err(Error::SqlError))
        .collect()
}

/// Sum a user's income and expenses per year.
///
/// Only years with at least one transaction appear, ordered ascending.
///
/// # Errors
///
/// This function will return an [Error::SqlError] if there is a SQL error.
pub fn yearly_report(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<YearlyReportRow>, Error> {
    connection
        .prepare(
            "SELECT
                CAST(strftime('%Y', date) AS INTEGER) AS year,
                SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END) AS total_income,
                SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END) AS total_expense,
                SUM(CASE WHEN type = 'income' THEN amount ELSE -amount END) AS balance
             FROM \"transaction\"
             WHERE user_id = ?1
             GROUP BY year
             ORDER BY year ASC",
        )?
        .query_map((user_id.as_i64(),), |row| {
            Ok(YearlyReportRow {
                year: row.get(0)?,
                total_income: read_sum(row, 1)?,
                total_expense: read_sum(row, 2)?,
                balance: read_sum(row, 3)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(Error::SqlError))
        .collect()
}
