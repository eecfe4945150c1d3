//! Builds listing queries for transactions from an arbitrary combination of
//! optional filters.
//!
//! Filters are combined by appending predicate and parameter pairs in a
//! fixed order, so the resulting SQL is deterministic and filter values are
//! only ever bound as parameters, never spliced into the query text.

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    transaction::{
        db::map_transaction_row,
        models::{Transaction, TransactionType},
    },
    user::UserID,
};

/// The order to sort transactions by amount in a listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

impl SortOrder {
    /// Parse a client-supplied sort order, matching `asc` and `desc` in any
    /// letter case. Any other value is `None`, leaving the store's natural
    /// order.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(SortOrder::Ascending)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(SortOrder::Descending)
        } else {
            None
        }
    }
}

/// Defines how transactions should be narrowed by
/// [get_transactions_for_user].
///
/// Each field is independently optional. Present filters are combined with
/// logical AND.
#[derive(Debug, Default, PartialEq)]
pub struct TransactionFilter {
    /// Include only transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Include only transactions whose category matches exactly.
    pub category: Option<String>,
    /// A calendar month from 1 to 12.
    ///
    /// Only has an effect together with `year`; a month on its own applies
    /// no date filtering at all.
    pub month: Option<u8>,
    /// A calendar year. On its own it matches the whole year.
    pub year: Option<i32>,
    /// Include only transactions whose description contains this substring.
    pub search: Option<String>,
    /// Orders transactions by amount. `None` returns transactions in the
    /// order they are stored.
    pub sort_amount: Option<SortOrder>,
}

/// Query for a user's transactions, narrowed by `filter`.
///
/// An empty filter returns every transaction the user owns.
///
/// # Errors
///
/// This function will return an [Error::SqlError] if there is a SQL error.
pub fn get_transactions_for_user(
    user_id: UserID,
    filter: TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut where_clause_parts = vec!["user_id = ?1".to_string()];
    let mut query_parameters = vec![Value::Integer(user_id.as_i64())];

    if let Some(transaction_type) = filter.transaction_type {
        where_clause_parts.push(format!("type = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(transaction_type.to_string()));
    }

    if let Some(category) = filter.category {
        where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(category));
    }

    match (filter.month, filter.year) {
        (Some(month), Some(year)) => {
            where_clause_parts.push(format!(
                "strftime('%m', date) = ?{} AND strftime('%Y', date) = ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(format!("{month:02}")));
            query_parameters.push(Value::Text(year.to_string()));
        }
        (None, Some(year)) => {
            where_clause_parts.push(format!(
                "strftime('%Y', date) = ?{}",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(year.to_string()));
        }
        // A month without a year applies no date filtering.
        _ => {}
    }

    if let Some(search) = filter.search {
        where_clause_parts.push(format!(
            "description LIKE ?{}",
            query_parameters.len() + 1
        ));
        query_parameters.push(Value::Text(format!("%{search}%")));
    }

    let mut query_string = format!(
        "SELECT id, user_id, amount, type, category, description, date FROM \"transaction\" WHERE {}",
        where_clause_parts.join(" AND ")
    );

    match filter.sort_amount {
        Some(SortOrder::Ascending) => query_string.push_str(" ORDER BY amount ASC"),
        Some(SortOrder::Descending) => query_string.push_str(" ORDER BY amount DESC"),
        None => {}
    }

    let params = params_from_iter(query_parameters.iter());

    connection
        .prepare(&query_string)?
        .query_map(params, map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}
