//! The endpoint for listing transactions, narrowed by optional query-string
//! filters.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    Error,
    auth::IdentityClaim,
    transaction::{
        Transaction, TransactionState,
        query::{SortOrder, TransactionFilter, get_transactions_for_user},
    },
    user::get_user_id_by_email,
};

/// The raw query-string parameters accepted by the listing endpoint.
///
/// All parameters are optional and arrive as text. Values that do not parse
/// are treated as absent rather than rejected, and unknown parameters are
/// ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionListParams {
    /// `income` or `expense`.
    #[serde(rename = "type")]
    transaction_type: Option<String>,
    /// Exact category text.
    category: Option<String>,
    /// Calendar month from 1 to 12.
    month: Option<String>,
    /// Calendar year.
    year: Option<String>,
    /// Substring to look for in descriptions.
    search: Option<String>,
    /// `asc` or `desc` by amount, in any letter case.
    order: Option<String>,
}

impl TransactionListParams {
    fn into_filter(self) -> TransactionFilter {
        TransactionFilter {
            transaction_type: self
                .transaction_type
                .as_deref()
                .and_then(|raw| raw.parse().ok()),
            category: self.category,
            month: self.month.as_deref().and_then(|raw| raw.parse().ok()),
            year: self.year.as_deref().and_then(|raw| raw.parse().ok()),
            search: self.search,
            sort_amount: self.order.as_deref().and_then(SortOrder::parse),
        }
    }
}

/// A route handler for listing the authenticated user's transactions.
///
/// With no query parameters the handler returns every transaction the user
/// owns.
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
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(claim): Extension<IdentityClaim>,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let user_id = get_user_id_by_email(&claim.email, &connection)?.ok_or(Error::UnknownUser)?;

    let transactions = get_transactions_for_user(user_id, params.into_filter(), &connection)?;

    Ok(Json(transactions))
}


#[cfg(test)]
mod list_transactions_endpoint_tests {
    use crate::{
        endpoints,
        test_utils::{create_transaction_via_api, get_test_server, sign_up_and_log_in},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn listing_without_filters_returns_all_own_transactions() {
        let (server, _) = get_test_server();
        let token = sign_up_and_log_in(&server, "a@x.com").await;
        let other_token = sign_up_and_log_in(&server, "b@x.com").await;

        create_transaction_via_api(&server, &token, 100.0, "income", "salary", "pay", "2024-03-01")
            .await;
        create_transaction_via_api(&server, &token, 20.0, "expense", "food", "lunch", "2024-03-02")
            .await;
        create_transaction_via_api(&server, &other_token, 7.0, "expense", "food", "coffee", "2024-03-02")
            .await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let transactions: Vec<Transaction> = response.json();
        assert_eq!(transactions.len(), 2, "listing leaked or lost rows");
    }

    #[tokio::test]
    async fn listing_composes_type_and_category_filters() {
        let (server, _) = get_test_server();
        let token = sign_up_and_log_in(&server, "a@x.com").await;

        create_transaction_via_api(&server, &token, 20.0, "expense", "food", "lunch", "2024-03-02")
            .await;
        create_transaction_via_api(&server, &token, 90.0, "expense", "transport", "fuel", "2024-03-03")
            .await;
        create_transaction_via_api(&server, &token, 300.0, "income", "food", "catering", "2024-03-04")
            .await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("type", "expense")
            .add_query_param("category", "food")
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let transactions: Vec<Transaction> = response.json();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "lunch");
    }

    #[tokio::test]
    async fn listing_order_round_trips() {
        let (server, _) = get_test_server();
        let token = sign_up_and_log_in(&server, "a@x.com").await;

        for (amount, description) in [(50.0, "b"), (10.0, "a"), (90.0, "c")] {
            create_transaction_via_api(
                &server, &token, amount, "expense", "misc", description, "2024-03-02",
            )
            .await;
        }

        let ascending: Vec<Transaction> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("order", "asc")
            .authorization_bearer(&token)
            .await
            .json();
        let descending: Vec<Transaction> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("order", "desc")
            .authorization_bearer(&token)
            .await
            .json();

        let ascending_amounts: Vec<f64> = ascending.iter().map(|t| t.amount).collect();
        assert_eq!(ascending_amounts, vec![10.0, 50.0, 90.0]);

        let reversed: Vec<Transaction> = descending.into_iter().rev().collect();
        assert_eq!(ascending, reversed);
    }

    #[tokio::test]
    async fn listing_ignores_unknown_query_parameters() {
        let (server, _) = get_test_server();
        let token = sign_up_and_log_in(&server, "a@x.com").await;

        create_transaction_via_api(&server, &token, 20.0, "expense", "food", "lunch", "2024-03-02")
            .await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("limit", "1")
            .add_query_param("type", "unknown-type")
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let transactions: Vec<Transaction> = response.json();
        assert_eq!(transactions.len(), 1);
    }

    #[tokio::test]
    async fn listing_without_token_is_unauthorized() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_unauthorized();
    }
}
