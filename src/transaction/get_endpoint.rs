//! The endpoint for fetching a single transaction by its ID.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error,
    auth::IdentityClaim,
    transaction::{Transaction, TransactionId, TransactionState, db::get_transaction_by_id},
    user::get_user_id_by_email,
};

/// A route handler for getting a transaction by its database ID.
///
/// The response is a list with either one transaction or nothing: a
/// transaction that does not exist and a transaction that belongs to another
/// user both produce an empty list, so the caller cannot probe for other
/// users' transaction IDs.
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
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let user_id = get_user_id_by_email(&claim.email, &connection)?.ok_or(Error::UnknownUser)?;

    let transaction = get_transaction_by_id(transaction_id, user_id, &connection)?;

    Ok(Json(transaction.into_iter().collect()))
}

#[cfg(test)]
mod get_transaction_endpoint_tests {
    use crate::{
        endpoints,
        test_utils::{create_transaction_via_api, get_test_server, sign_up_and_log_in},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn get_transaction_returns_a_single_element_list() {
        let (server, _) = get_test_server();
        let token = sign_up_and_log_in(&server, "a@x.com").await;
        let transaction_id = create_transaction_via_api(
            &server, &token, 42.5, "expense", "food", "thai takeaway", "2024-03-05",
        )
        .await;

        let response = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let transactions: Vec<Transaction> = response.json();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id, transaction_id);
    }

    #[tokio::test]
    async fn get_missing_transaction_returns_an_empty_list() {
        let (server, _) = get_test_server();
        let token = sign_up_and_log_in(&server, "a@x.com").await;

        let response = server
            .get(&endpoints::format_endpoint(endpoints::TRANSACTION, 999))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let transactions: Vec<Transaction> = response.json();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn get_transaction_of_another_user_looks_like_a_missing_one() {
        let (server, _) = get_test_server();
        let owner_token = sign_up_and_log_in(&server, "a@x.com").await;
        let other_token = sign_up_and_log_in(&server, "b@x.com").await;
        let transaction_id = create_transaction_via_api(
            &server, &owner_token, 42.5, "expense", "food", "thai takeaway", "2024-03-05",
        )
        .await;

        let own_view = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&owner_token)
            .await;
        let foreign_view = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&other_token)
            .await;
        let missing_view = server
            .get(&endpoints::format_endpoint(endpoints::TRANSACTION, 999))
            .authorization_bearer(&other_token)
            .await;

        own_view.assert_status_ok();
        foreign_view.assert_status_ok();
        assert_eq!(
            foreign_view.text(),
            missing_view.text(),
            "a foreign transaction must be indistinguishable from a missing one"
        );
    }

    #[tokio::test]
    async fn get_transaction_without_token_is_unauthorized() {
        let (server, _) = get_test_server();

        let response = server
            .get(&endpoints::format_endpoint(endpoints::TRANSACTION, 1))
            .await;

        response.assert_status_unauthorized();
    }
}
