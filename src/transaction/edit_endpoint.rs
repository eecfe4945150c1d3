//! The endpoint for partially updating an existing transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::{
    Error,
    auth::IdentityClaim,
    transaction::{TransactionId, TransactionState, TransactionUpdate, db::update_transaction},
    user::get_user_id_by_email,
};

/// A route handler for applying a partial update to a transaction.
///
/// Only the fields present in the request body change; everything else keeps
/// its stored value. A body with no recognised fields succeeds without
/// changing anything.
///
/// # Errors
///
/// Returns [Error::UpdateMissingTransaction] if the transaction does not
/// exist or belongs to another user, and [Error::UnknownUser] if the
/// identity claim's email no longer belongs to a registered user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(transaction_id): Path<TransactionId>,
    Json(update): Json<TransactionUpdate>,
) -> Result<Json<serde_json::Value>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let user_id = get_user_id_by_email(&claim.email, &connection)?.ok_or(Error::UnknownUser)?;

    update_transaction(transaction_id, user_id, update, &connection)?;

    Ok(Json(json!({ "message": "transaction updated successfully" })))
}

#[cfg(test)]
mod edit_transaction_endpoint_tests {
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{create_transaction_via_api, get_test_server, sign_up_and_log_in},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn edit_changes_only_supplied_fields() {
        let (server, _) = get_test_server();
        let token = sign_up_and_log_in(&server, "a@x.com").await;
        let transaction_id = create_transaction_via_api(
            &server, &token, 42.5, "expense", "food", "thai takeaway", "2024-03-05",
        )
        .await;

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&token)
            .json(&json!({ "amount": 45.0, "description": "thai takeaway with tip" }))
            .await;

        response.assert_status_ok();

        let transactions: Vec<Transaction> = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&token)
            .await
            .json();
        let transaction = &transactions[0];
        assert_eq!(transaction.amount, 45.0);
        assert_eq!(transaction.description, "thai takeaway with tip");
        assert_eq!(transaction.category, "food", "category must not change");
    }

    #[tokio::test]
    async fn edit_with_an_empty_body_changes_nothing() {
        let (server, _) = get_test_server();
        let token = sign_up_and_log_in(&server, "a@x.com").await;
        let transaction_id = create_transaction_via_api(
            &server, &token, 42.5, "expense", "food", "thai takeaway", "2024-03-05",
        )
        .await;

        let before: Vec<Transaction> = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&token)
            .await
            .json();

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&token)
            .json(&json!({}))
            .await;

        response.assert_status_ok();

        let after: Vec<Transaction> = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn edit_of_another_users_transaction_is_a_bad_request() {
        let (server, _) = get_test_server();
        let owner_token = sign_up_and_log_in(&server, "a@x.com").await;
        let other_token = sign_up_and_log_in(&server, "b@x.com").await;
        let transaction_id = create_transaction_via_api(
            &server, &owner_token, 42.5, "expense", "food", "thai takeaway", "2024-03-05",
        )
        .await;

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&other_token)
            .json(&json!({ "amount": 0.0 }))
            .await;

        response.assert_status_bad_request();

        let transactions: Vec<Transaction> = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .authorization_bearer(&owner_token)
            .await
            .json();
        assert_eq!(transactions[0].amount, 42.5, "update leaked across users");
    }

    #[tokio::test]
    async fn edit_of_a_missing_transaction_is_a_bad_request() {
        let (server, _) = get_test_server();
        let token = sign_up_and_log_in(&server, "a@x.com").await;

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, 999))
            .authorization_bearer(&token)
            .json(&json!({ "amount": 1.0 }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn edit_without_token_is_unauthorized() {
        let (server, _) = get_test_server();

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, 1))
            .json(&json!({ "amount": 1.0 }))
            .await;

        response.assert_status_unauthorized();
    }
}
