//! The endpoint for deleting a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::{
    Error,
    auth::IdentityClaim,
    transaction::{TransactionId, TransactionState, db::delete_transaction},
    user::get_user_id_by_email,
};

/// A route handler for deleting a transaction owned by the authenticated
/// user.
///
/// # Errors
///
/// Returns [Error::DeleteMissingTransaction] if the transaction does not
/// exist or belongs to another user, and [Error::UnknownUser] if the
/// identity claim's email no longer belongs to a registered user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<serde_json::Value>, Error> {
    let connection = state.db_connection.lock().unwrap();

    let user_id = get_user_id_by_email(&claim.email, &connection)?.ok_or(Error::UnknownUser)?;

    delete_transaction(transaction_id, user_id, &connection)?;

    Ok(Json(json!({ "message": "transaction deleted successfully" })))
}
