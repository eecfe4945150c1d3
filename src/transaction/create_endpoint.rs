//! The endpoint for creating a new transaction.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::Date;

use crate::{
    Error,
    auth::IdentityClaim,
    transaction::{NewTransaction, TransactionState, TransactionType, db::create_transaction},
    user::get_user_id_by_email,
};

/// The data needed to create a transaction over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionData {
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A free-text category.
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
}

/// A route handler for creating a new transaction owned by the
/// authenticated user.
///
/// # Errors
///
/// Returns [Error::UserNotFound] if the identity claim's email no longer
/// belongs to a registered user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claim): Extension<IdentityClaim>,
    Json(data): Json<CreateTransactionData>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().unwrap();

    let user_id =
        get_user_id_by_email(&claim.email, &connection)?.ok_or(Error::UserNotFound)?;

    let transaction = create_transaction(
        NewTransaction {
            user_id,
            amount: data.amount,
            transaction_type: data.transaction_type,
            category: data.category,
            description: data.description,
            date: data.date,
        },
        &connection,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "transaction created successfully",
            "transaction_id": transaction.id,
        })),
    )
        .into_response())
}
