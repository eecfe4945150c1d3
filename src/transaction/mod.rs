//! Transaction records: domain models, store operations, the filter query
//! builder, and the HTTP endpoints that expose them.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod create_endpoint;
mod db;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod models;
mod query;

pub use create_endpoint::{CreateTransactionData, create_transaction_endpoint};
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction_by_id,
    is_owned_by, update_transaction,
};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use models::{NewTransaction, Transaction, TransactionId, TransactionType, TransactionUpdate};
pub use query::{SortOrder, TransactionFilter, get_transactions_for_user};

/// The state needed by the transaction endpoints.
#[derive(Clone)]
pub struct TransactionState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
