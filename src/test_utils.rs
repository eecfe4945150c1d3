//! Shared helpers for endpoint tests.

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, build_router, endpoints, transaction::TransactionId};

/// A test server with its own in-memory database, plus the state backing it
/// for tests that need to poke at the store directly.
pub(crate) fn get_test_server() -> (TestServer, AppState) {
    let db_connection = Connection::open_in_memory().expect("Could not open database in memory.");
    let state = AppState::new(db_connection, "42").expect("Could not create app state.");
    let server =
        TestServer::new(build_router(state.clone()));

    (server, state)
}

/// Register a user with `email` and a fixed password, then log them in and
/// return the session token.
pub(crate) async fn sign_up_and_log_in(server: &TestServer, email: &str) -> String {
    let password = "averysafeandsecurepassword";

    server
        .post(endpoints::SIGN_UP)
        .json(&json!({ "name": "Test", "email": email, "password": password }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();

    response.json::<serde_json::Value>()["token"]
        .as_str()
        .expect("log-in response should carry a token")
        .to_string()
}

/// Create a transaction through the HTTP API and return its ID.
pub(crate) async fn create_transaction_via_api(
    server: &TestServer,
    token: &str,
    amount: f64,
    transaction_type: &str,
    category: &str,
    description: &str,
    date: &str,
) -> TransactionId {
    let response = server
        .post(endpoints::TRANSACTIONS)
        .authorization_bearer(token)
        .json(&json!({
            "amount": amount,
            "type": transaction_type,
            "category": category,
            "description": description,
            "date": date,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<serde_json::Value>()["transaction_id"]
        .as_i64()
        .expect("create response should carry a transaction id")
}
