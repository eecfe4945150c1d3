//! Handles log-in requests and issues session tokens.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState, Error,
    auth::{TokenKeys, issue_token},
    user::get_user_by_email,
};

/// The credentials entered at log-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// The state needed to perform a log-in.
#[derive(Clone)]
pub struct LoginState {
    /// The keys used to sign session tokens.
    pub token_keys: TokenKeys,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handler for log-in requests.
///
/// On success the response carries a signed session token for the user.
/// An unknown email and a wrong password produce the same error, so the
/// response does not reveal whether the email is registered.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn log_in(
    State(state): State<LoginState>,
    Json(data): Json<LogInData>,
) -> Result<Json<serde_json::Value>, Error> {
    let user = {
        let connection = state.db_connection.lock().unwrap();
        get_user_by_email(&data.email, &connection)?
    };

    let Some(user) = user else {
        return Err(Error::InvalidCredentials);
    };

    if !user.password_hash.verify(&data.password)? {
        return Err(Error::InvalidCredentials);
    }

    let token = issue_token(&user.email, &state.token_keys)?;

    Ok(Json(json!({ "token": token })))
}
