//! Handles sign-up requests that create a new user account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState, Error, PasswordHash,
    user::{create_user, get_user_by_email},
};

/// The data entered at sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpData {
    /// The new user's display name.
    pub name: String,
    /// The email to sign in with.
    pub email: String,
    /// The password in plain text. It is hashed before it is stored.
    pub password: String,
}

/// The state needed for creating a new user.
#[derive(Clone)]
pub struct RegistrationState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handler for sign-up requests.
///
/// The email is checked for an existing user before inserting; the UNIQUE
/// constraint on the user table catches the remaining race between the check
/// and the insert.
///
/// # Errors
///
/// Returns an [Error::DuplicateUser] if a user with the email already
/// exists.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Json(data): Json<SignUpData>,
) -> Result<Response, Error> {
    {
        let connection = state.db_connection.lock().unwrap();

        if get_user_by_email(&data.email, &connection)?.is_some() {
            return Err(Error::DuplicateUser);
        }
    }

    // Hashing is slow on purpose, so the database lock is released first.
    let password_hash = PasswordHash::from_raw_password(&data.password, PasswordHash::DEFAULT_COST)?;

    let connection = state.db_connection.lock().unwrap();
    let user = create_user(&data.name, &data.email, password_hash, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "user created successfully",
            "user_id": user.id,
        })),
    )
        .into_response())
}
