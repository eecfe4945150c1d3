//! The application error type and its mapping onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email and password combination that does not
    /// match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A user with the given email address already exists.
    #[error("a user with this email address already exists")]
    DuplicateUser,

    /// The bearer token was missing, malformed, expired, or failed the
    /// signature check.
    #[error("invalid bearer token")]
    InvalidToken,

    /// The bearer token was valid but its email no longer belongs to a
    /// registered user.
    #[error("the token does not belong to a registered user")]
    UnknownUser,

    /// The authenticated user could not be found when creating a transaction.
    #[error("user not found")]
    UserNotFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist or belongs to
    /// another user.
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist or belongs to
    /// another user.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The session token could not be signed.
    ///
    /// Like [Error::HashingError], the error string is for the server log
    /// only.
    #[error("could not sign session token: {0}")]
    TokenSigningError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateUser
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidCredentials => (StatusCode::BAD_REQUEST, "invalid email or password"),
            Error::DuplicateUser => (StatusCode::BAD_REQUEST, "user already exists"),
            // The same body is sent for every authentication failure so that
            // the client cannot tell a bad signature from an unknown user.
            Error::InvalidToken | Error::UnknownUser => {
                (StatusCode::UNAUTHORIZED, "invalid or missing token")
            }
            Error::UserNotFound => (StatusCode::NOT_FOUND, "user not found"),
            Error::NotFound | Error::DeleteMissingTransaction => {
                (StatusCode::NOT_FOUND, "transaction not found")
            }
            Error::UpdateMissingTransaction => (StatusCode::BAD_REQUEST, "transaction not found"),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn sql_error_maps_to_internal_server_error() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn update_and_delete_failures_use_distinct_status_codes() {
        let update_response = Error::UpdateMissingTransaction.into_response();
        let delete_response = Error::DeleteMissingTransaction.into_response();

        assert_eq!(update_response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(delete_response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn auth_failures_share_a_status_code() {
        assert_eq!(
            Error::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::UnknownUser.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
