//! Issues and validates the signed bearer tokens that carry a user's
//! identity claim between requests.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::Error;

/// How long a session token stays valid after it is issued.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::days(7);

/// The keys used to sign and verify session tokens, plus the validity period
/// stamped into each token.
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// The duration for which issued tokens are valid.
    pub token_duration: Duration,
}

impl TokenKeys {
    /// Create signing and verification keys from a `secret` string.
    pub fn new(secret: &str, token_duration: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_duration,
        }
    }
}

/// The payload signed into a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The email of the user the token was issued to.
    sub: String,
    /// Expiry as a unix timestamp.
    exp: i64,
}

/// The user-identifying payload carried inside a validated session token.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityClaim {
    /// The email of the authenticated user.
    pub email: String,
}

/// Sign a session token for the user with `email`.
///
/// The token expires [TokenKeys::token_duration] after issuance.
///
/// # Errors
///
/// Returns an [Error::TokenSigningError] if the signing library fails.
pub fn issue_token(email: &str, keys: &TokenKeys) -> Result<String, Error> {
    let expires_at = OffsetDateTime::now_utc() + keys.token_duration;
    let claims = Claims {
        sub: email.to_string(),
        exp: expires_at.unix_timestamp(),
    };

    encode(&Header::default(), &claims, &keys.encoding_key)
        .map_err(|e| Error::TokenSigningError(e.to_string()))
}

/// Validate a session token and extract the identity claim inside it.
///
/// # Errors
///
/// Returns [Error::InvalidToken] if the token is malformed, was signed with
/// a different secret, or has expired. The reason is deliberately not
/// reported to the caller.
pub fn validate_token(token: &str, keys: &TokenKeys) -> Result<IdentityClaim, Error> {
    decode::<Claims>(token, &keys.decoding_key, &Validation::default())
        .map(|data| IdentityClaim {
            email: data.claims.sub,
        })
        .map_err(|_| Error::InvalidToken)
}
