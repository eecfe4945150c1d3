//! Session token issuance, validation, and the middleware that guards
//! protected routes.

mod middleware;
mod token;

pub use middleware::{AuthState, auth_guard};
pub use token::{
    DEFAULT_TOKEN_DURATION, IdentityClaim, TokenKeys, issue_token, validate_token,
};
