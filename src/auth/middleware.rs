//! Authentication middleware that validates bearer tokens before any
//! protected handler runs.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{AppState, Error, auth::token::{TokenKeys, validate_token}};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The keys used to verify session tokens.
    pub token_keys: TokenKeys,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the
/// Authorization header.
///
/// The identity claim is placed into the request and the request executed
/// normally if the token is valid, otherwise a 401 response with a generic
/// body is returned before any store access happens.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(claim): Extension<IdentityClaim>` to receive the identity
/// claim.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bearer =
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &state).await {
            Ok(TypedHeader(header)) => header,
            Err(_) => return Error::InvalidToken.into_response(),
        };

    match validate_token(bearer.token(), &state.token_keys) {
        Ok(claim) => {
            parts.extensions.insert(claim);
            let request = Request::from_parts(parts, body);

            next.run(request).await
        }
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{Extension, Router, middleware, routing::get};
    use axum_test::TestServer;
    use time::Duration;

    use crate::auth::token::{
        DEFAULT_TOKEN_DURATION, IdentityClaim, TokenKeys, issue_token,
    };

    use super::{AuthState, auth_guard};

    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_SECRET: &str = "nafstenoas";

    async fn test_handler(Extension(claim): Extension<IdentityClaim>) -> String {
        claim.email
    }

    fn get_test_server(token_keys: TokenKeys) -> TestServer {
        let state = AuthState { token_keys };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_token() {
        let keys = TokenKeys::new(TEST_SECRET, DEFAULT_TOKEN_DURATION);
        let server = get_test_server(keys.clone());
        let token = issue_token("test@test.com", &keys).unwrap();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        response.assert_text("test@test.com");
    }

    #[tokio::test]
    async fn get_protected_route_with_no_token_returns_unauthorized() {
        let keys = TokenKeys::new(TEST_SECRET, DEFAULT_TOKEN_DURATION);
        let server = get_test_server(keys);

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn get_protected_route_with_malformed_header_returns_unauthorized() {
        let keys = TokenKeys::new(TEST_SECRET, DEFAULT_TOKEN_DURATION);
        let server = get_test_server(keys);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_header("authorization", "FOOBAR")
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn get_protected_route_with_tampered_token_returns_unauthorized() {
        let keys = TokenKeys::new(TEST_SECRET, DEFAULT_TOKEN_DURATION);
        let server = get_test_server(keys);
        let other_keys = TokenKeys::new("a-different-secret", DEFAULT_TOKEN_DURATION);
        let token = issue_token("test@test.com", &other_keys).unwrap();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(&token)
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn get_protected_route_with_expired_token_returns_unauthorized() {
        let keys = TokenKeys::new(TEST_SECRET, DEFAULT_TOKEN_DURATION);
        let server = get_test_server(keys);
        let expired_keys = TokenKeys::new(TEST_SECRET, Duration::minutes(-5));
        let token = issue_token("test@test.com", &expired_keys).unwrap();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(&token)
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn unauthorized_response_has_a_generic_body() {
        let keys = TokenKeys::new(TEST_SECRET, DEFAULT_TOKEN_DURATION);
        let server = get_test_server(keys);

        let no_token_body = server.get(TEST_PROTECTED_ROUTE).await.text();
        let bad_token_body = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer("FOOBAR")
            .await
            .text();

        assert_eq!(no_token_body, bad_token_body);
    }
}
