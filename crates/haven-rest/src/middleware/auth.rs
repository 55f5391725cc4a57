//! Authentication middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use haven_security::TokenProviderInterface;
use std::sync::Arc;
use tracing::debug;

/// Authentication middleware state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub token_provider: Arc<dyn TokenProviderInterface>,
}

impl AuthMiddlewareState {
    pub fn new(token_provider: Arc<dyn TokenProviderInterface>) -> Self {
        Self { token_provider }
    }
}

/// Validates a bearer access token and stores its claims in the request
/// extensions.
///
/// Requests without a valid token pass through untouched; handlers that need
/// a caller reject them through their extractors.
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        match state.token_provider.validate_access_token(bearer.token()) {
            Ok(claims) => {
                debug!("Authenticated user: {}", claims.username);
                request.extensions_mut().insert(claims);
            }
            Err(e) => debug!("Token validation failed: {}", e),
        }
    }

    next.run(request).await
}
