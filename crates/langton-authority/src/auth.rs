//! Bearer-token authentication.
//!
//! Protected routes sit behind [`require_bearer`], a middleware that runs
//! before any extractor, so a bad token is rejected with 401 before the
//! body is even parsed. The token comparison is constant-time.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::AuthorityError;
use crate::state::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Reject the request unless it carries the shared secret.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthorityError> {
    let presented = bearer_token(request.headers()).unwrap_or_default();
    if !state.secret.matches(presented) {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "rejected request with invalid token"
        );
        return Err(AuthorityError::Unauthorized);
    }
    Ok(next.run(request).await)
}
