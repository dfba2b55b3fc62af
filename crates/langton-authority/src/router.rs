//! Axum router construction for the authority.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::auth::require_bearer;
use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// - `GET /state` and `POST /update` require `Authorization: Bearer <secret>`.
/// - `GET /health` is open.
///
/// The bearer check is a route layer, so it only wraps matched protected
/// routes and runs ahead of the JSON extractor.
pub fn build_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/state", get(handlers::get_state))
        .route("/update", post(handlers::update_state))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer,
        ));

    Router::new()
        .merge(protected)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
