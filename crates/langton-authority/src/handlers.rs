//! Endpoint handlers for the authority.
//!
//! # Endpoints
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | `GET` | `/state` | bearer | Last-known snapshot |
//! | `POST` | `/update` | bearer | Accept a snapshot and echo it back |
//! | `GET` | `/health` | none | Liveness and update counters |
//!
//! Authentication is enforced by [`require_bearer`](crate::auth::require_bearer)
//! before these handlers run.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use langton_core::Snapshot;
use tracing::{debug, info};

use crate::error::AuthorityError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /state
// ---------------------------------------------------------------------------

/// Serve the last-known snapshot.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    let snapshot = state.current().await;
    debug!(ants = snapshot.ants.len(), "serving state");
    Json(snapshot)
}

// ---------------------------------------------------------------------------
// POST /update
// ---------------------------------------------------------------------------

/// Accept a snapshot pushed by a client and echo it back unchanged.
///
/// # Errors
///
/// Returns [`AuthorityError::InvalidSnapshot`] (422) if the board is not
/// consistent. The stored state is left untouched in that case.
pub async fn update_state(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<Snapshot>,
) -> Result<Json<Snapshot>, AuthorityError> {
    snapshot.validate()?;
    let (width, height) = snapshot.dimensions();
    let count = state.record(snapshot.clone()).await;
    info!(
        updates = count,
        width,
        height,
        ants = snapshot.ants.len(),
        "accepted update"
    );
    Ok(Json(snapshot))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report liveness with the number of accepted updates.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let guard = state.last_known.read().await;
    Json(serde_json::json!({
        "status": "ok",
        "updates_received": guard.updates_received,
        "last_update": guard.last_update.map(|at| at.to_rfc3339()),
    }))
}
