//! Error types for the authority API.
//!
//! [`AuthorityError`] converts into an HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation, with a
//! `{"error": ..., "status": ...}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use langton_core::SimulationError;

/// Errors that can occur in the authority API layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    /// Missing, malformed, or wrong bearer token.
    #[error("invalid token")]
    Unauthorized,

    /// The posted snapshot is well-formed JSON but not a consistent board.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(#[from] SimulationError),
}

impl IntoResponse for AuthorityError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidSnapshot(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
