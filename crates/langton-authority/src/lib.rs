//! Remote authority for Langton simulation snapshots.
//!
//! A small Axum service that authenticates every state request with a
//! pre-shared bearer token, keeps the last snapshot a client pushed, and
//! echoes updates back. It has no say over how any simulation evolves.
//!
//! # Modules
//!
//! - [`auth`] -- Bearer token extraction and the auth middleware.
//! - [`error`] -- [`AuthorityError`](error::AuthorityError) and its HTTP mapping.
//! - [`handlers`] -- `GET /state`, `POST /update`, `GET /health`.
//! - [`router`] -- Route table.
//! - [`server`] -- Bind/serve lifecycle and server config.
//! - [`state`] -- Shared last-known state.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::AuthorityError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, spawn_server, start_server};
pub use state::AppState;
