//! Sync client for the Langton simulation.
//!
//! Pushes each saved snapshot to the remote authority through a bounded
//! queue and a single worker, so the tick loop never waits on the network,
//! and offers direct `GET /state` / `POST /update` calls.

pub mod error;
pub mod sync;

pub use error::SyncError;
pub use sync::{SyncCallback, SyncClient};
