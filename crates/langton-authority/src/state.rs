//! Shared application state for the authority.
//!
//! The authority is observational: it remembers the last snapshot it
//! accepted so `GET /state` has something to serve, and counts updates for
//! the health endpoint. It never feeds anything back into a simulation.

use chrono::{DateTime, Utc};
use langton_core::{AntRecord, SharedSecret, Snapshot};
use tokio::sync::RwLock;

/// The last accepted snapshot and when it arrived.
#[derive(Debug, Clone)]
pub struct LastKnown {
    /// Most recent accepted snapshot.
    pub snapshot: Snapshot,
    /// Number of accepted `POST /update` calls.
    pub updates_received: u64,
    /// Arrival time of the most recent update, `None` until the first one.
    pub last_update: Option<DateTime<Utc>>,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug)]
pub struct AppState {
    /// Token every protected request must present.
    pub secret: SharedSecret,
    /// Last-known state, replaced on each accepted update.
    pub last_known: RwLock<LastKnown>,
}

impl AppState {
    /// Create state that serves [`seed_snapshot`] until the first update.
    pub fn new(secret: SharedSecret) -> Self {
        Self {
            secret,
            last_known: RwLock::new(LastKnown {
                snapshot: seed_snapshot(),
                updates_received: 0,
                last_update: None,
            }),
        }
    }

    /// Replace the last-known snapshot. Returns the new update count.
    pub async fn record(&self, snapshot: Snapshot) -> u64 {
        let mut guard = self.last_known.write().await;
        guard.snapshot = snapshot;
        guard.updates_received = guard.updates_received.saturating_add(1);
        guard.last_update = Some(Utc::now());
        guard.updates_received
    }

    /// The snapshot `GET /state` currently serves.
    pub async fn current(&self) -> Snapshot {
        self.last_known.read().await.snapshot.clone()
    }
}

/// The snapshot served before any update arrives: a 3x3 checkerboard
/// cross with one ant in the middle facing North.
pub fn seed_snapshot() -> Snapshot {
    Snapshot {
        grid: vec![vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]],
        ants: vec![AntRecord {
            x: 1,
            y: 1,
            direction: "N".to_owned(),
            id: 0,
        }],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_a_valid_board() {
        assert!(seed_snapshot().validate().is_ok());
    }

    #[tokio::test]
    async fn record_replaces_and_counts() {
        let state = AppState::new(SharedSecret::new("k").unwrap());
        assert_eq!(state.current().await, seed_snapshot());

        let next = Snapshot {
            grid: vec![vec![1]],
            ants: Vec::new(),
        };
        assert_eq!(state.record(next.clone()).await, 1);
        assert_eq!(state.current().await, next);

        let guard = state.last_known.read().await;
        assert_eq!(guard.updates_received, 1);
        assert!(guard.last_update.is_some());
    }
}
