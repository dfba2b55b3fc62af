//! Snapshot sync against the remote authority.
//!
//! The tick loop hands snapshots to [`SyncCallback`], which queues them
//! for a single worker task and returns at once. The queue is bounded and
//! every request carries the configured deadline, so a stalled authority
//! costs at most one open request plus a full queue. Snapshots that do
//! not fit are dropped; failures are logged at `warn`. There is no retry.

use langton_core::config::SyncConfig;
use langton_core::runner::TickCallback;
use langton_core::{SharedSecret, Snapshot};
use reqwest::StatusCode;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::SyncError;

/// HTTP client for the authority's `/state` and `/update` endpoints.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SyncClient {
    client: reqwest::Client,
    base_url: String,
    secret: SharedSecret,
}

impl SyncClient {
    /// Build a client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Client`] if the TLS backend cannot be set up.
    pub fn new(config: &SyncConfig, secret: SharedSecret) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|source| SyncError::Client { source })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            secret,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.secret.expose())
    }

    /// Send `snapshot` to `POST /update` and return the authority's echo.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Unauthorized`] on 401, [`SyncError::Status`]
    /// on any other non-success status, and [`SyncError::Transport`] if
    /// the request fails or the echo is not a snapshot.
    pub async fn post_update(&self, snapshot: &Snapshot) -> Result<Snapshot, SyncError> {
        let response = self
            .client
            .post(self.url("/update"))
            .header("Authorization", self.authorization())
            .json(snapshot)
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    /// Read the authority's last-known snapshot from `GET /state`.
    ///
    /// # Errors
    ///
    /// Same as [`post_update`](Self::post_update).
    pub async fn fetch_state(&self) -> Result<Snapshot, SyncError> {
        let response = self
            .client
            .get(self.url("/state"))
            .header("Authorization", self.authorization())
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    /// Push `snapshot` on a detached task and return without waiting.
    ///
    /// The outcome is only logged. Awaiting the handle is optional. The
    /// task ends within the request deadline.
    pub fn push(&self, snapshot: Snapshot) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move { client.deliver(&snapshot).await })
    }

    async fn deliver(&self, snapshot: &Snapshot) {
        match self.post_update(snapshot).await {
            Ok(_) => debug!(ants = snapshot.ants.len(), "snapshot pushed"),
            Err(e) => warn!(error = %e, base_url = %self.base_url, "snapshot push failed"),
        }
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(SyncError::Unauthorized);
    }
    if !status.is_success() {
        return Err(SyncError::Status(status.as_u16()));
    }
    Ok(response)
}

/// Tick callback that queues every saved snapshot for the sync worker.
///
/// Dropping the callback closes the queue; the worker sends what is left
/// and exits.
#[derive(Debug)]
pub struct SyncCallback {
    queue: mpsc::Sender<Snapshot>,
    dropped: u64,
}

impl SyncCallback {
    /// Start the worker and return the callback feeding it.
    ///
    /// At most `capacity` snapshots wait behind the one in flight; a
    /// capacity of 0 is treated as 1.
    pub fn spawn(client: SyncClient, capacity: usize) -> (Self, JoinHandle<()>) {
        let (queue, mut pending) = mpsc::channel::<Snapshot>(capacity.max(1));
        let worker = tokio::spawn(async move {
            while let Some(snapshot) = pending.recv().await {
                client.deliver(&snapshot).await;
            }
            debug!("sync worker finished");
        });
        (Self::with_queue(queue), worker)
    }

    const fn with_queue(queue: mpsc::Sender<Snapshot>) -> Self {
        Self { queue, dropped: 0 }
    }

    /// Snapshots discarded because the queue was full or closed.
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl TickCallback for SyncCallback {
    fn on_tick(&mut self, tick: u64, snapshot: &Snapshot) {
        match self.queue.try_reserve() {
            Ok(slot) => slot.send(snapshot.clone()),
            Err(TrySendError::Full(())) => {
                self.dropped = self.dropped.saturating_add(1);
                debug!(tick, dropped = self.dropped, "sync queue full, snapshot dropped");
            }
            Err(TrySendError::Closed(())) => {
                self.dropped = self.dropped.saturating_add(1);
                if self.dropped == 1 {
                    info!(tick, "sync worker gone, snapshots are no longer pushed");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SyncConfig {
        SyncConfig {
            base_url: base_url.to_owned(),
            ..SyncConfig::default()
        }
    }

    fn board() -> Snapshot {
        Snapshot {
            grid: vec![vec![0]],
            ants: Vec::new(),
        }
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let secret = SharedSecret::new("k").unwrap();
        let client = SyncClient::new(&config("https://localhost:8000/"), secret).unwrap();
        assert_eq!(client.base_url(), "https://localhost:8000");
        assert_eq!(client.url("/update"), "https://localhost:8000/update");
    }

    #[test]
    fn authorization_uses_bearer_scheme() {
        let secret = SharedSecret::new("s3cret").unwrap();
        let client = SyncClient::new(&config("http://127.0.0.1:1"), secret).unwrap();
        assert_eq!(client.authorization(), "Bearer s3cret");
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let secret = SharedSecret::new("s3cret").unwrap();
        let client = SyncClient::new(&config("http://127.0.0.1:1"), secret).unwrap();
        assert!(!format!("{client:?}").contains("s3cret"));
    }

    #[test]
    fn full_queue_drops_instead_of_waiting() {
        let (queue, mut pending) = mpsc::channel(2);
        let mut callback = SyncCallback::with_queue(queue);

        for tick in 1..=5 {
            callback.on_tick(tick, &board());
        }

        assert_eq!(callback.dropped(), 3);
        assert!(pending.try_recv().is_ok());
        assert!(pending.try_recv().is_ok());
        assert!(pending.try_recv().is_err());
    }

    #[test]
    fn closed_queue_drops_quietly() {
        let (queue, pending) = mpsc::channel(2);
        drop(pending);
        let mut callback = SyncCallback::with_queue(queue);

        callback.on_tick(1, &board());
        callback.on_tick(2, &board());

        assert_eq!(callback.dropped(), 2);
    }
}
