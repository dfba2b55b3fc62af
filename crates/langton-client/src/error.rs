//! Error types for the sync client.
//!
//! None of these ever reach the tick loop: a failed push is logged and
//! dropped. They surface only from the direct request methods.

/// Errors from talking to the authority.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The request never got a response (connection refused, TLS, timeout)
    /// or the response body was not a snapshot.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The authority rejected the bearer token.
    #[error("authority rejected the token")]
    Unauthorized,

    /// The authority answered with a non-success status.
    #[error("authority returned status {0}")]
    Status(u16),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        source: reqwest::Error,
    },
}
