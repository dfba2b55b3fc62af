//! Authority HTTP server lifecycle.
//!
//! [`start_server`] binds and serves until the process ends;
//! [`spawn_server`] binds, then serves on a background task and hands back
//! the bound address (used when the port is chosen by the OS).

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::router::build_router;
use crate::state::AppState;

/// Environment variable for the bind host.
pub const HOST_ENV_VAR: &str = "AUTHORITY_HOST";

/// Environment variable for the bind port.
pub const PORT_ENV_VAR: &str = "AUTHORITY_PORT";

/// Configuration for the authority server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Build a config from a variable lookup, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the port is set but not a valid `u16`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup(HOST_ENV_VAR).unwrap_or(defaults.host);
        let port = match lookup(PORT_ENV_VAR) {
            Some(raw) => raw
                .parse()
                .map_err(|e| ServerError::Bind(format!("invalid {PORT_ENV_VAR} {raw:?}: {e}")))?,
            None => defaults.port,
        };
        Ok(Self { host, port })
    }

    /// Build a config from the process environment.
    ///
    /// # Errors
    ///
    /// See [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))
    }
}

async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr = config.addr()?;
    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))
}

/// Start the authority server and serve until the process is terminated.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let listener = bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    info!(%addr, "Authority server listening");

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    Ok(())
}

/// Bind the server, then serve it on a background task.
///
/// Returns the actual bound address, so a port of `0` is usable.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the listener cannot bind.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<(SocketAddr, JoinHandle<()>), ServerError> {
    let listener = bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    info!(%addr, "Authority server listening");

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, build_router(state)).await {
            error!(error = %e, "Authority server stopped");
        }
    });
    Ok((addr, handle))
}

/// Errors that can occur when starting or running the authority server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
