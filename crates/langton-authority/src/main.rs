//! Authority binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Read the shared secret from `SECRET_KEY` (fatal if missing)
//! 3. Read the bind address from `AUTHORITY_HOST` / `AUTHORITY_PORT`
//! 4. Serve until terminated

use std::sync::Arc;

use langton_authority::{AppState, ServerConfig, start_server};
use langton_core::SharedSecret;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application entry point for the authority.
///
/// # Errors
///
/// Returns an error if the secret is missing, the address is invalid, or
/// the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("langton-authority starting");

    let secret = SharedSecret::from_env().inspect_err(|e| error!(error = %e, "cannot start"))?;
    let config = ServerConfig::from_env()?;
    info!(host = config.host, port = config.port, "Configuration loaded");

    let state = Arc::new(AppState::new(secret));
    start_server(&config, state).await?;

    info!("langton-authority shut down");
    Ok(())
}
