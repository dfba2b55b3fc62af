//! Headless simulation binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `langton-config.yaml` (or `LANGTON_CONFIG`)
//! 3. Read the shared secret from `SECRET_KEY` (fatal if missing)
//! 4. Continue the last save or start a new game (`LANGTON_START_MODE`)
//! 5. Run the tick loop, pushing each saved tick to the authority
//! 6. Stop cleanly on Ctrl-C and log the result

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use langton_client::{SyncCallback, SyncClient};
use langton_core::SimulationConfig;
use langton_core::config::SharedSecret;
use langton_core::operator::OperatorState;
use langton_core::runner::{self, NoOpCallback, TickCallback};
use langton_core::session::{self, StartMode};
use langton_core::store::SnapshotStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the config file path.
const CONFIG_ENV_VAR: &str = "LANGTON_CONFIG";

/// Environment variable selecting `continue` or `new`.
const START_MODE_ENV_VAR: &str = "LANGTON_START_MODE";

/// Default config file name.
const DEFAULT_CONFIG_PATH: &str = "langton-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the secret is missing,
/// or the simulation loop stops on a fatal error.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("langton-client starting");

    let config_path = std::env::var(CONFIG_ENV_VAR)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = load_config(&config_path)?;
    let engine = config.engine();
    info!(
        width = engine.width,
        height = engine.height,
        ants = engine.ant_count,
        tick_rate = config.simulation.tick_rate,
        max_ticks = config.simulation.max_ticks,
        sync = config.sync.enabled,
        "Configuration loaded"
    );

    let secret = SharedSecret::from_env().context("reading the shared secret")?;

    let mode = match std::env::var(START_MODE_ENV_VAR) {
        Ok(raw) => raw.parse::<StartMode>().map_err(anyhow::Error::msg)?,
        Err(_) => StartMode::default(),
    };

    let store = SnapshotStore::new(&config.storage.snapshot_path);
    let mut simulation = session::start_session(mode, &store, &engine)?;
    info!(?mode, path = %store.path().display(), "Session ready");

    let operator = Arc::new(OperatorState::new(
        config.simulation.tick_rate,
        config.simulation.max_ticks,
    ));
    spawn_stop_on_ctrl_c(Arc::clone(&operator));

    let mut worker = None;
    let mut callback: Box<dyn TickCallback> = if config.sync.enabled {
        let client = SyncClient::new(&config.sync, secret)?;
        info!(
            base_url = client.base_url(),
            timeout_ms = config.sync.timeout_ms,
            queue_capacity = config.sync.queue_capacity,
            "Sync enabled"
        );
        let (callback, handle) = SyncCallback::spawn(client, config.sync.queue_capacity);
        worker = Some(handle);
        Box::new(callback)
    } else {
        info!("Sync disabled");
        Box::new(NoOpCallback)
    };

    let result =
        runner::run_simulation(&mut simulation, &store, &engine, &operator, callback.as_mut())
            .await?;
    runner::log_simulation_end(&result);

    // Closing the queue lets the worker send what is left.
    drop(callback);
    if let Some(handle) = worker {
        if tokio::time::timeout(config.sync.timeout(), handle).await.is_err() {
            warn!("Pending pushes abandoned at shutdown");
        }
    }

    Ok(())
}

/// Load the config file, or fall back to defaults if it does not exist.
fn load_config(path: &Path) -> anyhow::Result<SimulationConfig> {
    if path.exists() {
        SimulationConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}

fn spawn_stop_on_ctrl_c(operator: Arc<OperatorState>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current tick");
                operator.request_stop();
            }
            Err(e) => warn!(error = %e, "cannot listen for Ctrl-C"),
        }
    });
}
