//! Choosing the simulation to run: continue the last game or start fresh.
//!
//! The engine itself never falls back. This module owns the recovery
//! policy: anything wrong with the save file (absent, unreadable,
//! undecodable, or for a different board) is logged and replaced by a new
//! game. Only an unusable configuration is fatal.

use std::str::FromStr;

use tracing::{info, warn};

use crate::engine::{EngineConfig, Simulation};
use crate::error::SimulationError;
use crate::store::SnapshotStore;

/// How to obtain the initial simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartMode {
    /// Resume from the save file when possible.
    #[default]
    Continue,
    /// Always start a new game.
    New,
}

impl FromStr for StartMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "continue" | "continuer" | "resume" => Ok(Self::Continue),
            "new" | "nouvelle" => Ok(Self::New),
            other => Err(format!("unknown start mode: {other}")),
        }
    }
}

/// Build the simulation to run according to `mode`.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidDimension`] if `config` cannot even
/// produce a fresh board.
pub fn start_session(
    mode: StartMode,
    store: &SnapshotStore,
    config: &EngineConfig,
) -> Result<Simulation, SimulationError> {
    match mode {
        StartMode::New => {
            info!("starting a new game");
            Simulation::new(config)
        }
        StartMode::Continue => resume_or_fresh(store, config),
    }
}

/// Reload the save file, or start a new game if that is not possible.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidDimension`] if `config` cannot
/// produce a fresh board.
pub fn resume_or_fresh(
    store: &SnapshotStore,
    config: &EngineConfig,
) -> Result<Simulation, SimulationError> {
    let snapshot = match store.load() {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            warn!(path = %store.path().display(), "no save found, starting a new game");
            return Simulation::new(config);
        }
        Err(e) => {
            warn!(error = %e, "save file unusable, starting a new game");
            return Simulation::new(config);
        }
    };

    match Simulation::load(&snapshot, config.width, config.height) {
        Ok(simulation) => {
            info!(
                ants = simulation.ants().len(),
                width = config.width,
                height = config.height,
                "resumed saved game"
            );
            Ok(simulation)
        }
        Err(e) if e.is_recoverable() => {
            warn!(error = %e, "saved game does not fit this board, starting a new game");
            Simulation::new(config)
        }
        Err(e) => Err(e),
    }
}
