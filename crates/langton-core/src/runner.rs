//! Simulation loop runner with operator controls.
//!
//! [`run_simulation`] drives the tick loop. Each tick it:
//!
//! 1. waits while paused, and stops if asked to;
//! 2. applies a pending reload or new game;
//! 3. steps every ant;
//! 4. saves the snapshot (synchronous, on the critical path, fatal on failure);
//! 5. hands the snapshot to the [`TickCallback`] (the network push, which
//!    must not block);
//! 6. sleeps for the current tick interval.
//!
//! Stops are only honoured between ticks, so a save is never cut short.

use tracing::{error, info};

use crate::engine::{EngineConfig, Simulation};
use crate::error::SimulationError;
use crate::operator::{OperatorState, SessionCommand, SimulationEndReason};
use crate::session;
use crate::snapshot::Snapshot;
use crate::store::{SnapshotStore, StoreError};

/// Errors that end the simulation loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The save file could not be written. Continuing would silently break
    /// "continue last game", so the loop stops.
    #[error("failed to persist snapshot: {source}")]
    Persist {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The engine reported a broken invariant.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: SimulationError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// State at the end of the run.
    pub final_snapshot: Snapshot,
}

/// Callback invoked after each tick has been saved.
///
/// Implementations must return promptly; anything slow belongs on a
/// spawned task.
pub trait TickCallback: Send {
    /// Called after a tick completes and its snapshot is on disk.
    fn on_tick(&mut self, tick: u64, snapshot: &Snapshot);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _tick: u64, _snapshot: &Snapshot) {}
}

/// Run the simulation loop until the tick limit or a stop request.
///
/// # Errors
///
/// Returns [`RunnerError::Persist`] if a save fails and
/// [`RunnerError::Simulation`] if the engine breaks an invariant.
pub async fn run_simulation(
    simulation: &mut Simulation,
    store: &SnapshotStore,
    config: &EngineConfig,
    operator: &OperatorState,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        tick_rate = operator.tick_rate(),
        ants = simulation.ants().len(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!("Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return Ok(finish(SimulationEndReason::OperatorStop, total_ticks, simulation));
        }

        // --- Apply reload / new game ---
        match operator.take_pending() {
            Some(SessionCommand::Reload) => {
                info!("Reloading saved game");
                *simulation = session::resume_or_fresh(store, config)?;
            }
            Some(SessionCommand::NewGame) => {
                info!("Starting a new game");
                *simulation = Simulation::new(config)?;
            }
            None => {}
        }

        // --- Execute tick ---
        simulation.step()?;
        total_ticks = total_ticks.saturating_add(1);

        let snapshot = simulation.snapshot();
        if let Err(e) = store.save(&snapshot) {
            error!(tick = total_ticks, error = %e, "Failed to save snapshot");
            return Err(e.into());
        }

        // --- Notify callback ---
        callback.on_tick(total_ticks, &snapshot);

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(total_ticks) {
            info!(
                ticks = total_ticks,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                total_ticks,
                final_snapshot: snapshot,
            });
        }

        // --- Sleep for tick interval ---
        let interval = operator.tick_interval();
        if interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(interval).await;
        }
    }
}

fn finish(
    end_reason: SimulationEndReason,
    total_ticks: u64,
    simulation: &Simulation,
) -> SimulationResult {
    SimulationResult {
        end_reason,
        total_ticks,
        final_snapshot: simulation.snapshot(),
    }
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        ants = result.final_snapshot.ants.len(),
        "Simulation ended"
    );
}
