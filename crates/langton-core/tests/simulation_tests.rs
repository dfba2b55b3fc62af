//! Integration tests for the simulation core.
//!
//! These exercise the public API the way the client binary does: build a
//! simulation, run it through the save file, and check that persistence
//! never changes the outcome.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use langton_core::codec;
use langton_core::engine::{EngineConfig, Simulation};
use langton_core::error::SimulationError;
use langton_core::operator::{OperatorState, SimulationEndReason};
use langton_core::runner::{NoOpCallback, run_simulation};
use langton_core::session::{StartMode, start_session};
use langton_core::snapshot::{AntRecord, Snapshot};
use langton_core::store::SnapshotStore;

fn config(ant_count: u32) -> EngineConfig {
    EngineConfig {
        width: 21,
        height: 17,
        ant_count,
    }
}

fn run(sim: &mut Simulation, ticks: usize) {
    for _ in 0..ticks {
        sim.step().unwrap();
    }
}

#[test]
fn save_and_resume_matches_an_uninterrupted_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("sauvegarde.json"));

    let mut straight = Simulation::new(&config(3)).unwrap();
    run(&mut straight, 400);

    let mut first_half = Simulation::new(&config(3)).unwrap();
    run(&mut first_half, 250);
    store.save(&first_half.snapshot()).unwrap();

    let mut resumed = start_session(StartMode::Continue, &store, &config(3)).unwrap();
    run(&mut resumed, 150);

    assert_eq!(resumed.snapshot(), straight.snapshot());
}

#[test]
fn snapshot_text_round_trips_through_the_engine() {
    let mut sim = Simulation::new(&config(2)).unwrap();
    run(&mut sim, 97);
    let snapshot = sim.snapshot();

    let text = codec::encode(&snapshot).unwrap();
    let decoded = codec::decode(&text).unwrap();
    assert_eq!(decoded, snapshot);

    let reloaded = Simulation::load(&decoded, 21, 17).unwrap();
    assert_eq!(reloaded, sim);
}

#[test]
fn reload_with_a_different_board_size_is_a_mismatch() {
    let sim = Simulation::new(&config(1)).unwrap();
    let snapshot = sim.snapshot();

    let err = Simulation::load(&snapshot, 20, 17).unwrap_err();
    assert_eq!(
        err,
        SimulationError::DimensionMismatch {
            expected_width: 20,
            expected_height: 17,
            found_width: 21,
            found_height: 17,
        }
    );
    assert!(err.is_recoverable());
    assert!(Simulation::load(&snapshot, 21, 18).is_err());
}

#[test]
fn ant_order_in_the_snapshot_does_not_change_the_outcome() {
    let grid = vec![vec![0; 9]; 9];
    let forward = Snapshot {
        grid: grid.clone(),
        ants: vec![
            AntRecord { x: 4, y: 4, direction: "N".to_owned(), id: 0 },
            AntRecord { x: 4, y: 4, direction: "E".to_owned(), id: 1 },
        ],
    };
    let mut reversed = forward.clone();
    reversed.ants.reverse();

    let mut a = Simulation::load(&forward, 9, 9).unwrap();
    let mut b = Simulation::load(&reversed, 9, 9).unwrap();
    run(&mut a, 60);
    run(&mut b, 60);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[tokio::test]
async fn runner_output_matches_manual_stepping() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("sauvegarde.json"));
    let operator = OperatorState::new(u32::MAX, 120);

    let mut looped = Simulation::new(&config(2)).unwrap();
    let result = run_simulation(&mut looped, &store, &config(2), &operator, &mut NoOpCallback)
        .await
        .unwrap();

    let mut manual = Simulation::new(&config(2)).unwrap();
    run(&mut manual, 120);

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(result.final_snapshot, manual.snapshot());
    assert_eq!(store.load().unwrap(), Some(manual.snapshot()));
}

#[test]
fn ants_stay_on_the_board_for_long_runs() {
    let mut sim = Simulation::new(&EngineConfig {
        width: 5,
        height: 3,
        ant_count: 4,
    })
    .unwrap();
    for _ in 0..2_000 {
        sim.step().unwrap();
        for ant in sim.ants() {
            assert!(ant.x() < 5 && ant.y() < 3);
        }
    }
}
