//! Simulation core for Langton's ant.
//!
//! One or more ants walk a binary grid, turning right on white and left on
//! black, flipping each cell they leave. This crate owns everything with
//! real invariants: the board, the tick rule, the snapshot format, the
//! local save file, and the tick loop that ties them together.
//!
//! # Modules
//!
//! - [`grid`] -- Bounds-checked cell store with a single mutator.
//! - [`ant`] -- Headings and the per-ant turn/flip/move rule.
//! - [`engine`] -- [`Simulation`]: one grid, ants stepped in id order.
//! - [`snapshot`] -- The serializable [`Snapshot`] and its validation.
//! - [`codec`] -- JSON encoding of snapshots.
//! - [`store`] -- Atomic save file.
//! - [`session`] -- "Continue" vs. "new game" and the fallback policy.
//! - [`operator`] -- Pause, speed, reload, and stop controls.
//! - [`runner`] -- The async tick loop.
//! - [`config`] -- YAML configuration and the shared secret.

pub mod ant;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod operator;
pub mod runner;
pub mod session;
pub mod snapshot;
pub mod store;

pub use ant::{Ant, Heading};
pub use config::{SharedSecret, SimulationConfig};
pub use engine::{EngineConfig, Simulation};
pub use error::SimulationError;
pub use grid::{Color, Grid};
pub use snapshot::{AntRecord, Snapshot};
pub use store::SnapshotStore;
