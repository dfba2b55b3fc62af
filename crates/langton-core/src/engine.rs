//! The simulation engine: one grid, many ants, one tick at a time.
//!
//! [`Simulation`] owns its [`Grid`] exclusively. Ants are stepped in id
//! order against the shared board, so an ant sees every flip made earlier
//! in the same tick. That order is observable in the resulting state and
//! is what makes a run reproducible.

use tracing::debug;

use crate::ant::Ant;
use crate::error::SimulationError;
use crate::grid::Grid;
use crate::snapshot::{AntRecord, Snapshot};

/// Immutable construction parameters for a fresh simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Board width in cells.
    pub width: usize,
    /// Board height in cells.
    pub height: usize,
    /// Number of ants placed on a fresh board.
    pub ant_count: u32,
}

/// A running Langton's ant simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    grid: Grid,
    /// Sorted by id ascending; this is the step order.
    ants: Vec<Ant>,
}

impl Simulation {
    /// Start a new game: an all-white board with every ant at the centre
    /// facing North, ids `0..ant_count`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidDimension`] for a zero dimension.
    pub fn new(config: &EngineConfig) -> Result<Self, SimulationError> {
        let grid = Grid::new(config.width, config.height)?;
        let (cx, cy) = (config.width / 2, config.height / 2);
        let ants = (0..config.ant_count).map(|id| Ant::new(id, cx, cy)).collect();
        Ok(Self { grid, ants })
    }

    /// Assemble a simulation from parts, re-sorting ants into step order.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::OutOfBounds`] if an ant is off the board
    /// or [`SimulationError::DuplicateAgentId`] if two ants share an id.
    pub fn from_parts(grid: Grid, mut ants: Vec<Ant>) -> Result<Self, SimulationError> {
        ants.sort_by_key(Ant::id);
        for pair in ants.windows(2) {
            if let [a, b] = pair {
                if a.id() == b.id() {
                    return Err(SimulationError::DuplicateAgentId(a.id()));
                }
            }
        }
        for ant in &ants {
            grid.color_at(ant.x(), ant.y())?;
        }
        Ok(Self { grid, ants })
    }

    /// Rebuild a simulation from a snapshot of an expected size.
    ///
    /// The grid is copied in exactly; nothing is truncated or padded. Ants
    /// are rebuilt from the snapshot's list and stepped in id order.
    /// Falling back to a fresh game on failure is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::DimensionMismatch`] if the grid is not
    /// `expected_height` rows of `expected_width` cells,
    /// [`SimulationError::UnknownHeadingToken`] for a bad heading, and
    /// [`SimulationError::InvalidCell`], [`SimulationError::AgentOutOfBounds`]
    /// or [`SimulationError::DuplicateAgentId`] for other malformed content.
    pub fn load(
        snapshot: &Snapshot,
        expected_width: usize,
        expected_height: usize,
    ) -> Result<Self, SimulationError> {
        if expected_width == 0 || expected_height == 0 {
            return Err(SimulationError::InvalidDimension {
                width: expected_width,
                height: expected_height,
            });
        }
        snapshot.check_dimensions(expected_width, expected_height)?;
        let grid = Grid::from_rows(&snapshot.grid, expected_width, expected_height)?;
        let ants = snapshot.ants_on(expected_width, expected_height)?;
        Ok(Self { grid, ants })
    }

    /// Advance every ant by one step, in id order.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::OutOfBounds`] only if an ant has left the
    /// board, which the clamp in the move rule rules out.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        for ant in &mut self.ants {
            ant.step(&mut self.grid)?;
        }
        debug!(ants = self.ants.len(), "ants stepped");
        Ok(())
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.to_rows(),
            ants: self.ants.iter().map(AntRecord::from).collect(),
        }
    }

    /// The board.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The ants, in step order.
    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ant::Heading;
    use crate::grid::Color;

    fn config(width: usize, height: usize, ant_count: u32) -> EngineConfig {
        EngineConfig {
            width,
            height,
            ant_count,
        }
    }

    fn record(x: i64, y: i64, direction: &str, id: u32) -> AntRecord {
        AntRecord {
            x,
            y,
            direction: direction.to_owned(),
            id,
        }
    }

    #[test]
    fn new_game_places_ants_at_the_centre() {
        let sim = Simulation::new(&config(5, 4, 3)).unwrap();
        assert_eq!(sim.ants().len(), 3);
        for (expected_id, ant) in (0..3).zip(sim.ants()) {
            assert_eq!(ant.id(), expected_id);
            assert_eq!((ant.x(), ant.y()), (2, 2));
            assert_eq!(ant.heading(), Heading::North);
        }
        assert_eq!(sim.grid().black_count(), 0);
    }

    #[test]
    fn new_game_rejects_empty_board() {
        assert!(matches!(
            Simulation::new(&config(0, 4, 1)),
            Err(SimulationError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn single_step_matches_the_canonical_first_move() {
        let grid = Grid::new(3, 3).unwrap();
        let mut sim = Simulation::from_parts(grid, vec![Ant::new(0, 1, 1)]).unwrap();
        sim.step().unwrap();

        let ant = &sim.ants()[0];
        assert_eq!(ant.heading(), Heading::East);
        assert_eq!((ant.x(), ant.y()), (2, 1));
        assert_eq!(sim.grid().color_at(1, 1).unwrap(), Color::Black);
    }

    #[test]
    fn co_located_ants_share_the_board_in_id_order() {
        // Both ants start on the same white cell. Ant 0 turns right and
        // flips it black; ant 1 then reads black and turns left, flipping
        // it back to white.
        let mut sim = Simulation::new(&config(3, 3, 2)).unwrap();
        sim.step().unwrap();

        let (first, second) = (&sim.ants()[0], &sim.ants()[1]);
        assert_eq!(first.heading(), Heading::East);
        assert_eq!((first.x(), first.y()), (2, 1));
        assert_eq!(second.heading(), Heading::West);
        assert_eq!((second.x(), second.y()), (0, 1));
        assert_eq!(sim.grid().color_at(1, 1).unwrap(), Color::White);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut sim = Simulation::new(&config(3, 3, 1)).unwrap();
        sim.step().unwrap();
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.grid, vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]);
        assert_eq!(snapshot.ants, vec![record(2, 1, "E", 0)]);
    }

    #[test]
    fn load_then_snapshot_reproduces_the_input() {
        let snapshot = Snapshot {
            grid: vec![vec![1, 1, 1], vec![0, 0, 0], vec![1, 1, 1]],
            ants: vec![record(2, 2, "E", 0), record(0, 1, "O", 1)],
        };
        let sim = Simulation::load(&snapshot, 3, 3).unwrap();
        assert_eq!(sim.snapshot(), snapshot);
    }

    #[test]
    fn load_sorts_ants_by_id() {
        let snapshot = Snapshot {
            grid: vec![vec![0, 0], vec![0, 0]],
            ants: vec![record(1, 1, "S", 4), record(0, 0, "N", 1)],
        };
        let sim = Simulation::load(&snapshot, 2, 2).unwrap();
        let ids: Vec<u32> = sim.ants().iter().map(Ant::id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn load_rejects_wrong_height_and_width() {
        let snapshot = Snapshot {
            grid: vec![vec![0, 0, 0], vec![0, 0, 0]],
            ants: Vec::new(),
        };
        assert!(matches!(
            Simulation::load(&snapshot, 3, 3),
            Err(SimulationError::DimensionMismatch { found_height: 2, .. })
        ));
        assert!(matches!(
            Simulation::load(&snapshot, 4, 2),
            Err(SimulationError::DimensionMismatch { found_width: 3, .. })
        ));
    }

    #[test]
    fn load_rejects_one_short_row() {
        let snapshot = Snapshot {
            grid: vec![vec![0, 0, 0], vec![0, 0], vec![0, 0, 0]],
            ants: Vec::new(),
        };
        assert!(matches!(
            Simulation::load(&snapshot, 3, 3),
            Err(SimulationError::DimensionMismatch { found_width: 2, .. })
        ));
    }

    #[test]
    fn load_rejects_unknown_heading() {
        let snapshot = Snapshot {
            grid: vec![vec![0]],
            ants: vec![record(0, 0, "NE", 0)],
        };
        assert_eq!(
            Simulation::load(&snapshot, 1, 1),
            Err(SimulationError::UnknownHeadingToken("NE".to_owned()))
        );
    }

    #[test]
    fn from_parts_rejects_duplicates_and_strays() {
        let grid = Grid::new(2, 2).unwrap();
        assert_eq!(
            Simulation::from_parts(grid.clone(), vec![Ant::new(1, 0, 0), Ant::new(1, 1, 1)]),
            Err(SimulationError::DuplicateAgentId(1))
        );
        assert!(matches!(
            Simulation::from_parts(grid, vec![Ant::new(0, 2, 0)]),
            Err(SimulationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn runs_are_deterministic() {
        let start = Snapshot {
            grid: vec![vec![0; 8]; 6],
            ants: vec![record(2, 2, "N", 0), record(5, 3, "S", 1), record(2, 2, "E", 2)],
        };
        let run = || {
            let mut sim = Simulation::load(&start, 8, 6).unwrap();
            for _ in 0..200 {
                sim.step().unwrap();
            }
            sim.snapshot()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn empty_colony_never_changes_the_board() {
        let mut sim = Simulation::new(&config(4, 4, 0)).unwrap();
        let before = sim.snapshot();
        sim.step().unwrap();
        assert_eq!(sim.snapshot(), before);
    }
}
