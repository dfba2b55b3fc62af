//! The serializable state of a simulation.
//!
//! A [`Snapshot`] is the only surface used both for the local save file
//! and for the body exchanged with the remote authority. Its JSON shape is
//! fixed:
//!
//! ```json
//! { "grille": [[0, 1], [1, 0]],
//!   "fourmis": [{ "x": 1, "y": 0, "direction": "E", "id": 0 }] }
//! ```
//!
//! Decoding only checks the shape. [`Snapshot::validate`] checks that the
//! content describes a consistent board.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ant::{Ant, Heading};
use crate::error::SimulationError;

/// Complete state of the grid and every ant at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Cell bits, row-major, top row first.
    #[serde(rename = "grille")]
    pub grid: Vec<Vec<u8>>,
    /// Ants in step order.
    #[serde(rename = "fourmis")]
    pub ants: Vec<AntRecord>,
}

/// Persisted form of one ant.
///
/// Coordinates are signed and the heading is a raw token so that malformed
/// data still decodes and is rejected with a precise error on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AntRecord {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
    /// Heading token: `N`, `E`, `S` or `O`.
    pub direction: String,
    /// Identifier.
    pub id: u32,
}

/// Widen a board coordinate for the wire format.
///
/// Coordinates index a `Vec`-backed [`Grid`](crate::grid::Grid), so they
/// are below `isize::MAX` and always fit in an `i64`. The saturating
/// fallback is never taken; if it were, [`AntRecord::to_ant`] would
/// reject the record as off the board rather than load a wrong position.
fn wire_coordinate(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl From<&Ant> for AntRecord {
    fn from(ant: &Ant) -> Self {
        Self {
            x: wire_coordinate(ant.x()),
            y: wire_coordinate(ant.y()),
            direction: ant.heading().token().to_owned(),
            id: ant.id(),
        }
    }
}

impl AntRecord {
    /// Rebuild the ant on a `width` x `height` board.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnknownHeadingToken`] for a bad token and
    /// [`SimulationError::AgentOutOfBounds`] for a position off the board.
    pub fn to_ant(&self, width: usize, height: usize) -> Result<Ant, SimulationError> {
        let heading: Heading = self.direction.parse()?;
        let x = usize::try_from(self.x).ok().filter(|&x| x < width);
        let y = usize::try_from(self.y).ok().filter(|&y| y < height);
        match (x, y) {
            (Some(x), Some(y)) => Ok(Ant::with_heading(self.id, x, y, heading)),
            _ => Err(SimulationError::AgentOutOfBounds {
                id: self.id,
                x: self.x,
                y: self.y,
            }),
        }
    }
}

impl Snapshot {
    /// Width and height implied by the grid, taken from the row count and
    /// the first row. Says nothing about whether the board is rectangular.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.grid.first().map_or(0, Vec::len), self.grid.len())
    }

    /// Check that the snapshot describes a consistent board.
    ///
    /// The board must be non-empty and rectangular with 0/1 cells; every
    /// ant must carry a known heading, sit on the board, and have a unique id.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimulationError`] found.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let (width, height) = self.dimensions();
        self.validate_against(width, height)
    }

    /// [`validate`](Self::validate) against an explicit board size.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::DimensionMismatch`] if the grid is not
    /// exactly `height` rows of `width` cells, or any error
    /// [`validate`](Self::validate) reports.
    pub fn validate_against(&self, width: usize, height: usize) -> Result<(), SimulationError> {
        if width == 0 || height == 0 {
            return Err(SimulationError::InvalidDimension { width, height });
        }
        self.check_dimensions(width, height)?;
        for (y, row) in self.grid.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value > 1 {
                    return Err(SimulationError::InvalidCell { x, y, value });
                }
            }
        }
        self.ants_on(width, height).map(|_| ())
    }

    /// Reject any grid that is not exactly `height` rows of `width` cells.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::DimensionMismatch`] describing the first
    /// offending row.
    pub fn check_dimensions(&self, width: usize, height: usize) -> Result<(), SimulationError> {
        let found_height = self.grid.len();
        let bad_row = if found_height == height {
            self.grid.iter().find(|row| row.len() != width)
        } else {
            self.grid.first()
        };
        match bad_row {
            Some(row) => Err(SimulationError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                found_width: row.len(),
                found_height,
            }),
            None if found_height != height => Err(SimulationError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                found_width: 0,
                found_height,
            }),
            None => Ok(()),
        }
    }

    /// Rebuild every ant, sorted by id ascending.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnknownHeadingToken`],
    /// [`SimulationError::AgentOutOfBounds`], or
    /// [`SimulationError::DuplicateAgentId`].
    pub fn ants_on(&self, width: usize, height: usize) -> Result<Vec<Ant>, SimulationError> {
        let mut seen = BTreeSet::new();
        let mut ants = Vec::with_capacity(self.ants.len());
        for record in &self.ants {
            if !seen.insert(record.id) {
                return Err(SimulationError::DuplicateAgentId(record.id));
            }
            ants.push(record.to_ant(width, height)?);
        }
        ants.sort_by_key(Ant::id);
        Ok(ants)
    }
}
