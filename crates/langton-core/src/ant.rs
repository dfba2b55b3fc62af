//! Ants and their headings.
//!
//! An [`Ant`] is a position, a [`Heading`], and an identifier. Each step it
//! reads the cell under it, turns, flips that cell, and moves one cell
//! forward, clamped to the board edge.

use std::fmt;
use std::str::FromStr;

use crate::error::SimulationError;
use crate::grid::{Color, Grid};

/// One of the four cardinal directions.
///
/// The cyclic order is fixed: North, East, South, West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heading {
    /// Towards row 0. Token `N`.
    #[default]
    North,
    /// Towards higher columns. Token `E`.
    East,
    /// Towards higher rows. Token `S`.
    South,
    /// Towards column 0. Token `O`.
    West,
}

impl Heading {
    /// Every heading in clockwise order, starting at North.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Rotate a quarter turn clockwise (N -> E -> S -> W -> N).
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Rotate a quarter turn counter-clockwise (N -> W -> S -> E -> N).
    pub const fn counter_clockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// The persisted token for this heading.
    pub const fn token(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::East => "E",
            Self::South => "S",
            Self::West => "O",
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Heading {
    type Err = SimulationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "N" => Ok(Self::North),
            "E" => Ok(Self::East),
            "S" => Ok(Self::South),
            "O" => Ok(Self::West),
            other => Err(SimulationError::UnknownHeadingToken(other.to_owned())),
        }
    }
}

/// A single Langton's ant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ant {
    id: u32,
    x: usize,
    y: usize,
    heading: Heading,
}

impl Ant {
    /// Create an ant facing North.
    pub const fn new(id: u32, x: usize, y: usize) -> Self {
        Self::with_heading(id, x, y, Heading::North)
    }

    /// Create an ant with an explicit heading.
    pub const fn with_heading(id: u32, x: usize, y: usize, heading: Heading) -> Self {
        Self { id, x, y, heading }
    }

    /// Identifier, unique within one simulation.
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Current column.
    pub const fn x(&self) -> usize {
        self.x
    }

    /// Current row.
    pub const fn y(&self) -> usize {
        self.y
    }

    /// Current heading.
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Apply one step of the rule against `grid`.
    ///
    /// Order matters: rotate on the current cell's color, flip that same
    /// cell, then move and clamp.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::OutOfBounds`] if the ant is somehow off
    /// the board. Callers treat that as a broken invariant.
    pub fn step(&mut self, grid: &mut Grid) -> Result<(), SimulationError> {
        self.heading = match grid.color_at(self.x, self.y)? {
            Color::White => self.heading.clockwise(),
            Color::Black => self.heading.counter_clockwise(),
        };
        grid.flip_at(self.x, self.y)?;
        self.advance(grid.width(), grid.height());
        Ok(())
    }

    /// Move one cell along the current heading, pinned to the board edge.
    ///
    /// An ant that would leave the board stays on the boundary coordinate.
    pub fn advance(&mut self, width: usize, height: usize) {
        let max_x = width.saturating_sub(1);
        let max_y = height.saturating_sub(1);
        match self.heading {
            Heading::North => self.y = self.y.saturating_sub(1),
            Heading::East => self.x = self.x.saturating_add(1),
            Heading::South => self.y = self.y.saturating_add(1),
            Heading::West => self.x = self.x.saturating_sub(1),
        }
        self.x = self.x.min(max_x);
        self.y = self.y.min(max_y);
    }
}
