//! The binary board the ants walk on.
//!
//! A [`Grid`] is a fixed-size, row-major store of [`Color`] cells. It is
//! created all-white and never resized. The only mutator is
//! [`Grid::flip_at`]; every access is bounds-checked and O(1).

use crate::error::SimulationError;

/// Color of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Unvisited or flipped back. Persisted as `0`.
    #[default]
    White,
    /// Flipped an odd number of times. Persisted as `1`.
    Black,
}

impl Color {
    /// The persisted bit for this color.
    pub const fn as_bit(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Parse a persisted bit. Anything other than 0 or 1 is rejected.
    pub const fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(Self::White),
            1 => Some(Self::Black),
            _ => None,
        }
    }

    /// The opposite color.
    pub const fn flipped(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// Mutable two-dimensional cell store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major, `height * width` entries.
    cells: Vec<Color>,
}

impl Grid {
    /// Create an all-white grid.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidDimension`] if either dimension is
    /// zero or the cell count does not fit in memory addressing.
    pub fn new(width: usize, height: usize) -> Result<Self, SimulationError> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Color::White; len],
        })
    }

    /// Build a grid from persisted rows of bits.
    ///
    /// The caller has already checked that `rows` is exactly
    /// `height` rows of `width` entries; a short or long row is still
    /// reported as [`SimulationError::DimensionMismatch`] rather than
    /// padded or truncated.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidDimension`] for a zero dimension,
    /// [`SimulationError::DimensionMismatch`] for a ragged board, and
    /// [`SimulationError::InvalidCell`] for a value outside {0, 1}.
    pub fn from_rows(
        rows: &[Vec<u8>],
        width: usize,
        height: usize,
    ) -> Result<Self, SimulationError> {
        let len = cell_count(width, height)?;
        let mismatch = |found_width: usize| SimulationError::DimensionMismatch {
            expected_width: width,
            expected_height: height,
            found_width,
            found_height: rows.len(),
        };

        if rows.len() != height {
            return Err(mismatch(rows.first().map_or(0, Vec::len)));
        }

        let mut cells = Vec::with_capacity(len);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(mismatch(row.len()));
            }
            for (x, &value) in row.iter().enumerate() {
                let color =
                    Color::from_bit(value).ok_or(SimulationError::InvalidCell { x, y, value })?;
                cells.push(color);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Board width in cells.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Board height in cells.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Color of the cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::OutOfBounds`] if the coordinate is off the board.
    pub fn color_at(&self, x: usize, y: usize) -> Result<Color, SimulationError> {
        let index = self.index(x, y)?;
        self.cells
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_bounds(x, y))
    }

    /// Invert the cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::OutOfBounds`] if the coordinate is off the board.
    pub fn flip_at(&mut self, x: usize, y: usize) -> Result<(), SimulationError> {
        let index = self.index(x, y)?;
        let err = self.out_of_bounds(x, y);
        let cell = self.cells.get_mut(index).ok_or(err)?;
        *cell = cell.flipped();
        Ok(())
    }

    /// Export the board as rows of bits, top row first.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.as_bit()).collect())
            .collect()
    }

    /// Number of black cells on the board.
    pub fn black_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Color::Black).count()
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, SimulationError> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        y.checked_mul(self.width)
            .and_then(|row_start| row_start.checked_add(x))
            .ok_or_else(|| self.out_of_bounds(x, y))
    }

    const fn out_of_bounds(&self, x: usize, y: usize) -> SimulationError {
        SimulationError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Validate dimensions and return the number of cells.
fn cell_count(width: usize, height: usize) -> Result<usize, SimulationError> {
    if width == 0 || height == 0 {
        return Err(SimulationError::InvalidDimension { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(SimulationError::InvalidDimension { width, height })
}
