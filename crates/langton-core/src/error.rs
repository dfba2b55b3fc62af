//! Error types for the simulation model.
//!
//! [`SimulationError`] covers construction of the board, bounds checks
//! inside the tick rule, and every way a persisted or remote snapshot can
//! fail to describe a board of the configured size.

/// Errors raised by the grid, the ants, and the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// The requested board has a zero (or unaddressable) dimension.
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimension {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A cell access fell outside the board.
    ///
    /// The tick rule clamps every move, so this only surfaces on a broken
    /// invariant and callers treat it as fatal.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Column that was accessed.
        x: usize,
        /// Row that was accessed.
        y: usize,
        /// Board width.
        width: usize,
        /// Board height.
        height: usize,
    },

    /// A snapshot grid does not have the expected number of rows or columns.
    #[error(
        "snapshot grid is {found_width}x{found_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        /// Configured width.
        expected_width: usize,
        /// Configured height.
        expected_height: usize,
        /// Length of the first offending row (or of the first row when the
        /// row count is wrong).
        found_width: usize,
        /// Number of rows in the snapshot.
        found_height: usize,
    },

    /// A heading token is not one of `N`, `E`, `S`, `O`.
    #[error("unknown heading token: {0:?}")]
    UnknownHeadingToken(String),

    /// A snapshot cell holds a value other than 0 or 1.
    #[error("cell ({x}, {y}) holds {value}, expected 0 or 1")]
    InvalidCell {
        /// Column of the bad cell.
        x: usize,
        /// Row of the bad cell.
        y: usize,
        /// The offending value.
        value: u8,
    },

    /// A snapshot places an ant outside the board.
    #[error("ant {id} at ({x}, {y}) is outside the grid")]
    AgentOutOfBounds {
        /// Ant identifier.
        id: u32,
        /// Recorded column.
        x: i64,
        /// Recorded row.
        y: i64,
    },

    /// Two ants in one snapshot share an identifier.
    #[error("duplicate ant id: {0}")]
    DuplicateAgentId(u32),
}

impl SimulationError {
    /// Whether a caller may recover by starting a fresh simulation.
    ///
    /// Everything that can come from persisted or remote data is
    /// recoverable. Bad construction arguments and bounds violations are not.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::InvalidDimension { .. } | Self::OutOfBounds { .. }
        )
    }
}
