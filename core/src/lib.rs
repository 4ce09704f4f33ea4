#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the rule-based map generator.
//!
//! This crate defines the data model every system operates on. The
//! [`Grid`] is an immutable-by-convention occupancy field: systems read one
//! grid and hand back a fresh one of identical dimensions. Cells are
//! addressed by [`CellCoord`], walkers move along a [`Direction`], and every
//! tunable knob lives in the parameter types re-exported from [`params`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod grid;
pub mod params;

pub use grid::{Grid, Rows};
pub use params::{CarverParams, ConfigError, GenerationConfig, SmootherParams};

/// Canonical banner emitted when a generation run starts.
pub const WELCOME_BANNER: &str = "--- CELLULAR AUTOMATA AND DRUNK AGENT SIMULATION ---";

/// Canonical banner emitted once every generation round completed.
pub const FAREWELL_BANNER: &str = "--- Simulation Finished ---";

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighbouring coordinate one step along `direction`.
    ///
    /// Yields `None` when the step would leave the non-negative quadrant.
    /// The result is not checked against any grid bounds.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (row_delta, column_delta) = direction.delta();
        let row = self.row.checked_add_signed(row_delta)?;
        let column = self.column.checked_add_signed(column_delta)?;
        Some(CellCoord::new(column, row))
    }
}

/// Cardinal movement directions available to the walker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
}

impl Direction {
    /// Every direction in draw order: up, down, left, right.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Row and column offsets applied when stepping along the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::West => (0, -1),
            Self::East => (0, 1),
        }
    }

    /// Maps an index drawn from `0..4` onto [`Direction::ALL`].
    ///
    /// Indices wrap, so any `usize` resolves to a direction.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Reasons a grid could not be constructed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Either dimension was zero.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// A row did not match the length of the first row.
    #[error("row {row} has {found} cells but {expected} were expected")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length established by the first row.
        expected: usize,
        /// Length actually found.
        found: usize,
    },
    /// A row or column count does not fit the coordinate space.
    #[error("grid dimension {0} exceeds the supported coordinate range")]
    TooLarge(usize),
    /// An ASCII grid contained a character other than `#` or `.`.
    #[error("unexpected glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// Character that could not be interpreted.
        glyph: char,
        /// Zero-based row of the character.
        row: usize,
        /// Zero-based column of the character.
        column: usize,
    },
}
