#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Noise system that produces the starting grid of a generation run.

use rand::Rng;
use rule_pcg_core::{CellCoord, Grid, GridError};

/// Fills fresh grids with independent random occupancy per cell.
#[derive(Clone, Copy, Debug)]
pub struct Seeding {
    fill_probability: f64,
}

impl Default for Seeding {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Seeding {
    /// Creates a seeding system occupying each cell with `fill_probability`.
    ///
    /// Values are not validated here; `GenerationConfig::validate` checks the
    /// configured probability. Anything at or below zero yields an empty grid
    /// and anything at or above one a full grid.
    #[must_use]
    pub const fn new(fill_probability: f64) -> Self {
        Self { fill_probability }
    }

    /// Chance that any single cell starts occupied.
    #[must_use]
    pub const fn fill_probability(&self) -> f64 {
        self.fill_probability
    }

    /// Produces a `width` by `height` grid of random noise.
    pub fn seed<R>(&self, width: u32, height: u32, rng: &mut R) -> Result<Grid, GridError>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Grid::empty(width, height)?;
        for row in 0..height {
            for column in 0..width {
                if rng.gen::<f64>() < self.fill_probability {
                    let _ = grid.set(CellCoord::new(column, row), true);
                }
            }
        }
        Ok(grid)
    }
}
