#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure cellular-automata smoothing system.
//!
//! Each output cell is decided by the density of occupied cells in the
//! square window around it. Cells beyond the grid edge count as occupied,
//! which pulls the border toward walls. The pass reads exclusively from the
//! input grid, so the result does not depend on visiting order.

use rule_pcg_core::{CellCoord, Grid, SmootherParams};

/// Pure system applying neighbourhood-density smoothing to grids.
#[derive(Clone, Copy, Debug, Default)]
pub struct Smoothing {
    params: SmootherParams,
}

impl Smoothing {
    /// Creates a smoothing system using the provided parameters.
    #[must_use]
    pub const fn new(params: SmootherParams) -> Self {
        Self { params }
    }

    /// Parameters the system was configured with.
    #[must_use]
    pub const fn params(&self) -> SmootherParams {
        self.params
    }

    /// Produces the smoothed successor of `grid`.
    ///
    /// A cell becomes occupied when the occupied count of its window reaches
    /// `(2R + 1)² * U`; otherwise it becomes empty.
    #[must_use]
    pub fn smooth(&self, grid: &Grid) -> Grid {
        let radius = self.params.radius;
        let required = window_total(radius) as f64 * self.params.occupancy_threshold;
        let mut next = grid.clone();

        for row in 0..grid.height() {
            for column in 0..grid.width() {
                let cell = CellCoord::new(column, row);
                let count = neighborhood_count(grid, cell, radius);
                let _ = next.set(cell, count as f64 >= required);
            }
        }

        next
    }
}

/// Number of cells in a window of the provided radius.
///
/// Computed in `u128` so that every `u32` radius fits.
#[must_use]
pub fn window_total(radius: u32) -> u128 {
    let side = 2 * u128::from(radius) + 1;
    side * side
}

/// Counts occupied cells in the window of `radius` centred on `cell`.
///
/// Window positions outside the grid contribute one each.
#[must_use]
pub fn neighborhood_count(grid: &Grid, cell: CellCoord, radius: u32) -> u128 {
    let (row_start, row_end) = clip_span(cell.row(), radius, grid.height());
    let (column_start, column_end) = clip_span(cell.column(), radius, grid.width());

    let in_bounds_area =
        u128::from(row_end - row_start) * u128::from(column_end - column_start);
    let outside = window_total(radius) - in_bounds_area;

    let mut occupied = 0u128;
    for row in row_start..row_end {
        for column in column_start..column_end {
            if grid.is_occupied(CellCoord::new(column, row)) {
                occupied += 1;
            }
        }
    }

    occupied + outside
}

/// Half-open span `[center - radius, center + radius]` clipped to `0..limit`.
fn clip_span(center: u32, radius: u32, limit: u32) -> (u32, u32) {
    let start = center.saturating_sub(radius).min(limit);
    let end = center.saturating_add(radius).saturating_add(1).min(limit);
    (start, end.max(start))
}
