#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Drunk-agent carving system.
//!
//! A walker wanders the grid marking every cell it stands on. On each step
//! it may stamp a rectangular room around itself and may pick a new
//! heading; both chances grow every step they fail to fire and fall back to
//! their base values once they do. The walker never leaves the grid: a step
//! that would cross the edge is refused and the heading is redrawn instead.
//!
//! Randomness is always supplied by the caller so that runs can be replayed
//! from a seed.

use log::{debug, trace};
use rand::Rng;
use rule_pcg_core::{CarverParams, CellCoord, Direction, Grid};

/// Persistent state of the walker, threaded through successive carving calls.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkerState {
    position: CellCoord,
    direction: Direction,
    room_probability: f64,
    direction_change_probability: f64,
}

impl WalkerState {
    /// Creates a walker at `position` heading along `direction`.
    ///
    /// Both drifting probabilities start at the base values of `params`.
    #[must_use]
    pub fn new(position: CellCoord, direction: Direction, params: &CarverParams) -> Self {
        Self {
            position,
            direction,
            room_probability: params.prob_generate_room,
            direction_change_probability: params.prob_change_direction,
        }
    }

    /// Creates a walker at `position` with a uniformly drawn heading.
    #[must_use]
    pub fn with_random_direction<R>(position: CellCoord, params: &CarverParams, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(position, random_direction(rng), params)
    }

    /// Cell the walker currently stands on.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Heading used for the next step.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Current chance of stamping a room on the next step.
    ///
    /// Grows without bound while no room is stamped, so it may exceed 1.
    #[must_use]
    pub const fn room_probability(&self) -> f64 {
        self.room_probability
    }

    /// Current chance of picking a new heading on the next step.
    ///
    /// Grows without bound while the heading is kept, so it may exceed 1.
    #[must_use]
    pub const fn direction_change_probability(&self) -> f64 {
        self.direction_change_probability
    }
}

/// Summary of a single walker step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Whether the walker's cell was inside the grid and got marked.
    pub marked: bool,
    /// Whether a room was stamped around the walker.
    pub room_stamped: bool,
    /// Whether the heading was redrawn by the direction-change roll.
    pub direction_changed: bool,
    /// Whether the walker advanced; `false` means the edge blocked it.
    pub moved: bool,
}

/// Pure system that carves corridors and rooms with a random walker.
#[derive(Clone, Copy, Debug, Default)]
pub struct Carving {
    params: CarverParams,
}

impl Carving {
    /// Creates a carving system using the provided parameters.
    #[must_use]
    pub const fn new(params: CarverParams) -> Self {
        Self { params }
    }

    /// Parameters the system was configured with.
    #[must_use]
    pub const fn params(&self) -> &CarverParams {
        &self.params
    }

    /// Creates a walker at `position` whose probabilities match this system.
    #[must_use]
    pub fn spawn_walker<R>(&self, position: CellCoord, rng: &mut R) -> WalkerState
    where
        R: Rng + ?Sized,
    {
        WalkerState::with_random_direction(position, &self.params, rng)
    }

    /// Returns a carved copy of `grid`, advancing `walker` in place.
    ///
    /// Runs `segments_per_round` segments of `steps_per_segment` steps each.
    #[must_use]
    pub fn carve<R>(&self, grid: &Grid, walker: &mut WalkerState, rng: &mut R) -> Grid
    where
        R: Rng + ?Sized,
    {
        let mut next = grid.clone();
        let mut rooms = 0usize;
        let mut blocked = 0usize;

        for _ in 0..self.params.segments_per_round {
            for _ in 0..self.params.steps_per_segment {
                let report = self.step(&mut next, walker, rng);
                if report.room_stamped {
                    rooms += 1;
                }
                if !report.moved {
                    blocked += 1;
                }
            }
        }

        debug!(
            "carved {} rooms, {} blocked steps, walker at row {} column {}",
            rooms,
            blocked,
            walker.position.row(),
            walker.position.column()
        );
        next
    }

    /// Performs a single walker step directly on `grid`.
    ///
    /// Order: mark the current cell, roll for a room, roll for a new
    /// heading, then try to move. A blocked move keeps the position and
    /// redraws the heading without touching either probability.
    pub fn step<R>(&self, grid: &mut Grid, walker: &mut WalkerState, rng: &mut R) -> StepReport
    where
        R: Rng + ?Sized,
    {
        let mut report = StepReport {
            marked: grid.set(walker.position, true),
            ..StepReport::default()
        };

        if rng.gen::<f64>() < walker.room_probability {
            self.stamp_room(grid, walker.position);
            walker.room_probability = self.params.prob_generate_room;
            report.room_stamped = true;
            trace!(
                "room stamped at row {} column {}",
                walker.position.row(),
                walker.position.column()
            );
        } else {
            walker.room_probability += self.params.prob_increase_room;
        }

        if rng.gen::<f64>() < walker.direction_change_probability {
            walker.direction = random_direction(rng);
            walker.direction_change_probability = self.params.prob_change_direction;
            report.direction_changed = true;
            trace!("heading changed to {:?}", walker.direction);
        } else {
            walker.direction_change_probability += self.params.prob_increase_change;
        }

        match walker
            .position
            .step(walker.direction)
            .filter(|candidate| grid.contains(*candidate))
        {
            Some(candidate) => {
                walker.position = candidate;
                report.moved = true;
            }
            None => {
                walker.direction = random_direction(rng);
                trace!("edge reached, heading redrawn to {:?}", walker.direction);
            }
        }

        report
    }

    /// Marks the room rectangle centred on `center`, clipped to the grid.
    fn stamp_room(&self, grid: &mut Grid, center: CellCoord) {
        let Some((row_start, row_end)) =
            clip_inclusive(center.row(), self.params.room_size_x / 2, grid.height())
        else {
            return;
        };
        let Some((column_start, column_end)) =
            clip_inclusive(center.column(), self.params.room_size_y / 2, grid.width())
        else {
            return;
        };

        for row in row_start..=row_end {
            for column in column_start..=column_end {
                let _ = grid.set(CellCoord::new(column, row), true);
            }
        }
    }
}

/// Draws one of the four headings uniformly.
pub fn random_direction<R>(rng: &mut R) -> Direction
where
    R: Rng + ?Sized,
{
    Direction::from_index(rng.gen_range(0..Direction::ALL.len()))
}

/// Inclusive span `[center - half, center + half]` clipped to `0..limit`.
///
/// Returns `None` when the span lies entirely beyond the grid.
fn clip_inclusive(center: u32, half: u32, limit: u32) -> Option<(u32, u32)> {
    let start = center.saturating_sub(half);
    let end = center.saturating_add(half).min(limit.checked_sub(1)?);
    (start <= end).then_some((start, end))
}
