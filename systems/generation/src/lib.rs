#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generation loop composing smoothing and carving into rounds.
//!
//! The loop owns the current [`Grid`] and the [`WalkerState`]. Every round
//! smooths the grid, carves the smoothed grid, and reports the result to an
//! observer before the next round starts. All randomness flows from the
//! single generator passed in by the caller.

use log::{debug, info};
use rand::Rng;
use rule_pcg_core::{
    CarverParams, CellCoord, ConfigError, GenerationConfig, Grid, GridError, SmootherParams,
};
use rule_pcg_system_carving::{Carving, WalkerState};
use rule_pcg_system_seeding::Seeding;
use rule_pcg_system_smoothing::Smoothing;
use thiserror::Error;

/// Failures that prevent a run from starting.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenerationError {
    /// A parameter was outside its domain.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The initial grid could not be built.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// State reported to observers after the initial grid and after every round.
#[derive(Clone, Copy, Debug)]
pub struct Round<'a> {
    /// Zero for the initial grid, then `1..=iterations`.
    pub index: u32,
    /// Grid at this point of the run.
    pub grid: &'a Grid,
    /// Walker state at this point of the run.
    pub walker: &'a WalkerState,
}

/// Result of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOutcome {
    history: Vec<Grid>,
    walker: WalkerState,
}

impl GenerationOutcome {
    /// Grid produced by the last round.
    #[must_use]
    pub fn final_grid(&self) -> &Grid {
        // Runs always have at least one round.
        &self.history[self.history.len() - 1]
    }

    /// Grids produced after each round, in order.
    #[must_use]
    pub fn history(&self) -> &[Grid] {
        &self.history
    }

    /// Walker state after the last round.
    #[must_use]
    pub fn walker(&self) -> &WalkerState {
        &self.walker
    }

    /// Consumes the outcome, yielding the final grid.
    #[must_use]
    pub fn into_final_grid(mut self) -> Grid {
        self.history.swap_remove(self.history.len() - 1)
    }
}

/// Sequential driver applying smoothing then carving for a fixed number of rounds.
#[derive(Clone, Copy, Debug)]
pub struct Generation {
    smoothing: Smoothing,
    carving: Carving,
    iterations: u32,
}

impl Generation {
    /// Creates a driver after validating every parameter.
    pub fn new(
        iterations: u32,
        smoother: SmootherParams,
        carver: CarverParams,
    ) -> Result<Self, ConfigError> {
        if iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        smoother.validate()?;
        carver.validate()?;
        Ok(Self {
            smoothing: Smoothing::new(smoother),
            carving: Carving::new(carver),
            iterations,
        })
    }

    /// Creates a driver from the loop-related parts of `config`.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, ConfigError> {
        Self::new(config.iterations, config.smoother, config.carver)
    }

    /// Number of rounds each run performs.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Runs every round starting from `initial` with the walker at `walker_start`.
    ///
    /// The walker's heading is drawn from `rng` before the first round. The
    /// observer sees the initial grid as round zero and then each finished
    /// round. Fails before any round when `walker_start` lies outside `initial`.
    pub fn run<R, F>(
        &self,
        initial: Grid,
        walker_start: CellCoord,
        rng: &mut R,
        mut observer: F,
    ) -> Result<GenerationOutcome, ConfigError>
    where
        R: Rng + ?Sized,
        F: FnMut(Round<'_>),
    {
        if !initial.contains(walker_start) {
            return Err(ConfigError::WalkerOutOfBounds {
                row: walker_start.row(),
                column: walker_start.column(),
                width: initial.width(),
                height: initial.height(),
            });
        }

        let mut walker = self.carving.spawn_walker(walker_start, rng);
        observer(Round {
            index: 0,
            grid: &initial,
            walker: &walker,
        });

        let capacity = usize::try_from(self.iterations).unwrap_or(0);
        let mut history = Vec::with_capacity(capacity);
        let mut grid = initial;

        for index in 1..=self.iterations {
            let smoothed = self.smoothing.smooth(&grid);
            grid = self.carving.carve(&smoothed, &mut walker, rng);
            debug!(
                "round {}/{}: {} of {} cells occupied",
                index,
                self.iterations,
                grid.occupied_count(),
                grid.len()
            );
            observer(Round {
                index,
                grid: &grid,
                walker: &walker,
            });
            history.push(grid.clone());
        }

        Ok(GenerationOutcome { history, walker })
    }
}

/// Seeds a noise grid from `config` and runs the full generation loop on it.
pub fn generate<R, F>(
    config: &GenerationConfig,
    rng: &mut R,
    observer: F,
) -> Result<GenerationOutcome, GenerationError>
where
    R: Rng + ?Sized,
    F: FnMut(Round<'_>),
{
    config.validate()?;
    let generation = Generation::from_config(config)?;
    info!(
        "generating {}x{} grid over {} rounds",
        config.width, config.height, config.iterations
    );

    let initial = Seeding::new(config.seed_fill_probability).seed(config.width, config.height, rng)?;
    let outcome = generation.run(initial, config.initial_walker(), rng, observer)?;
    Ok(outcome)
}
