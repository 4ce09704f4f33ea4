//! Tuning parameters for every generation system and their validation rules.
//!
//! Parameters are plain data supplied by the caller. Validation rejects
//! out-of-domain values with a descriptive [`ConfigError`]; nothing is
//! clamped on the caller's behalf.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Reasons a parameter set was rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The smoothing occupancy threshold was outside `[0, 1]`.
    #[error("occupancy threshold must lie in [0, 1], got {value}")]
    ThresholdOutOfRange {
        /// Offending threshold.
        value: f64,
    },
    /// A base probability was outside `[0, 1]`.
    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange {
        /// Name of the offending option.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A probability increment was negative or not finite.
    #[error("{name} must be a finite, non-negative increment, got {value}")]
    InvalidIncrement {
        /// Name of the offending option.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The run was configured with zero generation rounds.
    #[error("number of iterations must be at least 1")]
    ZeroIterations,
    /// The grid was configured with a zero dimension.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Configured number of columns.
        width: u32,
        /// Configured number of rows.
        height: u32,
    },
    /// The initial walker position lies outside the configured grid.
    #[error("initial walker position (row {row}, column {column}) lies outside the {width}x{height} grid")]
    WalkerOutOfBounds {
        /// Configured row of the walker.
        row: u32,
        /// Configured column of the walker.
        column: u32,
        /// Configured number of columns.
        width: u32,
        /// Configured number of rows.
        height: u32,
    },
}

/// Parameters of the neighbourhood-density smoothing pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherParams {
    /// Radius R of the square neighbourhood; the window spans `2R + 1` cells per side.
    pub radius: u32,
    /// Fraction U of the window that must be occupied for a cell to become occupied.
    pub occupancy_threshold: f64,
}

impl Default for SmootherParams {
    fn default() -> Self {
        Self {
            radius: 1,
            occupancy_threshold: 0.5,
        }
    }
}

impl SmootherParams {
    /// Rejects thresholds outside `[0, 1]`, including NaN.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.occupancy_threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                value: self.occupancy_threshold,
            });
        }
        Ok(())
    }
}

/// Parameters of the drunk-agent carving pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarverParams {
    /// Number of independent walk segments J per carving call.
    pub segments_per_round: u32,
    /// Number of steps I per walk segment.
    pub steps_per_segment: u32,
    /// Row extent of stamped rooms; the room spans `room_size_x / 2` rows each way.
    pub room_size_x: u32,
    /// Column extent of stamped rooms; the room spans `room_size_y / 2` columns each way.
    pub room_size_y: u32,
    /// Base probability of stamping a room on a step.
    pub prob_generate_room: f64,
    /// Added to the room probability after every step without a room.
    pub prob_increase_room: f64,
    /// Base probability of picking a new direction on a step.
    pub prob_change_direction: f64,
    /// Added to the direction-change probability after every step without a change.
    pub prob_increase_change: f64,
}

impl Default for CarverParams {
    fn default() -> Self {
        Self {
            segments_per_round: 5,
            steps_per_segment: 10,
            room_size_x: 5,
            room_size_y: 3,
            prob_generate_room: 0.1,
            prob_increase_room: 0.05,
            prob_change_direction: 0.2,
            prob_increase_change: 0.03,
        }
    }
}

impl CarverParams {
    /// Rejects base probabilities outside `[0, 1]` and negative or non-finite increments.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("prob_generate_room", self.prob_generate_room)?;
        check_probability("prob_change_direction", self.prob_change_direction)?;
        check_increment("prob_increase_room", self.prob_increase_room)?;
        check_increment("prob_increase_change", self.prob_increase_change)?;
        Ok(())
    }
}

/// Complete description of a generation run.
///
/// `initial_walker_x` and `initial_walker_y` follow the row/column
/// convention: `x` selects the row and `y` the column. When either is left
/// unset the walker starts at the centre of the grid on that axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of grid columns.
    pub width: u32,
    /// Number of grid rows.
    pub height: u32,
    /// Number of smooth-then-carve rounds.
    pub iterations: u32,
    /// Row the walker starts on.
    pub initial_walker_x: Option<u32>,
    /// Column the walker starts on.
    pub initial_walker_y: Option<u32>,
    /// Probability that a cell of the initial noise grid is occupied.
    pub seed_fill_probability: f64,
    /// Smoothing pass parameters.
    pub smoother: SmootherParams,
    /// Carving pass parameters.
    pub carver: CarverParams,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 10,
            iterations: 5,
            initial_walker_x: None,
            initial_walker_y: None,
            seed_fill_probability: 0.5,
            smoother: SmootherParams::default(),
            carver: CarverParams::default(),
        }
    }
}

impl GenerationConfig {
    /// Cell the walker occupies before the first carving pass.
    #[must_use]
    pub fn initial_walker(&self) -> CellCoord {
        let row = self.initial_walker_x.unwrap_or(self.height / 2);
        let column = self.initial_walker_y.unwrap_or(self.width / 2);
        CellCoord::new(column, row)
    }

    /// Validates every parameter of the run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        check_probability("seed_fill_probability", self.seed_fill_probability)?;
        self.smoother.validate()?;
        self.carver.validate()?;

        let walker = self.initial_walker();
        if walker.row() >= self.height || walker.column() >= self.width {
            return Err(ConfigError::WalkerOutOfBounds {
                row: walker.row(),
                column: walker.column(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

fn check_increment(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidIncrement { name, value })
    }
}
