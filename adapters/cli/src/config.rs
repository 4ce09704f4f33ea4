//! Resolution of the run configuration from a TOML file and command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use rule_pcg_core::GenerationConfig;
use rule_pcg_rendering::TextStyle;
use serde::Deserialize;

/// Procedurally generates a cave map with cellular automata and a drunk agent.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// TOML file supplying base parameters; flags override its values.
    #[arg(long)]
    pub(crate) config: Option<std::path::PathBuf>,

    /// Seed for the random generator; a random seed is drawn and logged when omitted.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Pause between printed frames in milliseconds; zero disables pacing.
    #[arg(long, default_value_t = 500)]
    pub(crate) delay_ms: u64,

    /// Print only the final grid.
    #[arg(long)]
    pub(crate) quiet: bool,

    #[command(flatten)]
    pub(crate) overrides: Overrides,
}

/// Per-option overrides applied on top of the base configuration.
#[derive(Debug, Default, clap::Args)]
pub(crate) struct Overrides {
    /// Number of grid columns.
    #[arg(long)]
    pub(crate) width: Option<u32>,
    /// Number of grid rows.
    #[arg(long)]
    pub(crate) height: Option<u32>,
    /// Smoothing neighbourhood radius R.
    #[arg(long)]
    pub(crate) radius: Option<u32>,
    /// Smoothing occupancy threshold U in [0, 1].
    #[arg(long)]
    pub(crate) occupancy_threshold: Option<f64>,
    /// Walk segments J per carving pass.
    #[arg(long)]
    pub(crate) segments_per_round: Option<u32>,
    /// Steps I per walk segment.
    #[arg(long)]
    pub(crate) steps_per_segment: Option<u32>,
    /// Row extent of stamped rooms.
    #[arg(long)]
    pub(crate) room_size_x: Option<u32>,
    /// Column extent of stamped rooms.
    #[arg(long)]
    pub(crate) room_size_y: Option<u32>,
    /// Base probability of stamping a room.
    #[arg(long)]
    pub(crate) prob_generate_room: Option<f64>,
    /// Room probability increase per step without a room.
    #[arg(long)]
    pub(crate) prob_increase_room: Option<f64>,
    /// Base probability of changing direction.
    #[arg(long)]
    pub(crate) prob_change_direction: Option<f64>,
    /// Direction-change probability increase per step without a change.
    #[arg(long)]
    pub(crate) prob_increase_change: Option<f64>,
    /// Number of smooth-then-carve rounds.
    #[arg(long)]
    pub(crate) iterations: Option<u32>,
    /// Row the walker starts on; defaults to the middle row.
    #[arg(long)]
    pub(crate) initial_walker_x: Option<u32>,
    /// Column the walker starts on; defaults to the middle column.
    #[arg(long)]
    pub(crate) initial_walker_y: Option<u32>,
    /// Probability that a cell of the initial noise grid is occupied.
    #[arg(long)]
    pub(crate) fill_probability: Option<f64>,
}

impl Overrides {
    /// Writes every provided override into `config`.
    pub(crate) fn apply(&self, config: &mut GenerationConfig) {
        fn set<T: Copy>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut config.width, self.width);
        set(&mut config.height, self.height);
        set(&mut config.iterations, self.iterations);
        set(&mut config.seed_fill_probability, self.fill_probability);
        set(&mut config.smoother.radius, self.radius);
        set(
            &mut config.smoother.occupancy_threshold,
            self.occupancy_threshold,
        );
        set(
            &mut config.carver.segments_per_round,
            self.segments_per_round,
        );
        set(&mut config.carver.steps_per_segment, self.steps_per_segment);
        set(&mut config.carver.room_size_x, self.room_size_x);
        set(&mut config.carver.room_size_y, self.room_size_y);
        set(
            &mut config.carver.prob_generate_room,
            self.prob_generate_room,
        );
        set(
            &mut config.carver.prob_increase_room,
            self.prob_increase_room,
        );
        set(
            &mut config.carver.prob_change_direction,
            self.prob_change_direction,
        );
        set(
            &mut config.carver.prob_increase_change,
            self.prob_increase_change,
        );
        if self.initial_walker_x.is_some() {
            config.initial_walker_x = self.initial_walker_x;
        }
        if self.initial_walker_y.is_some() {
            config.initial_walker_y = self.initial_walker_y;
        }
    }
}

/// Contents of a configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    /// Generation parameters.
    pub(crate) generation: GenerationConfig,
    /// Presentation of printed grids.
    pub(crate) style: TextStyle,
}

impl ConfigFile {
    /// Parses a configuration from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse configuration toml contents")
    }

    /// Loads a configuration file from disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid configuration in {}", path.display()))
    }
}

impl Args {
    /// Builds the validated configuration and style for this invocation.
    pub(crate) fn resolve(&self) -> Result<ConfigFile> {
        let mut file = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        self.overrides.apply(&mut file.generation);
        file.generation
            .validate()
            .context("invalid generation parameters")?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rule_pcg_core::CellCoord;

    fn parse_args(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("rule-pcg").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn defaults_match_reference_run() {
        let resolved = parse_args(&[]).resolve().expect("defaults are valid");
        assert_eq!(resolved.generation, GenerationConfig::default());
        assert_eq!(resolved.style, TextStyle::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse_args(&[
            "--width",
            "40",
            "--radius",
            "2",
            "--occupancy-threshold",
            "0.6",
            "--segments-per-round",
            "3",
            "--prob-increase-change",
            "0.1",
            "--initial-walker-x",
            "1",
            "--initial-walker-y",
            "2",
        ]);
        let resolved = args.resolve().expect("overrides are valid");
        let config = resolved.generation;

        assert_eq!(config.width, 40);
        assert_eq!(config.height, 10);
        assert_eq!(config.smoother.radius, 2);
        assert_eq!(config.smoother.occupancy_threshold, 0.6);
        assert_eq!(config.carver.segments_per_round, 3);
        assert_eq!(config.carver.prob_increase_change, 0.1);
        assert_eq!(config.initial_walker(), CellCoord::new(2, 1));
    }

    #[test]
    fn invalid_flags_are_rejected_with_context() {
        let args = parse_args(&["--occupancy-threshold", "1.5"]);
        let error = args.resolve().expect_err("threshold is out of range");
        assert!(format!("{error:#}").contains("occupancy threshold"));
    }

    #[test]
    fn negative_radius_does_not_parse() {
        let result = Args::try_parse_from(["rule-pcg", "--radius", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let file = ConfigFile::parse(
            r##"
            [generation]
            width = 64
            iterations = 3

            [generation.carver]
            room_size_x = 7

            [style]
            occupied = "@"
            "##,
        )
        .expect("valid toml");

        assert_eq!(file.generation.width, 64);
        assert_eq!(file.generation.height, 10);
        assert_eq!(file.generation.iterations, 3);
        assert_eq!(file.generation.carver.room_size_x, 7);
        assert_eq!(file.generation.carver.room_size_y, 3);
        assert_eq!(file.style.occupied, '@');
        assert_eq!(file.style.empty, ' ');
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(ConfigFile::parse("[render]\nfps = 3").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut file = ConfigFile::parse("[generation]\nwidth = 64\nheight = 32").expect("valid toml");
        let overrides = Overrides {
            height: Some(12),
            ..Overrides::default()
        };
        overrides.apply(&mut file.generation);
        assert_eq!(file.generation.width, 64);
        assert_eq!(file.generation.height, 12);
    }
}
