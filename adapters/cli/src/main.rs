#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a generation and prints every round.

use std::{
    io::{self, Write},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rule_pcg_core::{FAREWELL_BANNER, WELCOME_BANNER};
use rule_pcg_rendering::TextRenderer;
use rule_pcg_system_generation::generate;

mod config;
mod frames;

use config::Args;
use frames::FramePrinter;

/// Entry point for the rule-pcg command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let resolved = args.resolve()?;
    let config = resolved.generation;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("using seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let renderer = TextRenderer::new(resolved.style);
    let delay = Duration::from_millis(args.delay_ms);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !args.quiet {
        writeln!(out, "{WELCOME_BANNER}").context("failed to write banner")?;
    }

    let mut printer = FramePrinter::new(out, &renderer, delay, config.iterations);
    let outcome = generate(&config, &mut rng, |round| {
        if !args.quiet {
            printer.observe(round);
        }
    })
    .context("generation failed")?;
    let mut out = printer.finish()?;

    if args.quiet {
        renderer.write_to(outcome.final_grid(), &mut out)?;
    } else {
        writeln!(out, "\n{FAREWELL_BANNER}").context("failed to write banner")?;
    }

    Ok(())
}
