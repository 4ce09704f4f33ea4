//! Printing of the frames reported by a running generation.

use std::{io::Write, thread, time::Duration};

use anyhow::{Context, Error, Result};
use rule_pcg_rendering::TextRenderer;
use rule_pcg_system_generation::Round;

/// Writes each observed round to `out`, pausing between frames.
///
/// Observers cannot abort a run, so after the first write failure the
/// remaining rounds still run but nothing more is written. The failure is
/// returned by [`FramePrinter::finish`] once generation has returned.
pub(crate) struct FramePrinter<'a, W: Write> {
    out: W,
    renderer: &'a TextRenderer,
    delay: Duration,
    last_round: u32,
    error: Option<Error>,
}

impl<'a, W: Write> FramePrinter<'a, W> {
    /// Creates a printer that sleeps `delay` after every frame but the last
    /// of `last_round`.
    pub(crate) fn new(
        out: W,
        renderer: &'a TextRenderer,
        delay: Duration,
        last_round: u32,
    ) -> Self {
        Self {
            out,
            renderer,
            delay,
            last_round,
            error: None,
        }
    }

    /// Prints one round, unless an earlier write already failed.
    pub(crate) fn observe(&mut self, round: Round<'_>) {
        if self.error.is_some() {
            return;
        }
        let label = if round.index == 0 {
            "\nInitial map state:".to_owned()
        } else {
            format!("\n--- Iteration {} ---", round.index)
        };
        let written = writeln!(self.out, "{label}")
            .context("failed to write round label")
            .and_then(|()| self.renderer.write_to(round.grid, &mut self.out));
        if let Err(error) = written {
            self.error = Some(error);
            return;
        }
        if !self.delay.is_zero() && round.index < self.last_round {
            thread::sleep(self.delay);
        }
    }

    /// Returns the writer, or the first write failure.
    pub(crate) fn finish(self) -> Result<W> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rule_pcg_core::GenerationConfig;
    use rule_pcg_system_generation::generate;
    use std::io;

    /// Writer that rejects every write and counts the attempts.
    #[derive(Default)]
    struct BrokenPipe {
        attempts: usize,
    }

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn config(iterations: u32) -> GenerationConfig {
        GenerationConfig {
            iterations,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn every_round_is_labelled_and_drawn() {
        let renderer = TextRenderer::default();
        let mut printer = FramePrinter::new(Vec::new(), &renderer, Duration::ZERO, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let outcome = generate(&config(2), &mut rng, |round| printer.observe(round))
            .expect("valid config");
        let text = String::from_utf8(printer.finish().expect("writes succeed"))
            .expect("utf-8 output");

        assert!(text.contains("Initial map state:"));
        assert!(text.contains("--- Iteration 1 ---"));
        assert!(text.ends_with(&renderer.render(outcome.final_grid())));
        assert_eq!(text.matches("--- Current Map ---").count(), 3);
    }

    #[test]
    fn first_write_failure_stops_output_and_is_reported() {
        let renderer = TextRenderer::default();
        let mut printer =
            FramePrinter::new(BrokenPipe::default(), &renderer, Duration::ZERO, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let outcome = generate(&config(4), &mut rng, |round| printer.observe(round))
            .expect("valid config");

        assert_eq!(outcome.history().len(), 4, "generation still runs every round");
        assert_eq!(printer.out.attempts, 1, "no writes follow the first failure");
        let error = printer.finish().err().expect("failure is reported");
        assert!(format!("{error:#}").contains("failed to write round label"));
    }
}
