#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text presentation of generated grids.
//!
//! Grids are drawn one character per cell and one line per row, framed by a
//! header and a footer line. The exact glyphs are cosmetic and configurable
//! through [`TextStyle`].

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use rule_pcg_core::Grid;
use serde::{Deserialize, Serialize};

/// Glyphs and frame lines used when drawing a grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Character drawn for occupied cells.
    pub occupied: char,
    /// Character drawn for empty cells.
    pub empty: char,
    /// Line printed above the grid.
    pub header: String,
    /// Line printed below the grid.
    pub footer: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            occupied: '#',
            empty: ' ',
            header: "--- Current Map ---".to_owned(),
            footer: "-------------------".to_owned(),
        }
    }
}

/// Renders grids as framed blocks of text.
#[derive(Clone, Debug, Default)]
pub struct TextRenderer {
    style: TextStyle,
}

impl TextRenderer {
    /// Creates a renderer using the provided style.
    #[must_use]
    pub fn new(style: TextStyle) -> Self {
        Self { style }
    }

    /// Style the renderer draws with.
    #[must_use]
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Draws the cells of `grid` without the frame, one line per row.
    #[must_use]
    pub fn cells(&self, grid: &Grid) -> String {
        let line_len = grid.width() as usize + 1;
        let mut text = String::with_capacity(line_len * grid.height() as usize);
        for row in grid.rows() {
            text.extend(row.iter().map(|occupied| self.glyph(*occupied)));
            text.push('\n');
        }
        text
    }

    /// Draws `grid` including the header and footer lines.
    #[must_use]
    pub fn render(&self, grid: &Grid) -> String {
        format!(
            "{}\n{}{}\n",
            self.style.header,
            self.cells(grid),
            self.style.footer
        )
    }

    /// Writes the framed drawing of `grid` to `out` and flushes it.
    pub fn write_to<W>(&self, grid: &Grid, out: &mut W) -> AnyResult<()>
    where
        W: Write + ?Sized,
    {
        out.write_all(self.render(grid).as_bytes())
            .context("failed to write rendered grid")?;
        out.flush().context("failed to flush rendered grid")?;
        Ok(())
    }

    fn glyph(&self, occupied: bool) -> char {
        if occupied {
            self.style.occupied
        } else {
            self.style.empty
        }
    }
}
