use std::slice::ChunksExact;

use serde::{Deserialize, Serialize};

use crate::{CellCoord, GridError};

/// Iterator over the rows of a [`Grid`], top to bottom.
pub type Rows<'a> = ChunksExact<'a, bool>;

/// Fixed-size two-dimensional occupancy field.
///
/// Cells are stored row-major. Dimensions are fixed at construction and are
/// always positive; every row holds exactly `width` cells. Systems treat a
/// grid as a value: they clone the input, write into the clone, and return
/// it, so a grid handed to a transformation is never modified underneath the
/// caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates a grid in which every cell is empty.
    pub fn empty(width: u32, height: u32) -> Result<Self, GridError> {
        Self::uniform(width, height, false)
    }

    /// Creates a grid in which every cell is occupied.
    pub fn filled(width: u32, height: u32) -> Result<Self, GridError> {
        Self::uniform(width, height, true)
    }

    fn uniform(width: u32, height: u32, occupied: bool) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        let len = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| GridError::TooLarge(usize::MAX))?;
        Ok(Self {
            width,
            height,
            cells: vec![occupied; len],
        })
    }

    /// Builds a grid from an ordered sequence of rows.
    ///
    /// Fails when there are no rows, the rows are empty, or any row differs in
    /// length from the first one.
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, GridError>
    where
        R: AsRef<[bool]>,
    {
        let mut cells = Vec::new();
        let mut expected = None;
        let mut height = 0usize;

        for (index, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let expected = *expected.get_or_insert(row.len());
            if row.len() != expected {
                return Err(GridError::RaggedRow {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
            height += 1;
        }

        let width = expected.unwrap_or(0);
        let width_u32 = u32::try_from(width).map_err(|_| GridError::TooLarge(width))?;
        let height_u32 = u32::try_from(height).map_err(|_| GridError::TooLarge(height))?;
        if width_u32 == 0 || height_u32 == 0 {
            return Err(GridError::ZeroDimension {
                width: width_u32,
                height: height_u32,
            });
        }

        Ok(Self {
            width: width_u32,
            height: height_u32,
            cells,
        })
    }

    /// Parses a grid drawn with `#` for occupied and `.` for empty cells.
    ///
    /// Blank lines are skipped and surrounding whitespace on each line is
    /// ignored, so the layout can be indented inside string literals.
    pub fn from_ascii(text: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (row, line) in text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let parsed = line
                .chars()
                .enumerate()
                .map(|(column, glyph)| match glyph {
                    '#' => Ok(true),
                    '.' => Ok(false),
                    _ => Err(GridError::UnknownGlyph { glyph, row, column }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(parsed);
        }
        Self::from_rows(rows)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Returns the occupancy of the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<bool> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Reports whether the cell is occupied. Cells outside the grid are not.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.get(cell).unwrap_or(false)
    }

    /// Sets the occupancy of an in-bounds cell.
    ///
    /// Returns `false` and leaves the grid untouched when the cell is out of bounds.
    pub fn set(&mut self, cell: CellCoord, occupied: bool) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.cells[index] = occupied;
                true
            }
            None => false,
        }
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|occupied| **occupied).count()
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; grids have positive dimensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates the rows from top to bottom.
    #[must_use]
    pub fn rows(&self) -> Rows<'_> {
        self.cells.chunks_exact(self.width as usize)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl TryFrom<Vec<Vec<bool>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<bool>> {
    fn from(grid: Grid) -> Self {
        grid.rows().map(<[bool]>::to_vec).collect()
    }
}
