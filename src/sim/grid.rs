//! Tile grid storage
//!
//! The grid is a single flat buffer indexed by `row * cols + col`. An empty
//! cell is 0; every other cell is a power of two in `2..=MAX_TILE`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_TILE;
use crate::error::GridError;

/// A cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Returns true for values a non-empty cell may hold
#[inline]
pub fn is_valid_tile(value: u32) -> bool {
    (2..=MAX_TILE).contains(&value) && value.is_power_of_two()
}

/// Returns true if two tiles of `value` may combine
#[inline]
pub fn can_merge(value: u32) -> bool {
    value != 0 && value < MAX_TILE
}

/// Rectangular tile grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl Grid {
    /// Create an empty square grid
    pub fn new(size: usize) -> Self {
        Self::empty(size, size)
    }

    /// Create an empty `rows x cols` grid
    pub fn empty(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be positive");
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Build a grid from row slices, validating shape and tile values
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, GridError> {
        let expected = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != expected {
                return Err(GridError::Ragged {
                    row,
                    expected,
                    found: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }

        Self::from_cells(rows.len(), expected, cells)
    }

    /// Build a grid from a flat row-major buffer
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<u32>) -> Result<Self, GridError> {
        let grid = Self { rows, cols, cells };
        grid.validate()?;
        Ok(grid)
    }

    /// Check shape and tile invariants (used for grids that arrive from storage)
    pub fn validate(&self) -> Result<(), GridError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::Empty);
        }
        let expected = self.rows * self.cols;
        if self.cells.len() != expected {
            return Err(GridError::BufferSize {
                expected,
                found: self.cells.len(),
            });
        }
        for (i, &value) in self.cells.iter().enumerate() {
            if value != 0 && !is_valid_tile(value) {
                return Err(GridError::InvalidTile {
                    row: i / self.cols,
                    col: i % self.cols,
                    value,
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major view of every cell
    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        debug_assert!(pos.row < self.rows && pos.col < self.cols);
        pos.row * self.cols + pos.col
    }

    /// Value at `pos` (0 = empty)
    #[inline]
    pub fn get(&self, pos: Position) -> u32 {
        self.cells[self.index(pos)]
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: Position, value: u32) {
        let i = self.index(pos);
        self.cells[i] = value;
    }

    /// The neighbour of `pos` one step along `(dr, dc)`, or None at a wall
    #[inline]
    pub fn step(&self, pos: Position, dr: isize, dc: isize) -> Option<Position> {
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        (row < self.rows && col < self.cols).then_some(Position { row, col })
    }

    /// Coordinates of every empty cell, row-major
    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 0)
            .map(|(i, _)| Position::new(i / self.cols, i % self.cols))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Sum of all tile values
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// Largest tile on the board (0 if empty)
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// True if any horizontally or vertically adjacent cells hold equal
    /// mergeable values. Each pair is checked once via the forward offsets.
    pub fn has_adjacent_pair(&self) -> bool {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                let value = self.get(pos);
                if !can_merge(value) {
                    continue;
                }
                for (dr, dc) in [(0, 1), (1, 0)] {
                    if let Some(next) = self.step(pos, dr, dc) {
                        if self.get(next) == value {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Nested copy of the grid, one `Vec` per row
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.cols).map(<[u32]>::to_vec).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_tile().max(2).to_string().len();
        for row in self.cells.chunks(self.cols) {
            let line: Vec<String> = row
                .iter()
                .map(|&v| {
                    if v == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{v:>width$}")
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
