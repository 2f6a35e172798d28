// grid.rs - Toroidal cell grid for Conway's Game of Life

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::{LifeError, Result};

/// A cell position whose rendered value must be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangedCell {
    pub row: usize,
    pub col: usize,
}

impl ChangedCell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Fixed-size `rows x cols` grid of cells, stored row-major.
///
/// Reads through [`Grid::get`] wrap around both edges, so the grid behaves
/// like the surface of a torus. Writes through [`Grid::set`] index directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-dead grid. Both dimensions must be positive.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LifeError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        })
    }

    /// A fresh empty grid of the requested size. Old content is not kept.
    pub fn resize(&self, rows: usize, cols: usize) -> Result<Self> {
        Self::new(rows, cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell state with toroidal wraparound on both coordinates.
    pub fn get(&self, row: i64, col: i64) -> bool {
        let r = row.rem_euclid(self.rows as i64) as usize;
        let c = col.rem_euclid(self.cols as i64) as usize;
        self.cells[r * self.cols + c]
    }

    /// In-bounds read without wrapping.
    pub fn at(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)]
    }

    /// Direct write; the caller guarantees the coordinates are in bounds.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let index = self.index(row, col);
        self.cells[index] = alive;
    }

    /// Flip a cell. Returns the new state, or `None` if the position is
    /// outside the grid.
    pub fn toggle(&mut self, row: usize, col: usize) -> Option<bool> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let index = self.index(row, col);
        self.cells[index] = !self.cells[index];
        Some(self.cells[index])
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.contains(&true)
    }

    /// Positions of every live cell in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    pub fn row(&self, row: usize) -> &[bool] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [bool] {
        let start = row * self.cols;
        &mut self.cells[start..start + self.cols]
    }

    /// Hash of dimensions and contents, used to spot repeating generations.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.rows.hash(&mut hasher);
        self.cols.hash(&mut hasher);
        self.cells.hash(&mut hasher);
        hasher.finish()
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}
