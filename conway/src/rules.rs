// rules.rs - Conway's B3/S23 rule over a toroidal grid

use crate::grid::{ChangedCell, Grid};

/// Moore neighborhood as (row, col) offsets.
#[rustfmt::skip]
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Counting stops here; the rule treats every count above 3 the same.
pub const EARLY_EXIT_COUNT: u8 = 4;

/// Result of advancing one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub grid: Grid,
    pub changed: Vec<ChangedCell>,
}

/// Live neighbors of `(row, col)`, saturating at [`EARLY_EXIT_COUNT`].
pub fn count_live_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let (row, col) = (row as i64, col as i64);
    let mut count = 0;
    for &(dr, dc) in &NEIGHBOR_OFFSETS {
        if grid.get(row + dr, col + dc) {
            count += 1;
            if count >= EARLY_EXIT_COUNT {
                return count;
            }
        }
    }
    count
}

/// Exact neighbor count, without the early exit.
pub fn count_live_neighbors_exact(grid: &Grid, row: usize, col: usize) -> u8 {
    let (row, col) = (row as i64, col as i64);
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|&&(dr, dc)| grid.get(row + dr, col + dc))
        .count() as u8
}

/// Next state of a cell given its current state and live neighbor count.
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    match (alive, neighbors) {
        (_, 3) => true,      // Birth or survival
        (alive, 2) => alive, // Unchanged
        _ => false,          // Under- or overpopulation
    }
}

/// Next state of one row plus the columns that changed in it.
pub fn step_row(grid: &Grid, row: usize) -> (Vec<bool>, Vec<ChangedCell>) {
    let current = grid.row(row);
    let mut next = Vec::with_capacity(grid.cols());
    let mut changed = Vec::new();
    for (col, &alive) in current.iter().enumerate() {
        let state = next_state(alive, count_live_neighbors(grid, row, col));
        if state != alive {
            changed.push(ChangedCell::new(row, col));
        }
        next.push(state);
    }
    (next, changed)
}

/// Advance `grid` one generation.
pub fn step(grid: &Grid) -> Step {
    let mut next = grid.clone();
    let mut changed = Vec::new();
    for row in 0..grid.rows() {
        let (row_cells, row_changed) = step_row(grid, row);
        next.row_mut(row).copy_from_slice(&row_cells);
        changed.extend(row_changed);
    }
    Step { grid: next, changed }
}
