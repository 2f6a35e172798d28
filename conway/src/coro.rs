// coro.rs - Row coroutines: one tokio task per grid row
//
// Every task reads the same immutable grid and hands back an owned row, so the
// only writes happen in `step_concurrent` while it assembles the next grid.

use std::sync::Arc;

use crate::grid::{ChangedCell, Grid};
use crate::rules::{self, Step};

/// Compute one row's next states, yielding to the scheduler before returning.
async fn process_row(row_index: usize, current: Arc<Grid>) -> (usize, Vec<bool>, Vec<ChangedCell>) {
    let (row, changed) = rules::step_row(&current, row_index);
    tokio::task::yield_now().await;
    (row_index, row, changed)
}

/// Same result as [`rules::step`], computed by concurrently spawned row tasks.
pub async fn step_concurrent(current: Arc<Grid>) -> Step {
    let handles: Vec<_> = (0..current.rows())
        .map(|row| tokio::spawn(process_row(row, Arc::clone(&current))))
        .collect();

    let mut next = (*current).clone();
    let mut changed = Vec::new();
    for handle in handles {
        let (row_index, row, row_changed) = match handle.await {
            Ok(result) => result,
            // A row task only fails if it panicked; surface that panic here.
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        };
        next.row_mut(row_index).copy_from_slice(&row);
        changed.extend(row_changed);
    }
    Step { grid: next, changed }
}

/// Blocking wrapper used by the frame loop, mirroring the runtime the
/// simulation owns.
pub fn step_blocking(runtime: &tokio::runtime::Runtime, current: &Grid) -> Step {
    runtime.block_on(step_concurrent(Arc::new(current.clone())))
}
