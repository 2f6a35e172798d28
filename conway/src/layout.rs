// layout.rs - Placing parsed patterns on a grid and cutting them back out

use crate::error::{LifeError, Result};
use crate::grid::Grid;
use crate::pattern::{ALIVE, DEAD, PatternBlock};

/// Extent of every live cell across all blocks, padded on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BoundingBox {
    /// Bounds of all live markers in `blocks`, grown by `padding`.
    ///
    /// A pattern with no live cells has no extent and yields
    /// [`LifeError::EmptyPattern`].
    pub fn of(blocks: &[PatternBlock], padding: i64) -> Result<Self> {
        let mut cells = blocks.iter().flat_map(PatternBlock::live_cells);
        let (x0, y0) = cells.next().ok_or(LifeError::EmptyPattern)?;
        let mut bounds = Self { min_x: x0, min_y: y0, max_x: x0, max_y: y0 };
        for (x, y) in cells {
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }
        Ok(bounds.padded(padding))
    }

    pub fn padded(self, padding: i64) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(padding),
            min_y: self.min_y.saturating_sub(padding),
            max_x: self.max_x.saturating_add(padding),
            max_y: self.max_y.saturating_add(padding),
        }
    }

    pub fn width(&self) -> i64 {
        self.max_x.saturating_sub(self.min_x).saturating_add(1)
    }

    pub fn height(&self) -> i64 {
        self.max_y.saturating_sub(self.min_y).saturating_add(1)
    }
}

/// Where a pattern's bounding box lands on the target grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Box centered in the grid.
    #[default]
    Centered,
    /// Top-left corner of the box at this grid cell.
    At { row: i64, col: i64 },
}

impl Placement {
    /// Translation from pattern coordinates to grid `(col, row)`.
    ///
    /// Saturates instead of wrapping; a saturated cell lands off the grid and
    /// is dropped.
    fn offset(self, bounds: &BoundingBox, rows: usize, cols: usize) -> (i64, i64) {
        match self {
            Placement::Centered => (
                (cols as i64).saturating_sub(bounds.width()).div_euclid(2).saturating_sub(bounds.min_x),
                (rows as i64).saturating_sub(bounds.height()).div_euclid(2).saturating_sub(bounds.min_y),
            ),
            Placement::At { row, col } => (col.saturating_sub(bounds.min_x), row.saturating_sub(bounds.min_y)),
        }
    }
}

/// Fresh `rows x cols` grid with the pattern centered in it.
pub fn stamp(blocks: &[PatternBlock], bounds: &BoundingBox, rows: usize, cols: usize) -> Result<Grid> {
    let mut grid = Grid::new(rows, cols)?;
    stamp_onto(blocks, bounds, &mut grid, Placement::Centered);
    Ok(grid)
}

/// Write the pattern's live cells into `grid`.
///
/// Cells that land outside the grid are dropped rather than wrapped; the
/// number dropped is returned.
pub fn stamp_onto(blocks: &[PatternBlock], bounds: &BoundingBox, grid: &mut Grid, placement: Placement) -> usize {
    let (dx, dy) = placement.offset(bounds, grid.rows(), grid.cols());
    let mut dropped = 0;
    for (x, y) in blocks.iter().flat_map(PatternBlock::live_cells) {
        let (col, row) = (x.saturating_add(dx), y.saturating_add(dy));
        if grid.contains(row, col) {
            grid.set(row as usize, col as usize, true);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::debug!("dropped {dropped} pattern cells outside {}x{} grid", grid.rows(), grid.cols());
    }
    dropped
}

/// Rectangle of grid cells, wrapping at the edges like every other read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub row: i64,
    pub col: i64,
    pub rows: usize,
    pub cols: usize,
}

impl Region {
    pub fn whole(grid: &Grid) -> Self {
        Self { row: 0, col: 0, rows: grid.rows(), cols: grid.cols() }
    }
}

/// Cut the live cells inside `region` out as one block.
///
/// The block is trimmed to the live cells and its origin is the trimmed
/// top-left corner in grid coordinates (`x` = column, `y` = row).
pub fn extract(grid: &Grid, region: Region) -> Result<PatternBlock> {
    let live: Vec<(i64, i64)> = (0..region.rows as i64)
        .flat_map(|r| (0..region.cols as i64).map(move |c| (region.row + r, region.col + c)))
        .filter(|&(r, c)| grid.get(r, c))
        .collect();

    let min_r = live.iter().map(|&(r, _)| r).min().ok_or(LifeError::EmptyPattern)?;
    let max_r = live.iter().map(|&(r, _)| r).max().ok_or(LifeError::EmptyPattern)?;
    let min_c = live.iter().map(|&(_, c)| c).min().ok_or(LifeError::EmptyPattern)?;
    let max_c = live.iter().map(|&(_, c)| c).max().ok_or(LifeError::EmptyPattern)?;

    let rows = (min_r..=max_r)
        .map(|r| {
            (min_c..=max_c)
                .map(|c| if grid.get(r, c) { ALIVE } else { DEAD })
                .collect::<String>()
        })
        .collect();

    Ok(PatternBlock { x: min_c, y: min_r, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parse;

    #[test]
    fn diagonal_box_without_padding() {
        let blocks = parse("#P 0 0\n*..\n.*.\n..*").unwrap();
        let bounds = BoundingBox::of(&blocks, 0).unwrap();
        assert_eq!(bounds, BoundingBox { min_x: 0, min_y: 0, max_x: 2, max_y: 2 });
        assert_eq!((bounds.width(), bounds.height()), (3, 3));
    }

    #[test]
    fn box_spans_blocks_and_padding() {
        let blocks = parse("#P -3 1\n*\n#P 4 -2\n..*").unwrap();
        let bounds = BoundingBox::of(&blocks, 5).unwrap();
        assert_eq!(bounds, BoundingBox { min_x: -8, min_y: -7, max_x: 11, max_y: 6 });
    }

    #[test]
    fn box_of_dead_pattern_is_an_error() {
        let blocks = parse("#P 0 0\n...\n.o.").unwrap();
        assert!(matches!(BoundingBox::of(&blocks, 5), Err(LifeError::EmptyPattern)));
        assert!(matches!(BoundingBox::of(&[], 0), Err(LifeError::EmptyPattern)));
    }

    #[test]
    fn stamp_centers_the_box() {
        let blocks = parse("#P -10 -10\n**\n**").unwrap();
        let bounds = BoundingBox::of(&blocks, 0).unwrap();
        let grid = stamp(&blocks, &bounds, 6, 8).unwrap();
        let cells: Vec<_> = grid.live_cells().collect();
        assert_eq!(cells, vec![(2, 3), (2, 4), (3, 3), (3, 4)]);
    }

    #[test]
    fn stamp_drops_cells_outside_grid() {
        let blocks = parse("#P 0 0\n*...*").unwrap();
        let bounds = BoundingBox::of(&blocks, 0).unwrap();
        // Width 5 centered in 3 columns: offset floor(-2 / 2) = -1.
        let mut grid = Grid::new(1, 3).unwrap();
        let dropped = stamp_onto(&blocks, &bounds, &mut grid, Placement::Centered);
        assert_eq!(dropped, 2);
        assert!(grid.is_empty());
    }

    #[test]
    fn stamp_at_explicit_corner() {
        let blocks = parse("#P 7 7\n.*\n*.").unwrap();
        let bounds = BoundingBox::of(&blocks, 1).unwrap();
        let mut grid = Grid::new(5, 5).unwrap();
        stamp_onto(&blocks, &bounds, &mut grid, Placement::At { row: 0, col: 0 });
        let cells: Vec<_> = grid.live_cells().collect();
        assert_eq!(cells, vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn stamp_rejects_bad_target() {
        let blocks = parse("#P 0 0\n*").unwrap();
        let bounds = BoundingBox::of(&blocks, 0).unwrap();
        assert!(matches!(stamp(&blocks, &bounds, 0, 4), Err(LifeError::InvalidDimensions { .. })));
    }

    #[test]
    fn extreme_coordinates_saturate_instead_of_wrapping() {
        let blocks = vec![
            PatternBlock { x: i64::MIN + 1, y: 0, rows: vec!["*".into()] },
            PatternBlock { x: i64::MAX - 1, y: 0, rows: vec!["**".into()] },
        ];
        let bounds = BoundingBox::of(&blocks, i64::MAX).unwrap();
        assert_eq!((bounds.min_x, bounds.max_x), (i64::MIN, i64::MAX));
        assert_eq!(bounds.width(), i64::MAX);

        let mut grid = Grid::new(4, 4).unwrap();
        let dropped = stamp_onto(&blocks, &bounds, &mut grid, Placement::Centered);
        assert_eq!(dropped, 3);
        assert!(grid.is_empty());
        let dropped = stamp_onto(&blocks, &bounds, &mut grid, Placement::At { row: i64::MAX, col: i64::MIN });
        assert_eq!(dropped, 3);
    }

    #[test]
    fn extract_trims_to_live_cells() {
        let mut grid = Grid::new(6, 6).unwrap();
        grid.set(1, 2, true);
        grid.set(3, 4, true);
        let block = extract(&grid, Region::whole(&grid)).unwrap();
        assert_eq!(block.x, 2);
        assert_eq!(block.y, 1);
        assert_eq!(block.rows, vec!["*..", "...", "..*"]);
    }

    #[test]
    fn extract_region_wraps() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set(3, 3, true);
        grid.set(0, 0, true);
        let block = extract(&grid, Region { row: 3, col: 3, rows: 2, cols: 2 }).unwrap();
        assert_eq!((block.x, block.y), (3, 3));
        assert_eq!(block.rows, vec!["*.", ".*"]);
    }

    #[test]
    fn extract_of_dead_region_is_an_error() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set(0, 0, true);
        let region = Region { row: 2, col: 2, rows: 2, cols: 2 };
        assert!(matches!(extract(&grid, region), Err(LifeError::EmptyPattern)));
    }
}
