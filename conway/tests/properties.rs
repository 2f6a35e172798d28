use conway::layout::{self, BoundingBox, Region};
use conway::pattern;
use conway::render::{Color, Palette, Present, Renderer, Surface};
use conway::rules::{self, count_live_neighbors, count_live_neighbors_exact, next_state};
use conway::Grid;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_grid(rng: &mut StdRng, rows: usize, cols: usize, density: f64) -> Grid {
    let mut grid = Grid::new(rows, cols).unwrap();
    for r in 0..rows {
        for c in 0..cols {
            if rng.random_bool(density) {
                grid.set(r, c, true);
            }
        }
    }
    grid
}

#[test]
fn step_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let rows = rng.random_range(1..30);
        let cols = rng.random_range(1..30);
        let grid = random_grid(&mut rng, rows, cols, 0.35);
        let a = rules::step(&grid);
        let b = rules::step(&grid);
        assert_eq!(a, b);
    }
}

#[test]
fn changed_cells_are_exactly_the_differences() {
    let mut rng = StdRng::seed_from_u64(11);
    let grid = random_grid(&mut rng, 17, 23, 0.4);
    let step = rules::step(&grid);
    let mut expected = Vec::new();
    for r in 0..17 {
        for c in 0..23 {
            if grid.at(r, c) != step.grid.at(r, c) {
                expected.push((r, c));
            }
        }
    }
    let got: Vec<_> = step.changed.iter().map(|c| (c.row, c.col)).collect();
    assert_eq!(got, expected);
}

#[test]
fn early_exit_never_changes_classification() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
        let grid = random_grid(&mut rng, 12, 12, 0.6);
        for r in 0..12 {
            for c in 0..12 {
                let fast = count_live_neighbors(&grid, r, c);
                let exact = count_live_neighbors_exact(&grid, r, c);
                assert_eq!(fast, exact.min(4));
                let alive = grid.at(r, c);
                assert_eq!(next_state(alive, fast), next_state(alive, exact));
            }
        }
    }
}

#[test]
fn tiny_grids_wrap_onto_themselves() {
    // On a 1x1 torus every neighbor is the cell itself.
    let mut grid = Grid::new(1, 1).unwrap();
    grid.set(0, 0, true);
    assert_eq!(count_live_neighbors_exact(&grid, 0, 0), 8);
    assert!(rules::step(&grid).grid.is_empty());
}

#[test]
fn stamp_then_extract_round_trips() {
    let text = "#Life 1.05\n#P -4 2\n.*\n..*\n#P -4 4\n***\n#P 9 -3\n**\n";
    let blocks = pattern::parse(text).unwrap();
    let padding = 3;
    let bounds = BoundingBox::of(&blocks, padding).unwrap();
    let grid = layout::stamp(&blocks, &bounds, bounds.height() as usize, bounds.width() as usize).unwrap();

    let mut original: Vec<(i64, i64)> = blocks
        .iter()
        .flat_map(|b| b.live_cells())
        .map(|(x, y)| (x - bounds.min_x, y - bounds.min_y))
        .collect();
    original.sort();
    let mut stamped: Vec<(i64, i64)> = grid.live_cells().map(|(r, c)| (c as i64, r as i64)).collect();
    stamped.sort();
    assert_eq!(stamped, original);

    // Every stamped cell sits at least `padding` cells from the border.
    for &(x, y) in &stamped {
        assert!(x >= padding && y >= padding);
        assert!(x < bounds.width() - padding && y < bounds.height() - padding);
    }

    // Saving the grid and reparsing gives the same relative layout.
    let saved = layout::extract(&grid, Region::whole(&grid)).unwrap();
    let reparsed = pattern::parse(&pattern::encode(&[saved])).unwrap();
    let mut again: Vec<_> = reparsed[0].live_cells().collect();
    again.sort();
    assert_eq!(again, stamped);
}

struct Counting {
    rects: usize,
    colors: Vec<Color>,
}

impl Surface for Counting {
    fn width(&self) -> usize {
        0
    }
    fn height(&self) -> usize {
        0
    }
    fn clear(&mut self) {
        self.rects = 0;
        self.colors.clear();
    }
    fn fill_rect(&mut self, _x: usize, _y: usize, _w: usize, _h: usize, color: Color) {
        self.rects += 1;
        self.colors.push(color);
    }
}

struct NoScreen;

impl Present<Counting> for NoScreen {
    fn present(&mut self, _offscreen: &Counting) {}
}

#[test]
fn resize_then_full_repaint_paints_every_cell_dead() {
    let palette = Palette::default();
    let renderer = Renderer::new(4, palette);
    let mut grid = Grid::new(3, 3).unwrap();
    grid.set(1, 1, true);

    for (rows, cols) in [(1, 1), (7, 3), (20, 31)] {
        grid = grid.resize(rows, cols).unwrap();
        let mut surface = Counting { rects: 99, colors: vec![palette.live] };
        renderer.paint(&mut surface, &mut NoScreen, &grid, &[]);
        assert_eq!(surface.rects, rows * cols);
        assert!(surface.colors.iter().all(|&c| c == palette.dead));
    }
}
