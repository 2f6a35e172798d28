// render.rs - Off-screen cell painting mirrored to a visible surface

use serde::{Deserialize, Serialize};

use crate::grid::{ChangedCell, Grid};

/// RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 255])
    }
}

/// Two-color scheme for live and dead cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub live: Color,
    pub dead: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            live: Color::rgb(0, 200, 0),
            dead: Color::rgb(40, 40, 40),
        }
    }
}

impl Palette {
    pub fn color(&self, alive: bool) -> Color {
        if alive { self.live } else { self.dead }
    }
}

/// Raster target with clear and filled-rectangle primitives.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn clear(&mut self);
    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Color);
}

/// Visible surface that receives a finished off-screen buffer in one copy.
pub trait Present<S: ?Sized> {
    fn present(&mut self, offscreen: &S);
}

/// In-memory RGBA8 surface, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        let i = (y * self.width + x) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[i..i + 4]);
        Color(rgba)
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Color) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for py in y.min(y_end)..y_end {
            let start = (py * self.width + x) * 4;
            let end = (py * self.width + x_end) * 4;
            if start >= end {
                continue;
            }
            for px in self.pixels[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&color.0);
            }
        }
    }
}

/// Paints grid cells as `cell_size`-pixel squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    pub cell_size: usize,
    pub palette: Palette,
}

impl Renderer {
    pub fn new(cell_size: usize, palette: Palette) -> Self {
        Self { cell_size: cell_size.max(1), palette }
    }

    /// Pixel `(width, height)` of a surface that holds a `rows x cols` grid.
    pub fn surface_size(&self, rows: usize, cols: usize) -> (usize, usize) {
        (cols * self.cell_size, rows * self.cell_size)
    }

    /// Grid `(rows, cols)` that fit in a viewport of the given pixel size.
    pub fn fit(&self, width_px: f32, height_px: f32) -> (usize, usize) {
        let cell = self.cell_size as f32;
        ((height_px / cell).floor().max(0.0) as usize, (width_px / cell).floor().max(0.0) as usize)
    }

    /// Cell under a pixel position relative to the surface origin.
    pub fn cell_at(&self, x: f32, y: f32, grid: &Grid) -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let cell = self.cell_size as f32;
        let (row, col) = ((y / cell).floor() as usize, (x / cell).floor() as usize);
        (row < grid.rows() && col < grid.cols()).then_some((row, col))
    }

    /// Bring `offscreen` up to date with `grid`, then present it.
    ///
    /// With no changed cells every cell is repainted from a cleared surface.
    /// Otherwise each changed cell is repainted together with its 3x3
    /// neighborhood, wrapping at the edges; overlapping neighborhoods just
    /// paint the same cell twice.
    pub fn paint<S, P>(&self, offscreen: &mut S, visible: &mut P, grid: &Grid, changed: &[ChangedCell])
    where
        S: Surface,
        P: Present<S> + ?Sized,
    {
        if changed.is_empty() {
            offscreen.clear();
            for row in 0..grid.rows() {
                for col in 0..grid.cols() {
                    self.paint_cell(offscreen, grid, row, col);
                }
            }
        } else {
            for cell in changed {
                for dr in -1..=1i64 {
                    for dc in -1..=1i64 {
                        let r = (cell.row as i64 + dr).rem_euclid(grid.rows() as i64) as usize;
                        let c = (cell.col as i64 + dc).rem_euclid(grid.cols() as i64) as usize;
                        self.paint_cell(offscreen, grid, r, c);
                    }
                }
            }
        }
        visible.present(offscreen);
    }

    fn paint_cell<S: Surface>(&self, surface: &mut S, grid: &Grid, row: usize, col: usize) {
        let size = self.cell_size;
        surface.fill_rect(col * size, row * size, size, size, self.palette.color(grid.at(row, col)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        clears: usize,
        rects: Vec<(usize, usize, Color)>,
    }

    impl Surface for Recording {
        fn width(&self) -> usize {
            usize::MAX
        }
        fn height(&self) -> usize {
            usize::MAX
        }
        fn clear(&mut self) {
            self.clears += 1;
        }
        fn fill_rect(&mut self, x: usize, y: usize, _w: usize, _h: usize, color: Color) {
            self.rects.push((x, y, color));
        }
    }

    #[derive(Default)]
    struct Blits(usize);

    impl<S> Present<S> for Blits {
        fn present(&mut self, _offscreen: &S) {
            self.0 += 1;
        }
    }

    #[test]
    fn full_repaint_covers_every_cell() {
        let renderer = Renderer::new(4, Palette::default());
        let grid = Grid::new(3, 5).unwrap();
        let mut surface = Recording::default();
        let mut blits = Blits::default();
        renderer.paint(&mut surface, &mut blits, &grid, &[]);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.rects.len(), 15);
        assert!(surface.rects.iter().all(|&(_, _, c)| c == renderer.palette.dead));
        assert_eq!(blits.0, 1);
    }

    #[test]
    fn incremental_repaint_covers_wrapped_neighborhood() {
        let renderer = Renderer::new(2, Palette::default());
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set(0, 0, true);
        let mut surface = Recording::default();
        let mut blits = Blits::default();
        renderer.paint(&mut surface, &mut blits, &grid, &[ChangedCell::new(0, 0)]);

        assert_eq!(surface.clears, 0);
        let mut origins: Vec<_> = surface.rects.iter().map(|&(x, y, _)| (x, y)).collect();
        origins.sort();
        // Columns and rows 3, 0 and 1, at 2 pixels per cell.
        assert_eq!(origins, vec![(0, 0), (0, 2), (0, 6), (2, 0), (2, 2), (2, 6), (6, 0), (6, 2), (6, 6)]);
        let live: Vec<_> = surface.rects.iter().filter(|r| r.2 == renderer.palette.live).collect();
        assert_eq!(live.len(), 1);
        assert_eq!((live[0].0, live[0].1), (0, 0));
        assert_eq!(blits.0, 1);
    }

    #[test]
    fn overlapping_neighborhoods_repaint_twice() {
        let renderer = Renderer::new(1, Palette::default());
        let grid = Grid::new(5, 5).unwrap();
        let mut surface = Recording::default();
        let changed = [ChangedCell::new(2, 1), ChangedCell::new(2, 2), ChangedCell::new(2, 1)];
        renderer.paint(&mut surface, &mut Blits::default(), &grid, &changed);
        assert_eq!(surface.rects.len(), 27);
    }

    #[test]
    fn pixel_buffer_fill_clips_to_bounds() {
        let mut buffer = PixelBuffer::new(4, 3);
        let red = Color::rgb(255, 0, 0);
        buffer.fill_rect(2, 1, 5, 5, red);
        assert_eq!(buffer.pixel(1, 1), Color::TRANSPARENT);
        assert_eq!(buffer.pixel(2, 1), red);
        assert_eq!(buffer.pixel(3, 2), red);
        buffer.fill_rect(9, 9, 2, 2, red);
        buffer.clear();
        assert!(buffer.as_rgba().iter().all(|&b| b == 0));
    }

    #[test]
    fn painted_buffer_matches_grid() {
        let renderer = Renderer::new(3, Palette::default());
        let mut grid = Grid::new(2, 3).unwrap();
        grid.set(1, 2, true);
        let (w, h) = renderer.surface_size(grid.rows(), grid.cols());
        let mut buffer = PixelBuffer::new(w, h);
        renderer.paint(&mut buffer, &mut Blits::default(), &grid, &[]);
        assert_eq!(buffer.pixel(7, 4), renderer.palette.live);
        assert_eq!(buffer.pixel(0, 0), renderer.palette.dead);
        assert_eq!(buffer.pixel(8, 5), renderer.palette.live);
        assert_eq!(buffer.pixel(5, 5), renderer.palette.dead);
    }

    #[test]
    fn pixel_to_cell_conversion() {
        let renderer = Renderer::new(4, Palette::default());
        let grid = Grid::new(10, 20).unwrap();
        assert_eq!(renderer.cell_at(0.0, 0.0, &grid), Some((0, 0)));
        assert_eq!(renderer.cell_at(7.9, 12.0, &grid), Some((3, 1)));
        assert_eq!(renderer.cell_at(80.0, 0.0, &grid), None);
        assert_eq!(renderer.cell_at(-1.0, 0.0, &grid), None);
        assert_eq!(renderer.fit(801.0, 399.0), (99, 200));
    }
}
