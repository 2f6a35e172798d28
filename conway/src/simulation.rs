// simulation.rs - The simulation context: grid, tick loop and render state in one owner

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::{Engine, ExtinctionPolicy, SimulationConfig};
use crate::coro;
use crate::error::Result;
use crate::grid::{ChangedCell, Grid};
use crate::layout::{self, BoundingBox, Placement, Region};
use crate::pattern::{self, PatternBlock};
use crate::render::{Palette, PixelBuffer, Present, Renderer};
use crate::rules::{self, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// No live cells were left.
    Extinct,
    /// The new generation repeats one seen within the cycle window.
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced { changed: usize },
    Halted(HaltReason),
}

/// Interval between ticks at `rate` ticks per second, if it can be scheduled.
pub fn tick_interval(rate: f64) -> Option<Duration> {
    if !(rate.is_finite() && rate > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / rate).ok()
}

/// Recurring timer driven by polling from the frame loop.
#[derive(Debug, Clone, Default)]
pub struct Ticker {
    interval: Option<Duration>,
    next_due: Option<Instant>,
}

impl Ticker {
    /// (Re)start the timer; the first tick is due one interval from `now`.
    pub fn arm(&mut self, interval: Duration, now: Instant) {
        self.interval = Some(interval);
        self.next_due = Some(now + interval);
    }

    pub fn disarm(&mut self) {
        self.interval = None;
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// True at most once per call when a tick is due. A timer that fell
    /// behind fires once and reschedules from `now` instead of bursting.
    pub fn poll(&mut self, now: Instant) -> bool {
        let (Some(interval), Some(due)) = (self.interval, self.next_due) else {
            return false;
        };
        if now < due {
            return false;
        }
        let next = due + interval;
        self.next_due = Some(if next <= now { now + interval } else { next });
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

/// Cells waiting to be repainted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Damage {
    #[default]
    Clean,
    Full,
    Cells(Vec<ChangedCell>),
}

impl Damage {
    /// Queue `cells`; more than `limit` pending cells collapse into a full repaint.
    fn add(&mut self, cells: Vec<ChangedCell>, limit: usize) {
        if cells.is_empty() {
            return;
        }
        match self {
            Damage::Clean => *self = Damage::Cells(cells),
            Damage::Full => return,
            Damage::Cells(pending) => pending.extend(cells),
        }
        if matches!(self, Damage::Cells(pending) if pending.len() > limit) {
            *self = Damage::Full;
        }
    }
}

/// Everything one running Game of Life owns.
///
/// All mutation goes through `&mut self`, so user actions and ticks are
/// serialized by whoever owns the value.
pub struct Simulation {
    config: SimulationConfig,
    grid: Grid,
    generation: u64,
    state: RunState,
    tick_rate: f64,
    ticker: Ticker,
    renderer: Renderer,
    offscreen: PixelBuffer,
    damage: Damage,
    history: VecDeque<u64>,
    runtime: Option<tokio::runtime::Runtime>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let grid = Grid::new(config.rows, config.cols)?;
        let renderer = Renderer::new(config.cell_size, config.palette);
        let (width, height) = renderer.surface_size(grid.rows(), grid.cols());
        let runtime = match config.engine {
            Engine::Serial => None,
            Engine::Coroutine => Some(tokio::runtime::Runtime::new()?),
        };
        log::info!(
            "simulation {}x{} at {} ticks/s, {:?} engine",
            grid.rows(),
            grid.cols(),
            config.tick_rate,
            config.engine
        );
        Ok(Self {
            tick_rate: config.tick_rate,
            grid,
            generation: 0,
            state: RunState::Idle,
            ticker: Ticker::default(),
            renderer,
            offscreen: PixelBuffer::new(width, height),
            damage: Damage::Full,
            history: VecDeque::new(),
            runtime,
            config,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn offscreen(&self) -> &PixelBuffer {
        &self.offscreen
    }

    /// Recolor cells; the whole grid is repainted on the next render.
    pub fn set_palette(&mut self, palette: Palette) {
        self.renderer.palette = palette;
        self.config.palette = palette;
        self.damage = Damage::Full;
    }

    pub fn set_extinction_policy(&mut self, policy: ExtinctionPolicy) {
        self.config.extinction = policy;
    }

    pub fn set_cycle_window(&mut self, window: usize) {
        self.config.cycle_window = window;
        while self.history.len() > window {
            self.history.pop_front();
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.state == RunState::Running {
            return;
        }
        self.state = RunState::Running;
        self.arm(now);
        log::info!("started at generation {}", self.generation);
    }

    /// Stop ticking. No tick fires after this returns.
    pub fn stop(&mut self) {
        self.ticker.disarm();
        if self.state == RunState::Running {
            self.state = RunState::Stopped;
            log::info!("stopped at generation {}", self.generation);
        }
    }

    /// Empty grid, generation 0, default tick rate, not running.
    pub fn reset(&mut self) {
        self.ticker.disarm();
        self.state = RunState::Idle;
        self.grid.clear();
        self.generation = 0;
        self.tick_rate = self.config.tick_rate;
        self.history.clear();
        self.damage = Damage::Full;
        log::info!("reset");
    }

    /// New rate applies from the next scheduling cycle.
    pub fn set_tick_rate(&mut self, rate: f64, now: Instant) {
        self.tick_rate = rate;
        if self.state == RunState::Running {
            self.arm(now);
        }
    }

    fn arm(&mut self, now: Instant) {
        match tick_interval(self.tick_rate) {
            Some(interval) => self.ticker.arm(interval, now),
            None => {
                log::warn!("tick rate {} cannot be scheduled, waiting for a positive rate", self.tick_rate);
                self.ticker.disarm();
            }
        }
    }

    /// Run a tick if one is due. Called from the frame loop.
    pub fn poll(&mut self, now: Instant) -> Option<TickOutcome> {
        if self.state != RunState::Running || !self.ticker.poll(now) {
            return None;
        }
        Some(self.tick())
    }

    /// Time until the next scheduled tick, if one is scheduled.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        match self.state {
            RunState::Running => self.ticker.time_until_due(now),
            _ => None,
        }
    }

    /// One scheduled generation, honoring the extinction and cycle rules.
    pub fn tick(&mut self) -> TickOutcome {
        if self.grid.is_empty() && self.config.extinction == ExtinctionPolicy::Halt {
            log::info!("no live cells at generation {}, halting", self.generation);
            self.stop();
            return TickOutcome::Halted(HaltReason::Extinct);
        }

        let changed = self.advance();

        if self.repeats_recent_generation() {
            log::info!("generation {} repeats an earlier state, halting", self.generation);
            self.stop();
            return TickOutcome::Halted(HaltReason::Cycle);
        }
        TickOutcome::Advanced { changed }
    }

    /// A single manual generation, whatever the run state.
    ///
    /// The extinction policy does not apply, but a repeated generation is
    /// reported as [`HaltReason::Cycle`] and stops a running loop.
    pub fn step_once(&mut self) -> TickOutcome {
        let changed = self.advance();
        if self.repeats_recent_generation() {
            log::info!("generation {} repeats an earlier state", self.generation);
            self.stop();
            return TickOutcome::Halted(HaltReason::Cycle);
        }
        TickOutcome::Advanced { changed }
    }

    fn advance(&mut self) -> usize {
        let Step { grid, changed } = match &self.runtime {
            Some(runtime) => coro::step_blocking(runtime, &self.grid),
            None => rules::step(&self.grid),
        };
        self.grid = grid;
        self.generation += 1;
        let count = changed.len();
        log::debug!("generation {}: {count} cells changed", self.generation);
        self.damage.add(changed, self.grid.rows() * self.grid.cols());
        count
    }

    fn repeats_recent_generation(&mut self) -> bool {
        let window = self.config.cycle_window;
        if window == 0 {
            return false;
        }
        let fingerprint = self.grid.fingerprint();
        if self.history.contains(&fingerprint) {
            return true;
        }
        if self.history.len() == window {
            self.history.pop_front();
        }
        self.history.push_back(fingerprint);
        false
    }

    /// Flip the cell under a click. Out-of-range positions are ignored.
    pub fn toggle(&mut self, row: usize, col: usize) -> Option<bool> {
        let alive = self.grid.toggle(row, col)?;
        self.damage.add(vec![ChangedCell::new(row, col)], self.grid.rows() * self.grid.cols());
        self.history.clear();
        Some(alive)
    }

    /// Replace the grid with a pattern parsed from text, centered.
    ///
    /// Returns the number of pattern cells that did not fit. A malformed or
    /// empty pattern leaves the grid untouched.
    pub fn load_pattern(&mut self, text: &str) -> Result<usize> {
        let blocks = pattern::parse(text)?;
        self.load_blocks(&blocks, Placement::Centered)
    }

    pub fn load_blocks(&mut self, blocks: &[PatternBlock], placement: Placement) -> Result<usize> {
        let bounds = BoundingBox::of(blocks, self.config.padding)?;
        let mut grid = Grid::new(self.grid.rows(), self.grid.cols())?;
        let dropped = layout::stamp_onto(blocks, &bounds, &mut grid, placement);
        log::info!(
            "loaded {} block(s), {}x{} with padding, {dropped} cell(s) dropped",
            blocks.len(),
            bounds.width(),
            bounds.height()
        );
        self.grid = grid;
        self.generation = 0;
        self.history.clear();
        self.damage = Damage::Full;
        Ok(dropped)
    }

    /// Pattern text for the live cells in `region`, or the whole grid.
    pub fn save_pattern(&self, region: Option<Region>) -> Result<String> {
        let region = region.unwrap_or_else(|| Region::whole(&self.grid));
        let block = layout::extract(&self.grid, region)?;
        Ok(pattern::encode(&[block]))
    }

    /// Swap in an empty grid and a matching off-screen buffer together.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        let grid = self.grid.resize(rows, cols)?;
        let (width, height) = self.renderer.surface_size(rows, cols);
        self.grid = grid;
        self.offscreen = PixelBuffer::new(width, height);
        self.history.clear();
        self.damage = Damage::Full;
        log::info!("resized to {rows}x{cols}");
        Ok(())
    }

    /// Resize to as many cells as fit in the viewport. Returns whether the
    /// dimensions changed.
    pub fn fit_to_viewport(&mut self, width_px: f32, height_px: f32) -> Result<bool> {
        let (rows, cols) = self.renderer.fit(width_px, height_px);
        if (rows, cols) == (self.grid.rows(), self.grid.cols()) {
            return Ok(false);
        }
        self.resize(rows, cols)?;
        Ok(true)
    }

    /// Cell under a pixel position relative to the grid's top-left corner.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        self.renderer.cell_at(x, y, &self.grid)
    }

    /// Paint pending changes and present them. Returns false if there was
    /// nothing to paint.
    pub fn render<P: Present<PixelBuffer> + ?Sized>(&mut self, visible: &mut P) -> bool {
        match std::mem::take(&mut self.damage) {
            Damage::Clean => false,
            Damage::Full => {
                self.renderer.paint(&mut self.offscreen, visible, &self.grid, &[]);
                true
            }
            Damage::Cells(cells) => {
                self.renderer.paint(&mut self.offscreen, visible, &self.grid, &cells);
                true
            }
        }
    }
}
