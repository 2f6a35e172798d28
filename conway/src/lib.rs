// lib.rs - Conway's Game of Life on a torus: grid, rules, pattern files, rendering and the tick loop

pub mod config;
pub mod coro;
pub mod error;
pub mod grid;
pub mod layout;
pub mod pattern;
pub mod patterns;
pub mod render;
pub mod rules;
pub mod simulation;

pub use config::{Engine, ExtinctionPolicy, SimulationConfig};
pub use error::{LifeError, Result};
pub use grid::{ChangedCell, Grid};
pub use layout::{BoundingBox, Placement, Region};
pub use pattern::PatternBlock;
pub use render::{Color, Palette, PixelBuffer, Present, Renderer, Surface};
pub use rules::Step;
pub use simulation::{HaltReason, RunState, Simulation, TickOutcome};
