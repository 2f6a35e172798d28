// config.rs - Simulation settings, loadable from JSON

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::Palette;

/// What a tick does when the grid has no live cells left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtinctionPolicy {
    /// Stop the loop.
    #[default]
    Halt,
    /// Keep stepping the empty grid and counting generations.
    KeepTicking,
}

/// Which implementation of the rule computes each generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    #[default]
    Serial,
    /// One tokio task per row.
    Coroutine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rows: usize,
    pub cols: usize,
    /// Generations per second.
    pub tick_rate: f64,
    /// Side of one cell in pixels.
    pub cell_size: usize,
    /// Empty margin added around a loaded pattern's live cells.
    pub padding: i64,
    pub extinction: ExtinctionPolicy,
    /// Number of past generations checked for repeats; 0 disables.
    pub cycle_window: usize,
    pub engine: Engine,
    pub palette: Palette,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 150,
            cols: 200,
            tick_rate: 50.0,
            cell_size: 4,
            padding: 5,
            extinction: ExtinctionPolicy::default(),
            cycle_window: 0,
            engine: Engine::default(),
            palette: Palette::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifeError;
    use crate::render::Color;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SimulationConfig::from_json("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.tick_rate, 50.0);
        assert_eq!(config.padding, 5);
        assert_eq!(config.extinction, ExtinctionPolicy::Halt);
    }

    #[test]
    fn fields_override_defaults() {
        let config = SimulationConfig::from_json(
            r#"{
                "rows": 20,
                "tick_rate": 12.5,
                "extinction": "keep_ticking",
                "engine": "coroutine",
                "cycle_window": 8,
                "palette": { "live": [0, 0, 0, 255], "dead": [255, 255, 255, 255] }
            }"#,
        )
        .unwrap();
        assert_eq!(config.rows, 20);
        assert_eq!(config.cols, 200);
        assert_eq!(config.tick_rate, 12.5);
        assert_eq!(config.extinction, ExtinctionPolicy::KeepTicking);
        assert_eq!(config.engine, Engine::Coroutine);
        assert_eq!(config.cycle_window, 8);
        assert_eq!(config.palette.live, Color::rgb(0, 0, 0));
    }

    #[test]
    fn json_round_trip() {
        let config = SimulationConfig { cell_size: 7, ..Default::default() };
        let text = config.to_json().unwrap();
        assert_eq!(SimulationConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SimulationConfig::from_json(r#"{ "engine": "gpu" }"#).unwrap_err();
        assert!(matches!(err, LifeError::Config(_)));
    }
}
