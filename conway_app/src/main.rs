// main.rs - Desktop front end for the toroidal Game of Life

use eframe::egui;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use conway::{Engine, Simulation, SimulationConfig};

mod sources;   // Pattern text providers
mod ui;        // eframe::App implementation and the texture screen

use sources::{Builtin, Directory, PatternSource};
use ui::Screen;

#[derive(Parser, Debug)]
#[command(name = "conway", about = "Conway's Game of Life on a torus")]
struct Args {
    /// JSON file with simulation settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of pattern files offered next to the built-in ones
    #[arg(long)]
    patterns_dir: Option<PathBuf>,

    /// Pattern to load at startup, by name
    #[arg(long)]
    pattern: Option<String>,

    /// Pin the grid height instead of fitting the window
    #[arg(long)]
    rows: Option<usize>,

    /// Pin the grid width instead of fitting the window
    #[arg(long)]
    cols: Option<usize>,

    /// Generations per second
    #[arg(long)]
    tick_rate: Option<f64>,

    #[arg(long, value_enum)]
    engine: Option<EngineArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EngineArg {
    Serial,
    Coroutine,
}

impl Args {
    fn simulation_config(&self) -> anyhow::Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                SimulationConfig::from_json(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(rate) = self.tick_rate {
            config.tick_rate = rate;
        }
        if let Some(engine) = self.engine {
            config.engine = match engine {
                EngineArg::Serial => Engine::Serial,
                EngineArg::Coroutine => Engine::Coroutine,
            };
        }
        Ok(config)
    }

    fn pattern_sources(&self) -> Vec<Box<dyn PatternSource>> {
        let mut sources: Vec<Box<dyn PatternSource>> = vec![Box::new(Builtin)];
        if let Some(dir) = &self.patterns_dir {
            sources.push(Box::new(Directory::new(dir)));
        }
        sources
    }
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match args.simulation_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("cannot load settings: {e:#}");
            std::process::exit(1);
        }
    };
    let fit_to_window = args.rows.is_none() && args.cols.is_none();

    let simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(e) => {
            log::error!("cannot start simulation: {e}");
            std::process::exit(1);
        }
    };

    let sources = args.pattern_sources();
    let startup_pattern = args.pattern.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |cc| {
            let mut app = LifeApp::new(cc.egui_ctx.clone(), simulation, sources, fit_to_window);
            app.pending_pattern = startup_pattern;
            Box::new(app)
        }),
    )
}

/// The window's state: the simulation plus everything the controls need.
pub struct LifeApp {
    pub sim: Simulation,
    pub screen: Screen,
    pub fit_to_window: bool,

    pub sources: Vec<Box<dyn PatternSource>>,
    pub selected_source: usize,
    pub pattern_names: Vec<String>,
    pub selected_pattern: Option<String>,
    pub loaded_pattern: Option<String>,
    pub show_patterns: bool,
    /// Loaded once the grid has its first size.
    pub pending_pattern: Option<String>,

    pub save_path: String,
    pub status: Option<String>,
}

impl LifeApp {
    pub fn new(
        ctx: egui::Context,
        sim: Simulation,
        sources: Vec<Box<dyn PatternSource>>,
        fit_to_window: bool,
    ) -> Self {
        Self {
            sim,
            screen: Screen::new(ctx),
            fit_to_window,
            sources,
            selected_source: 0,
            pattern_names: Vec::new(),
            selected_pattern: None,
            loaded_pattern: None,
            show_patterns: false,
            pending_pattern: None,
            save_path: "pattern.lif".to_string(),
            status: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        self.status = Some(message);
    }

    fn report(&mut self, context: &str, error: impl std::fmt::Display) {
        log::error!("{context}: {error}");
        self.status = Some(format!("{context}: {error}"));
    }

    /// Fill the picker with the names offered by the selected source.
    pub fn refresh_pattern_names(&mut self) {
        let Some(source) = self.sources.get(self.selected_source) else {
            return;
        };
        match source.names() {
            Ok(names) => self.pattern_names = names,
            Err(e) => {
                self.pattern_names.clear();
                self.report("Error fetching patterns", format!("{e:#}"));
            }
        }
    }

    pub fn open_pattern_picker(&mut self) {
        self.refresh_pattern_names();
        self.show_patterns = true;
    }

    pub fn load_selected_pattern(&mut self) {
        let Some(name) = self.selected_pattern.clone() else {
            self.set_status("Please select a pattern");
            return;
        };
        let Some(source) = self.sources.get(self.selected_source) else {
            return;
        };
        match source.fetch(&name) {
            Ok(text) => {
                if self.load_text(&name, &text) {
                    self.show_patterns = false;
                }
            }
            Err(e) => self.report("Error loading pattern", format!("{e:#}")),
        }
    }

    /// Load a pattern by name from the first source that has it.
    pub fn load_named(&mut self, name: &str) {
        let found = self.sources.iter().find_map(|source| source.fetch(name).ok());
        match found {
            Some(text) => {
                self.load_text(name, &text);
            }
            None => self.report("Error loading pattern", format!("{name:?} not found")),
        }
    }

    fn load_text(&mut self, name: &str, text: &str) -> bool {
        match self.sim.load_pattern(text) {
            Ok(dropped) => {
                self.loaded_pattern = Some(name.to_string());
                if dropped > 0 {
                    self.set_status(format!("Loaded {name}, {dropped} cells did not fit"));
                } else {
                    self.set_status(format!("Loaded {name}"));
                }
                true
            }
            Err(e) => {
                self.report(&format!("Error loading {name}"), e);
                false
            }
        }
    }

    pub fn save_pattern(&mut self) {
        let path = PathBuf::from(self.save_path.trim());
        let result = self
            .sim
            .save_pattern(None)
            .map_err(anyhow::Error::from)
            .and_then(|text| Ok(std::fs::write(&path, text)?));
        match result {
            Ok(()) => self.set_status(format!("Saved {}", path.display())),
            Err(e) => self.report("Error saving pattern", format!("{e:#}")),
        }
    }

    pub fn reset(&mut self) {
        self.sim.reset();
        self.selected_pattern = None;
        self.loaded_pattern = None;
        self.status = None;
    }
}
