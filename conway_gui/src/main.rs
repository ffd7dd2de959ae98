// main.rs - Desktop front end for the conway simulation
// Renders the grid and forwards clicks and button presses to `Simulation`.

use std::error::Error;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use eframe::egui;
use egui::Color32;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use conway::{LifeConfig, Simulation};

mod ui;

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    // Optional first argument: path to a TOML config file.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = LifeConfig::load_or_default(config_path.as_deref());

    let runtime = tokio::runtime::Runtime::new()?;
    let simulation = Simulation::new(&config, runtime.handle().clone())?;
    let app = LifeApp::new(simulation, runtime);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([880.0, 780.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(|_cc| Box::new(app)),
    )?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();
}

/// Window state. All simulation state lives in `simulation`; the rest is
/// purely visual.
pub struct LifeApp {
    // Dropped before `runtime` so the clock task is aborted first.
    pub simulation: Simulation,
    pub live_color: Color32,
    pub dead_color: Color32,
    pub selected_pattern: usize,
    pub random_seed: u64,
    _runtime: tokio::runtime::Runtime,
}

impl LifeApp {
    fn new(simulation: Simulation, runtime: tokio::runtime::Runtime) -> Self {
        let random_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            simulation,
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
            selected_pattern: 0,
            random_seed,
            _runtime: runtime,
        }
    }
}
