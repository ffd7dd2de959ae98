//! Conway's Game of Life on a fixed, bounded grid.
//!
//! [`Grid`] values are immutable generations, [`engine`] derives the next one,
//! and [`Simulation`] owns the current generation together with a [`Clock`]
//! that advances it on a tokio runtime.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod history;
pub mod patterns;
pub mod session;

pub use clock::{Clock, Ticker};
pub use config::LifeConfig;
pub use engine::{advance_one_tick, count_alive_neighbors, next_cell_state};
pub use error::{ConfigError, LifeError, Result};
pub use grid::{Coord, Grid};
pub use history::CycleDetector;
pub use patterns::{PATTERNS, Pattern};
pub use session::Simulation;
