// session.rs - One simulation: the current generation plus its clock
//
// The current generation sits behind a single mutex shared with the clock
// task. Every tick or edit reads the snapshot, builds a new grid and swaps
// it in under the same lock, so ticks and toggles never interleave.

use std::num::NonZeroU64;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::clock::{Clock, Ticker};
use crate::config::LifeConfig;
use crate::engine;
use crate::error::Result;
use crate::grid::{Coord, Grid};
use crate::history::CycleDetector;
use crate::patterns::{self, Pattern};

struct World {
    current: Arc<Grid>,
    ticks_elapsed: u64,
    history: CycleDetector,
    cycle_detected: bool,
}

impl World {
    fn advance(&mut self) -> bool {
        let next = engine::advance_one_tick(&self.current);
        self.cycle_detected = self.history.observe(&next);
        self.current = Arc::new(next);
        self.ticks_elapsed += 1;
        tracing::debug!(
            tick = self.ticks_elapsed,
            live = self.current.live_cells(),
            "Advanced one generation"
        );
        self.cycle_detected
    }

    fn replace(&mut self, grid: Grid) {
        self.current = Arc::new(grid);
        self.history.reset();
        self.cycle_detected = false;
    }
}

struct Shared {
    world: Mutex<World>,
    stop_on_cycle: bool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, World> {
        // A panic mid-swap cannot leave a half-built grid behind, so a
        // poisoned lock still guards a consistent generation.
        self.world.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Ticker for Shared {
    fn tick(&self) -> Result<ControlFlow<()>> {
        let repeated = self.lock().advance();
        if repeated && self.stop_on_cycle {
            tracing::info!("Generation repeated, halting clock");
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }
}

/// A running Game of Life: the grid a presentation layer renders and edits,
/// and the clock that advances it.
pub struct Simulation {
    shared: Arc<Shared>,
    clock: Clock,
}

impl Simulation {
    /// All-dead grid sized from `config`; the clock starts stopped and is
    /// driven on `runtime`.
    pub fn new(config: &LifeConfig, runtime: Handle) -> Result<Self> {
        let grid = Grid::new(config.height, config.width)?;
        Ok(Self::from_grid(grid, config, runtime))
    }

    /// Start from an existing generation. Dimensions come from `grid`.
    pub fn from_grid(grid: Grid, config: &LifeConfig, runtime: Handle) -> Self {
        let world = World {
            current: Arc::new(grid),
            ticks_elapsed: 0,
            history: CycleDetector::new(),
            cycle_detected: false,
        };
        Self {
            shared: Arc::new(Shared {
                world: Mutex::new(world),
                stop_on_cycle: config.stop_on_cycle,
            }),
            clock: Clock::new(runtime, config.interval()),
        }
    }

    // Queries

    /// The current generation. Later ticks never modify it.
    pub fn snapshot(&self) -> Arc<Grid> {
        Arc::clone(&self.shared.lock().current)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.shared.lock().current.dimensions()
    }

    /// Lenient: cells outside the grid read as dead.
    pub fn cell(&self, coord: Coord) -> bool {
        self.shared.lock().current.get(coord)
    }

    pub fn live_cells(&self) -> usize {
        self.shared.lock().current.live_cells()
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.shared.lock().ticks_elapsed
    }

    /// Whether the latest tick produced a recently seen generation.
    pub fn cycle_detected(&self) -> bool {
        self.shared.lock().cycle_detected
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn interval(&self) -> Duration {
        self.clock.interval()
    }

    // Requests

    pub fn toggle(&self, coord: Coord) -> Result<()> {
        let mut world = self.shared.lock();
        let next = world.current.toggled(coord)?;
        world.replace(next);
        Ok(())
    }

    /// Advance exactly one generation by hand, leaving the clock alone.
    /// Returns the new tick count.
    pub fn step(&self) -> u64 {
        let mut world = self.shared.lock();
        world.advance();
        world.ticks_elapsed
    }

    pub fn start(&mut self) {
        let ticker: Arc<dyn Ticker> = self.shared.clone();
        self.clock.start(ticker);
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn toggle_clock(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn set_interval(&mut self, interval_ms: NonZeroU64) {
        self.clock.set_interval(Duration::from_millis(interval_ms.get()));
    }

    /// Kill every cell.
    pub fn clear(&self) {
        let mut world = self.shared.lock();
        let empty = world.current.cleared();
        world.replace(empty);
        tracing::info!("Grid cleared");
    }

    /// Replace the grid with `pattern` centred on an otherwise empty grid.
    /// Fails, leaving the grid as it was, if the pattern does not fit.
    pub fn apply_pattern(&self, pattern: &Pattern) -> Result<()> {
        let mut world = self.shared.lock();
        let empty = world.current.cleared();
        // Without a centred fit, placing at the corner reports the first cell
        // that falls outside.
        let origin = patterns::centered_origin(&empty, pattern).unwrap_or(Coord::new(0, 0));
        let placed = patterns::place(&empty, pattern, origin)?;
        world.replace(placed);
        tracing::info!(pattern = pattern.name, "Pattern applied");
        Ok(())
    }

    /// Seeded random fill of the whole grid.
    pub fn randomize(&self, seed: u64) {
        let mut world = self.shared.lock();
        let random = world.current.reseeded(seed);
        world.replace(random);
        tracing::info!(seed, "Grid randomized");
    }
}
