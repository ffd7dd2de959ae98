// history.rs - Repeat detection over recent generations

use std::collections::VecDeque;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::grid::Grid;

/// How many past generations are remembered.
pub const HISTORY_LEN: usize = 10;

/// Remembers fingerprints of the last [`HISTORY_LEN`] generations and
/// reports when a new one repeats any of them (still lifes, oscillators
/// with a short period, or a fully dead grid).
#[derive(Debug, Default, Clone)]
pub struct CycleDetector {
    recent: VecDeque<u64>,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `grid`; returns true if it matches a remembered generation.
    pub fn observe(&mut self, grid: &Grid) -> bool {
        let fingerprint = fingerprint(grid);
        if self.recent.contains(&fingerprint) {
            return true;
        }
        if self.recent.len() == HISTORY_LEN {
            self.recent.pop_front();
        }
        self.recent.push_back(fingerprint);
        false
    }

    pub fn reset(&mut self) {
        self.recent.clear();
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}

fn fingerprint(grid: &Grid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::advance_one_tick;

    #[test]
    fn still_life_repeats_on_second_observation() {
        let block = Grid::with_alive(4, 4, [(1, 1), (1, 2), (2, 1), (2, 2)]).unwrap();
        let mut detector = CycleDetector::new();
        assert!(!detector.observe(&block));
        assert!(detector.observe(&advance_one_tick(&block)));
    }

    #[test]
    fn blinker_repeats_after_two_ticks() {
        let mut current = Grid::with_alive(5, 5, [(2, 1), (2, 2), (2, 3)]).unwrap();
        let mut detector = CycleDetector::new();
        assert!(!detector.observe(&current));
        current = advance_one_tick(&current);
        assert!(!detector.observe(&current));
        current = advance_one_tick(&current);
        assert!(detector.observe(&current));
    }

    #[test]
    fn history_is_bounded() {
        let mut detector = CycleDetector::new();
        let first = Grid::with_alive(1, 16, [(0, 0)]).unwrap();
        detector.observe(&first);
        for col in 1..=HISTORY_LEN {
            let grid = Grid::with_alive(1, 16, [(0, col)]).unwrap();
            assert!(!detector.observe(&grid));
        }
        assert_eq!(detector.len(), HISTORY_LEN);
        // the oldest generation has been forgotten
        assert!(!detector.observe(&first));
    }

    #[test]
    fn reset_forgets_everything() {
        let grid = Grid::new(3, 3).unwrap();
        let mut detector = CycleDetector::new();
        detector.observe(&grid);
        detector.reset();
        assert!(detector.is_empty());
        assert!(!detector.observe(&grid));
    }
}
