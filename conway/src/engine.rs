// engine.rs - Next-generation computation (B3/S23)
//
// Pure functions over a borrowed generation. The grid is bounded, not
// toroidal: neighbours past the edge are sampled as dead.

use crate::error::Result;
use crate::grid::{Coord, Grid};

/// Row/column offsets of the eight neighbours, centre excluded.
#[rustfmt::skip]
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

/// Number of live neighbours around `coord`, in `0..=8`.
///
/// Never fails: `coord` itself may lie anywhere, and neighbours outside the
/// grid contribute nothing.
pub fn count_alive_neighbors(grid: &Grid, coord: Coord) -> u8 {
    let mut count = 0;
    for &(d_row, d_col) in &NEIGHBOR_OFFSETS {
        if coord.offset(d_row, d_col).is_some_and(|n| grid.get(n)) {
            count += 1;
        }
    }
    count
}

/// State of the cell at `coord` in the next generation.
///
/// Unlike neighbour sampling, the target cell must exist.
pub fn next_cell_state(grid: &Grid, coord: Coord) -> Result<bool> {
    let alive = grid.cell(coord)?;
    Ok(apply_rule(alive, count_alive_neighbors(grid, coord)))
}

/// Derive the next generation. Every cell reads only `grid`, so evaluation
/// order is irrelevant and `grid` is left untouched.
pub fn advance_one_tick(grid: &Grid) -> Grid {
    let (height, width) = grid.dimensions();
    let rows = (0..height).map(|row| process_row(grid, row));
    Grid::from_rows(height, width, rows)
}

fn process_row(grid: &Grid, row: usize) -> Vec<bool> {
    (0..grid.width())
        .map(|col| {
            let coord = Coord::from((row, col));
            apply_rule(grid.get(coord), count_alive_neighbors(grid, coord))
        })
        .collect()
}

fn apply_rule(alive: bool, neighbors: u8) -> bool {
    match (alive, neighbors) {
        (true, 2) | (true, 3) => true, // survival
        (false, 3) => true,            // birth
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifeError;

    fn grid(height: usize, width: usize, alive: &[(usize, usize)]) -> Grid {
        Grid::with_alive(height, width, alive.iter().copied()).unwrap()
    }

    #[test]
    fn empty_grid_stays_empty() {
        for (h, w) in [(1, 1), (3, 7), (36, 54)] {
            let empty = Grid::new(h, w).unwrap();
            assert_eq!(advance_one_tick(&empty), empty);
        }
    }

    #[test]
    fn neighbor_counts_on_mixed_board() {
        let board = grid(
            5,
            10,
            &[(0, 1), (1, 1), (2, 1), (2, 2), (1, 3), (2, 7), (3, 7), (3, 8)],
        );
        assert_eq!(count_alive_neighbors(&board, Coord::new(2, 3)), 2);
        assert_eq!(count_alive_neighbors(&board, Coord::new(1, 1)), 3);
        assert_eq!(count_alive_neighbors(&board, Coord::new(4, 6)), 1);
        assert_eq!(count_alive_neighbors(&board, Coord::new(3, 8)), 2);
        assert_eq!(next_cell_state(&board, Coord::new(2, 3)), Ok(false));
        assert_eq!(next_cell_state(&board, Coord::new(1, 1)), Ok(true));
        assert_eq!(next_cell_state(&board, Coord::new(4, 6)), Ok(false));
    }

    #[test]
    #[rustfmt::skip]
    fn count_excludes_the_cell_itself() {
        let full = grid(3, 3, &[
            (0, 0), (0, 1), (0, 2),
            (1, 0), (1, 1), (1, 2),
            (2, 0), (2, 1), (2, 2),
        ]);
        assert_eq!(count_alive_neighbors(&full, Coord::new(1, 1)), 8);
        assert_eq!(count_alive_neighbors(&full, Coord::new(0, 0)), 3);

        let lone = grid(3, 3, &[(1, 1)]);
        assert_eq!(count_alive_neighbors(&lone, Coord::new(1, 1)), 0);
    }

    #[test]
    fn edges_are_not_wrapped() {
        let board = grid(3, 3, &[(0, 0), (2, 2)]);
        // a torus would see (0, 0) from (2, 2)
        assert_eq!(count_alive_neighbors(&board, Coord::new(2, 2)), 0);
        assert_eq!(count_alive_neighbors(&board, Coord::new(0, 2)), 0);
    }

    #[test]
    fn counting_never_fails_far_outside() {
        let board = grid(2, 2, &[(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(count_alive_neighbors(&board, Coord::new(-1, -1)), 1);
        assert_eq!(count_alive_neighbors(&board, Coord::new(2, 1)), 2);
        assert_eq!(count_alive_neighbors(&board, Coord::new(1_000, -1_000)), 0);
        assert_eq!(count_alive_neighbors(&board, Coord::new(isize::MIN, isize::MAX)), 0);
    }

    #[test]
    fn next_state_rejects_cells_outside() {
        let board = grid(4, 4, &[(0, 0)]);
        assert_eq!(
            next_cell_state(&board, Coord::new(4, 0)),
            Err(LifeError::OutOfBounds { row: 4, col: 0, height: 4, width: 4 })
        );
        assert!(next_cell_state(&board, Coord::new(-1, 2)).is_err());
    }

    #[test]
    fn lone_cell_dies() {
        let board = grid(5, 5, &[(2, 2)]);
        assert_eq!(next_cell_state(&board, Coord::new(2, 2)), Ok(false));
        assert!(advance_one_tick(&board).is_empty());
    }

    #[test]
    fn block_is_a_still_life() {
        let block = grid(6, 6, &[(2, 2), (2, 3), (3, 2), (3, 3)]);
        let mut current = block.clone();
        for _ in 0..3 {
            current = advance_one_tick(&current);
            assert_eq!(current, block);
        }
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let horizontal = grid(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let vertical = grid(5, 5, &[(1, 2), (2, 2), (3, 2)]);

        let once = advance_one_tick(&horizontal);
        assert_eq!(once, vertical);
        assert_eq!(advance_one_tick(&once), horizontal);
    }

    #[test]
    fn blinker_on_the_edge_is_clipped() {
        // vertical phase would need row -1, which does not exist
        let edge = grid(3, 5, &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(advance_one_tick(&edge), grid(3, 5, &[(0, 2), (1, 2)]));
    }

    #[test]
    fn advance_is_deterministic() {
        let seeded = Grid::random(24, 24, 42).unwrap();
        assert_eq!(advance_one_tick(&seeded), advance_one_tick(&seeded));
    }

    #[test]
    fn advance_agrees_with_next_cell_state() {
        let seeded = Grid::random(12, 17, 3).unwrap();
        let next = advance_one_tick(&seeded);
        for row in 0..12 {
            for col in 0..17 {
                let coord = Coord::from((row, col));
                assert_eq!(next.get(coord), next_cell_state(&seeded, coord).unwrap());
            }
        }
    }
}
