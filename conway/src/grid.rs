// grid.rs - Grid state for Conway's Game of Life

use std::fmt;

use crate::error::{LifeError, Result};

/// Default grid size (rows x columns).
pub const DEFAULT_HEIGHT: usize = 36;
pub const DEFAULT_WIDTH: usize = 54;

/// A `(row, col)` cell address.
///
/// Signed so neighbour probing can step past the top and left edges; any
/// coordinate is representable, only the grid decides whether it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: isize,
    pub col: isize,
}

impl Coord {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// Offset by `(d_row, d_col)`, `None` if that overflows.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(d_row)?,
            col: self.col.checked_add(d_col)?,
        })
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        // Saturate instead of wrapping so huge indices stay out of bounds.
        Self {
            row: isize::try_from(row).unwrap_or(isize::MAX),
            col: isize::try_from(col).unwrap_or(isize::MAX),
        }
    }
}

/// One generation: a fixed `height x width` matrix of alive/dead cells.
///
/// Grids are never mutated after construction. Every edit returns a new grid,
/// so a reader holding an older generation is never disturbed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// All-dead grid. Fails if either dimension is zero or the cells
    /// cannot be allocated.
    pub fn new(height: usize, width: usize) -> Result<Self> {
        let invalid = LifeError::InvalidDimension { height, width };
        if height == 0 || width == 0 {
            return Err(invalid);
        }
        let len = height.checked_mul(width).ok_or(invalid)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| invalid)?;
        cells.resize(len, false);
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Grid with exactly the listed cells alive.
    pub fn with_alive<I>(height: usize, width: usize, alive: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        Self::new(height, width)?.with_cells_alive(alive.into_iter().map(Coord::from))
    }

    /// Seeded random fill, roughly one cell in three alive.
    pub fn random(height: usize, width: usize, seed: u64) -> Result<Self> {
        Ok(Self::new(height, width)?.reseeded(seed))
    }

    /// All-dead grid of the same size.
    pub fn cleared(&self) -> Self {
        Self {
            height: self.height,
            width: self.width,
            cells: vec![false; self.cells.len()],
        }
    }

    /// Random grid of the same size, deterministic for a given seed.
    pub fn reseeded(&self, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let cells = (0..self.cells.len()).map(|_| rng.u8(..3) == 0).collect();
        Self {
            height: self.height,
            width: self.width,
            cells,
        }
    }

    /// Build a grid row by row, used by the engine to assemble a generation.
    pub(crate) fn from_rows<I>(height: usize, width: usize, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<bool>>,
    {
        let mut cells = Vec::with_capacity(height * width);
        for row in rows {
            debug_assert_eq!(row.len(), width);
            cells.extend(row);
        }
        debug_assert_eq!(cells.len(), height * width);
        Self {
            height,
            width,
            cells,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Lenient read: anything outside the grid counts as dead.
    pub fn get(&self, coord: Coord) -> bool {
        self.try_index(coord).is_some_and(|idx| self.cells[idx])
    }

    /// Strict read: fails for coordinates outside the grid.
    pub fn cell(&self, coord: Coord) -> Result<bool> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    /// Copy of this grid with the cell at `coord` flipped.
    pub fn toggled(&self, coord: Coord) -> Result<Self> {
        let idx = self.index(coord)?;
        let mut next = self.clone();
        next.cells[idx] = !next.cells[idx];
        Ok(next)
    }

    /// Copy of this grid with the listed cells set alive.
    pub fn with_cells_alive<I>(&self, alive: I) -> Result<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut next = self.clone();
        for coord in alive {
            let idx = next.index(coord)?;
            next.cells[idx] = true;
        }
        Ok(next)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks_exact(self.width)
    }

    pub fn live_cells(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.contains(&true)
    }

    fn try_index(&self, coord: Coord) -> Option<usize> {
        let row = usize::try_from(coord.row).ok()?;
        let col = usize::try_from(coord.col).ok()?;
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    fn index(&self, coord: Coord) -> Result<usize> {
        self.try_index(coord).ok_or(LifeError::OutOfBounds {
            row: coord.row,
            col: coord.col,
            height: self.height,
            width: self.width,
        })
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.height, self.width)?;
        for row in self.rows() {
            let line: String = row.iter().map(|&alive| if alive { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
