use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::grid::{Grid, Vector2i};

/// Placement failures.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum PlacementError {
    /// Every cell of the grid is excluded, so no free cell exists.
    #[error("grid exhausted: all {total_cells} cells are occupied")]
    GridExhausted { total_cells: usize },
}

/// Source of uniformly distributed grid cells.
pub trait RandomSource {
    /// Returns a uniformly random cell inside `grid`.
    fn uniform_cell(&mut self, grid: &Grid) -> Vector2i;
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Creates a deterministic source for tests and reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform_cell(&mut self, grid: &Grid) -> Vector2i {
        Vector2i::new(
            self.rng.gen_range(0..grid.width()),
            self.rng.gen_range(0..grid.height()),
        )
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn uniform_cell(&mut self, grid: &Grid) -> Vector2i {
        (**self).uniform_cell(grid)
    }
}

/// Picks random free cells by rejection sampling.
#[derive(Debug, Clone)]
pub struct Placement<S> {
    grid: Grid,
    source: S,
}

impl<S: RandomSource> Placement<S> {
    #[must_use]
    pub fn new(grid: Grid, source: S) -> Self {
        Self { grid, source }
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Returns a random in-bounds cell that is not in `excluded`.
    ///
    /// Samples until a free cell comes up, so the expected number of draws
    /// grows as the board fills. Fails with [`PlacementError::GridExhausted`]
    /// instead of spinning when no free cell is left.
    pub fn choose(&mut self, excluded: &HashSet<Vector2i>) -> Result<Vector2i, PlacementError> {
        let blocked = excluded
            .iter()
            .filter(|cell| self.grid.contains(**cell))
            .count();
        if blocked >= self.grid.total_cells() {
            return Err(PlacementError::GridExhausted {
                total_cells: self.grid.total_cells(),
            });
        }

        loop {
            let candidate = self.source.uniform_cell(&self.grid);
            if !excluded.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }
}
