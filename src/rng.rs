//! Randomness for a game: where the mines go and which cell to gamble on.
//!
//! Both draws come from one `SmallRng`, so a seeded game replays its mine
//! layout and every random move exactly. Unseeded games take their entropy
//! from the OS (`getrandom` on wasm32).

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::types::Cell;

#[derive(Debug, Clone)]
pub struct MoveRng {
    inner: SmallRng,
}

impl MoveRng {
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// A uniformly chosen cell of a `height` x `width` board.
    ///
    /// Both dimensions must be non-zero.
    pub fn cell(&mut self, height: usize, width: usize) -> Cell {
        Cell::new(
            self.inner.random_range(0..height),
            self.inner.random_range(0..width),
        )
    }

    /// Row-major indices of `mines` distinct cells out of `cells`, every
    /// layout equally likely.
    pub fn mine_indices(&mut self, cells: usize, mines: usize) -> Vec<usize> {
        index::sample(&mut self.inner, cells, mines).into_vec()
    }
}

impl Default for MoveRng {
    fn default() -> Self {
        Self::new()
    }
}
