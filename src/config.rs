//! Game configuration, loadable from JSON or a JS object.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rng::MoveRng;
use crate::types::NeighborCache;

/// Board size, mine count and optional RNG seed for one game.
///
/// Missing fields fall back to the classic 8x8 board with 8 mines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    /// Seed for mine placement and random moves. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            height: 8,
            width: 8,
            mines: 8,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(Error::InvalidDimensions {
                height: self.height,
                width: self.width,
            });
        }
        let total = NeighborCache::checked_len(self.height, self.width).ok_or(
            Error::TooLarge {
                height: self.height,
                width: self.width,
            },
        )?;
        if self.mines > total {
            return Err(Error::TooManyMines {
                mines: self.mines,
                height: self.height,
                width: self.width,
            });
        }
        Ok(())
    }

    pub fn rng(&self) -> MoveRng {
        match self.seed {
            Some(seed) => MoveRng::from_seed(seed),
            None => MoveRng::new(),
        }
    }
}
