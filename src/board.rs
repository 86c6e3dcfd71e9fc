//! The ground-truth board: mine placement and neighbour counts.
//!
//! The knowledge base never looks at this directly. A driver reveals cells
//! here and reports the resulting count via `KnowledgeBase::add_knowledge`.

use std::collections::BTreeSet;

use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::rng::MoveRng;
use crate::types::{Cell, NeighborCache};

#[derive(Debug, Clone)]
pub struct Board {
    /// Mine flags, row-major.
    cells: Vec<bool>,
    mine_count: usize,
    neighbors: NeighborCache,
}

impl Board {
    /// Place `config.mines` mines uniformly at random.
    pub fn random(config: &GameConfig, rng: &mut MoveRng) -> Result<Self> {
        config.validate()?;
        let neighbors = NeighborCache::new(config.height, config.width);
        let mut cells = vec![false; neighbors.len()];
        for idx in rng.mine_indices(cells.len(), config.mines) {
            cells[idx] = true;
        }

        Ok(Self {
            cells,
            mine_count: config.mines,
            neighbors,
        })
    }

    /// Build a board with mines at exactly the given cells.
    pub fn with_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::InvalidDimensions { height, width });
        }
        if NeighborCache::checked_len(height, width).is_none() {
            return Err(Error::TooLarge { height, width });
        }
        let neighbors = NeighborCache::new(height, width);
        let mut cells = vec![false; neighbors.len()];
        let mut mine_count = 0;
        for cell in mines {
            if !neighbors.contains(cell) {
                return Err(Error::OutOfBounds(cell));
            }
            let slot = &mut cells[cell.row * width + cell.col];
            if !*slot {
                *slot = true;
                mine_count += 1;
            }
        }

        Ok(Self {
            cells,
            mine_count,
            neighbors,
        })
    }

    pub fn height(&self) -> usize {
        self.neighbors.height
    }

    pub fn width(&self) -> usize {
        self.neighbors.width
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.neighbors.contains(cell)
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    /// Cells off the board are never mines.
    pub fn is_mine(&self, cell: Cell) -> bool {
        self.contains(cell) && self.cells[cell.row * self.width() + cell.col]
    }

    /// Number of mines within one row and column of `cell`, excluding itself.
    pub fn nearby_mines(&self, cell: Cell) -> u8 {
        self.neighbors
            .get(cell)
            .iter()
            .filter(|&&n| self.is_mine(n))
            .count() as u8
    }

    /// All mine cells in row-major order.
    pub fn mines(&self) -> impl Iterator<Item = Cell> + '_ {
        self.neighbors.cells().filter(move |&cell| self.is_mine(cell))
    }

    /// True when the flagged cells are exactly the mines.
    pub fn won(&self, flagged: &BTreeSet<Cell>) -> bool {
        flagged.len() == self.mine_count && flagged.iter().all(|&cell| self.is_mine(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(height: usize, width: usize, mines: usize, seed: u64) -> GameConfig {
        GameConfig {
            height,
            width,
            mines,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_random_mine_count() {
        let config = config(16, 30, 99, 42);
        let board = Board::random(&config, &mut config.rng()).unwrap();
        assert_eq!(board.mine_count(), 99);
        assert_eq!(board.mines().count(), 99);
    }

    #[test]
    fn test_random_full_board() {
        let config = config(3, 4, 12, 1);
        let board = Board::random(&config, &mut config.rng()).unwrap();
        assert!(board.mines().eq(NeighborCache::new(3, 4).cells()));
    }

    #[test]
    fn test_random_rejects_invalid_config() {
        let config = config(2, 2, 5, 1);
        assert!(matches!(
            Board::random(&config, &mut config.rng()),
            Err(Error::TooManyMines { .. })
        ));
    }

    #[test]
    fn test_nearby_mines_center() {
        let board = Board::with_mines(3, 3, [Cell::new(1, 1)]).unwrap();
        for cell in NeighborCache::new(3, 3).cells() {
            let expected = if cell == Cell::new(1, 1) { 0 } else { 1 };
            assert_eq!(board.nearby_mines(cell), expected, "at {}", cell);
        }
    }

    #[test]
    fn test_nearby_mines_corner() {
        let board = Board::with_mines(3, 3, [Cell::new(0, 0)]).unwrap();
        assert_eq!(board.nearby_mines(Cell::new(0, 1)), 1);
        assert_eq!(board.nearby_mines(Cell::new(1, 1)), 1);
        assert_eq!(board.nearby_mines(Cell::new(0, 2)), 0);
        assert_eq!(board.nearby_mines(Cell::new(2, 2)), 0);
    }

    #[test]
    fn test_with_mines_rejects_out_of_bounds() {
        assert_eq!(
            Board::with_mines(3, 3, [Cell::new(3, 0)]).unwrap_err(),
            Error::OutOfBounds(Cell::new(3, 0))
        );
        assert!(!Board::with_mines(3, 3, std::iter::empty()).unwrap().is_mine(Cell::new(9, 9)));
    }

    #[test]
    fn test_with_mines_rejects_oversized_board() {
        assert_eq!(
            Board::with_mines(usize::MAX, 3, std::iter::empty()).unwrap_err(),
            Error::TooLarge {
                height: usize::MAX,
                width: 3
            }
        );
        let config = config(usize::MAX, usize::MAX, 1, 1);
        assert!(matches!(
            Board::random(&config, &mut config.rng()),
            Err(Error::TooLarge { .. })
        ));
    }

    #[test]
    fn test_won_requires_exact_flags() {
        let board = Board::with_mines(3, 3, [Cell::new(0, 0), Cell::new(2, 2)]).unwrap();
        let mut flagged = BTreeSet::from([Cell::new(0, 0)]);
        assert!(!board.won(&flagged));
        flagged.insert(Cell::new(2, 2));
        assert!(board.won(&flagged));
        flagged.insert(Cell::new(1, 1));
        assert!(!board.won(&flagged));
    }
}
