//! Error type shared by configuration, board construction and sessions.
//!
//! The reasoning core itself never fails: degenerate input is a no-op there.

use thiserror::Error;

use crate::types::Cell;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Boards need at least one row and one column.
    #[error("board dimensions must be at least 1x1, got {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },

    /// The board would not fit in memory-addressable storage.
    #[error("a {height}x{width} board is too large")]
    TooLarge { height: usize, width: usize },

    #[error("cannot place {mines} mines on a {height}x{width} board")]
    TooManyMines {
        mines: usize,
        height: usize,
        width: usize,
    },

    #[error("cell {0} lies outside the board")]
    OutOfBounds(Cell),

    #[error("cell {0} has already been revealed")]
    AlreadyRevealed(Cell),

    /// The session already ended in a win or a loss.
    #[error("the game is already over")]
    GameOver,
}

pub type Result<T> = std::result::Result<T, Error>;
