//! Core data types shared by the board and the knowledge base.
//!
//! Cells are addressed as `(row, col)`. Flat storage uses row-major layout:
//! `cells[row * width + col]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A board position. Ordered row-first, so sorted sets read top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Pre-computed neighbor cache for all cells.
///
/// Stores the 8-directional neighbors (clipped to board bounds) for every
/// cell. Indexed by `row * width + col`.
#[derive(Debug, Clone)]
pub struct NeighborCache {
    pub height: usize,
    pub width: usize,
    /// Flat storage of all neighbors.
    data: Vec<Cell>,
    /// offsets[i] = start index in `data` for cell i.
    /// offsets[i+1] - offsets[i] = number of neighbors for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    /// Number of cells on a `height` x `width` board, or `None` when the
    /// cache for it (up to 8 neighbors per cell) cannot be addressed.
    pub fn checked_len(height: usize, width: usize) -> Option<usize> {
        let total = height.checked_mul(width)?;
        let bytes = total
            .checked_mul(8)?
            .checked_mul(std::mem::size_of::<Cell>())?;
        (bytes <= isize::MAX as usize).then_some(total)
    }

    /// Build the neighbor cache for a board of the given dimensions.
    ///
    /// Callers validate the dimensions with [`NeighborCache::checked_len`].
    pub fn new(height: usize, width: usize) -> Self {
        let total = height * width;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..height {
            for col in 0..width {
                offsets.push(data.len());
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = row as i64 + dr;
                        let nc = col as i64 + dc;
                        if nr >= 0 && nr < height as i64 && nc >= 0 && nc < width as i64 {
                            data.push(Cell::new(nr as usize, nc as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            height,
            width,
            data,
            offsets,
        }
    }

    #[inline(always)]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Number of cells on the board.
    pub fn len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Neighbors of `cell`; empty for cells outside the board.
    #[inline(always)]
    pub fn get(&self, cell: Cell) -> &[Cell] {
        if !self.contains(cell) {
            return &[];
        }
        let idx = cell.row * self.width + cell.col;
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// All board cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Cell::new(row, col)))
    }
}
