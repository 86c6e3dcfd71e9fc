//! A single logical constraint: exactly `count` of `cells` are mines.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::types::Cell;

/// Where a sentence stands relative to its own cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceState {
    /// Some but not all cells are mines.
    Unresolved,
    /// `count == 0` over a non-empty set.
    AllSafe,
    /// `count == |cells|` over a non-empty set.
    AllMine,
    /// No cells left and nothing owed.
    Empty,
    /// `count` outside `0..=|cells|`.
    Contradictory,
}

/// Cells live in an ordered set, so equal sentences hash and compare equal
/// regardless of the order their cells were learnt in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: i32,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: i32) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn state(&self) -> SentenceState {
        let len = self.cells.len() as i32;
        if self.count < 0 || self.count > len {
            SentenceState::Contradictory
        } else if len == 0 {
            SentenceState::Empty
        } else if self.count == 0 {
            SentenceState::AllSafe
        } else if self.count == len {
            SentenceState::AllMine
        } else {
            SentenceState::Unresolved
        }
    }

    /// Every cell, when every cell must be a mine.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count == self.cells.len() as i32 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Every cell, when no mines are left among them.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Drops a known mine and the mine it accounted for.
    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            self.count -= 1;
        }
    }

    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    /// If `self` is a strict subset of `other`, the cells only `other` has
    /// must hold the mines only `other` counts.
    pub fn difference(&self, other: &Sentence) -> Option<Sentence> {
        if self.cells.len() >= other.cells.len() || !self.cells.is_subset(&other.cells) {
            return None;
        }
        Some(Sentence {
            cells: other.cells.difference(&self.cells).copied().collect(),
            count: other.count - self.count,
        })
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", cell)?;
        }
        write!(f, "}} = {}", self.count)
    }
}
