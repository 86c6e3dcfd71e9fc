//! The AI's reasoning state.
//!
//! A `KnowledgeBase` collects one sentence per revealed cell and keeps the
//! sets of cells proven to be mines or safe. After every observation it runs
//! two rules until neither changes anything:
//!
//! - Direct resolution: a sentence with `count == 0` makes all of its cells
//!   safe, one with `count == |cells|` makes all of them mines.
//! - Subset resolution: if `A ⊊ B`, then `B \ A` holds exactly
//!   `B.count - A.count` mines, which becomes a new sentence.
//!
//! Each pass scans a stable view of the sentences, collects what it learnt,
//! and only then applies the marks, so sentences emptied by a mark are never
//! skipped or visited twice.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::rng::MoveRng;
use crate::sentence::{Sentence, SentenceState};
use crate::types::{Cell, NeighborCache};

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    neighbors: NeighborCache,
    /// Cells already played.
    moves_made: BTreeSet<Cell>,
    /// Cells proven not to be mines.
    safes: BTreeSet<Cell>,
    /// Cells proven to be mines.
    mines: BTreeSet<Cell>,
    /// Live sentences. None of their cells are in `safes` or `mines`.
    knowledge: Vec<Sentence>,
    /// Exactly the sentences in `knowledge`, for duplicate checks.
    index: HashSet<Sentence>,
}

/// Serialisable view of a knowledge base.
#[derive(Debug, Serialize)]
pub struct KnowledgeSnapshot<'a> {
    pub height: usize,
    pub width: usize,
    pub moves_made: &'a BTreeSet<Cell>,
    pub safes: &'a BTreeSet<Cell>,
    pub mines: &'a BTreeSet<Cell>,
    pub knowledge: &'a [Sentence],
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            neighbors: NeighborCache::new(height, width),
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            knowledge: Vec::new(),
            index: HashSet::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.neighbors.height
    }

    pub fn width(&self) -> usize {
        self.neighbors.width
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    pub fn snapshot(&self) -> KnowledgeSnapshot<'_> {
        KnowledgeSnapshot {
            height: self.height(),
            width: self.width(),
            moves_made: &self.moves_made,
            safes: &self.safes,
            mines: &self.mines,
            knowledge: &self.knowledge,
        }
    }

    /// Record `cell` as a mine and strike it from every sentence.
    ///
    /// A cell already proven safe is left alone.
    pub fn mark_mine(&mut self, cell: Cell) {
        if self.safes.contains(&cell) {
            warn!(%cell, "refusing to mark a known safe cell as a mine");
            return;
        }
        if !self.mines.insert(cell) {
            return;
        }
        for sentence in &mut self.knowledge {
            sentence.mark_mine(cell);
        }
        self.reindex();
    }

    /// Record `cell` as safe and strike it from every sentence.
    ///
    /// A cell already proven to be a mine is left alone.
    pub fn mark_safe(&mut self, cell: Cell) {
        if self.mines.contains(&cell) {
            warn!(%cell, "refusing to mark a known mine as safe");
            return;
        }
        if !self.safes.insert(cell) {
            return;
        }
        for sentence in &mut self.knowledge {
            sentence.mark_safe(cell);
        }
        self.reindex();
    }

    /// Learn that the safe cell `cell` was revealed with `count` mines around it.
    ///
    /// Must be called once per revealed cell with the board's count. Repeated
    /// or off-board observations are ignored.
    pub fn add_knowledge(&mut self, cell: Cell, count: u8) {
        if !self.neighbors.contains(cell) {
            warn!(%cell, "ignoring observation outside the board");
            return;
        }
        if self.moves_made.contains(&cell) {
            warn!(%cell, "ignoring repeated observation");
            return;
        }

        self.moves_made.insert(cell);
        self.mark_safe(cell);

        let mut unknown = BTreeSet::new();
        let mut known_mines = 0;
        for &neighbor in self.neighbors.get(cell) {
            if self.mines.contains(&neighbor) {
                known_mines += 1;
            } else if !self.safes.contains(&neighbor) {
                unknown.insert(neighbor);
            }
        }

        self.insert(Sentence::new(unknown, i32::from(count) - known_mines));
        self.infer();

        debug!(
            %cell,
            count,
            sentences = self.knowledge.len(),
            played = self.moves_made.len(),
            safes = self.safes.len(),
            mines = self.mines.len(),
            "knowledge updated"
        );
        trace!("\n{}", self);
    }

    /// Assert an externally known constraint.
    ///
    /// Cells already resolved are struck from the sentence first, then
    /// inference runs as after an observation.
    pub fn add_sentence(&mut self, mut sentence: Sentence) {
        let resolved: Vec<Cell> = sentence
            .cells()
            .iter()
            .copied()
            .filter(|cell| self.mines.contains(cell) || self.safes.contains(cell))
            .collect();
        for cell in resolved {
            if self.mines.contains(&cell) {
                sentence.mark_mine(cell);
            } else {
                sentence.mark_safe(cell);
            }
        }

        if self.insert(sentence) {
            self.infer();
        }
    }

    /// A known safe cell that has not been played yet.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.safes
            .iter()
            .copied()
            .find(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
    }

    /// A random cell that is neither played nor a known mine.
    ///
    /// Gives up after `height * width * 10` draws.
    pub fn make_random_move(&self, rng: &mut MoveRng) -> Option<Cell> {
        let (height, width) = (self.height(), self.width());
        if self.neighbors.is_empty() {
            return None;
        }

        for _ in 0..height * width * 10 {
            let cell = rng.cell(height, width);
            if !self.moves_made.contains(&cell) && !self.mines.contains(&cell) {
                return Some(cell);
            }
        }
        None
    }

    fn insert(&mut self, sentence: Sentence) -> bool {
        match sentence.state() {
            SentenceState::Empty | SentenceState::Contradictory => {
                debug!(%sentence, "discarding trivial or invalid sentence");
                false
            }
            _ if self.index.contains(&sentence) => false,
            _ => {
                self.index.insert(sentence.clone());
                self.knowledge.push(sentence);
                true
            }
        }
    }

    /// Drop sentences a mark has emptied or made equal to another one.
    ///
    /// Marks made while a resolution pass applies what it learnt can empty a
    /// sentence outright (its last cell was the one marked). Those are gone
    /// before the next pass looks at them.
    fn reindex(&mut self) {
        let mut index = HashSet::with_capacity(self.knowledge.len());
        self.knowledge
            .retain(|sentence| !sentence.is_empty() && index.insert(sentence.clone()));
        self.index = index;
    }

    /// Alternate both resolution rules until neither makes progress.
    fn infer(&mut self) {
        let mut rounds = 1;
        self.resolve_direct();
        while self.resolve_subsets() {
            rounds += 1;
            self.resolve_direct();
        }
        trace!(rounds, "inference reached a fixed point");
    }

    /// Retire every resolved sentence, repeating until none is left.
    ///
    /// Also drops empty, contradictory and duplicate sentences.
    fn resolve_direct(&mut self) {
        loop {
            let mut safes = Vec::new();
            let mut mines = Vec::new();
            let mut seen = HashSet::new();

            self.knowledge.retain(|sentence| match sentence.state() {
                SentenceState::Unresolved => seen.insert(sentence.clone()),
                SentenceState::AllSafe => {
                    safes.extend(sentence.cells().iter().copied());
                    false
                }
                SentenceState::AllMine => {
                    mines.extend(sentence.cells().iter().copied());
                    false
                }
                SentenceState::Empty => false,
                SentenceState::Contradictory => {
                    warn!(%sentence, "dropping contradictory sentence");
                    false
                }
            });

            self.index = seen;
            if safes.is_empty() && mines.is_empty() {
                return;
            }
            for cell in safes {
                self.mark_safe(cell);
            }
            for cell in mines {
                self.mark_mine(cell);
            }
        }
    }

    /// Derive `B \ A` for every pair with `A ⊊ B`. Returns whether anything
    /// new was learnt.
    fn resolve_subsets(&mut self) -> bool {
        let mut fresh = HashSet::new();
        let mut derived = Vec::new();

        for (i, a) in self.knowledge.iter().enumerate() {
            for b in &self.knowledge[i + 1..] {
                if a.len() == b.len() {
                    continue;
                }
                let Some(sentence) = a.difference(b).or_else(|| b.difference(a)) else {
                    continue;
                };
                if !self.index.contains(&sentence) && fresh.insert(sentence.clone()) {
                    trace!(%a, %b, %sentence, "derived sentence");
                    derived.push(sentence);
                }
            }
        }

        let mut progress = false;
        let mut safes = Vec::new();
        for sentence in derived {
            match sentence.state() {
                SentenceState::AllSafe => safes.extend(sentence.cells().iter().copied()),
                SentenceState::Unresolved | SentenceState::AllMine => {
                    self.index.insert(sentence.clone());
                    self.knowledge.push(sentence);
                    progress = true;
                }
                SentenceState::Empty => {}
                SentenceState::Contradictory => {
                    warn!(%sentence, "derived a contradictory sentence");
                }
            }
        }

        let before = self.safes.len();
        for cell in safes {
            self.mark_safe(cell);
        }
        progress || self.safes.len() > before
    }
}

fn write_cells<'a>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    cells: impl Iterator<Item = &'a Cell>,
) -> fmt::Result {
    let cells: Vec<String> = cells.map(Cell::to_string).collect();
    write!(f, "{} ({}): ", label, cells.len())?;
    if cells.is_empty() {
        writeln!(f, "none")
    } else {
        writeln!(f, "{}", cells.join(", "))
    }
}

/// Multi-line dump of sentences, played cells, unplayed safe cells and mines.
impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "knowledge ({} sentences):", self.knowledge.len())?;
        for sentence in &self.knowledge {
            writeln!(f, "  {}", sentence)?;
        }
        write_cells(f, "played", self.moves_made.iter())?;
        write_cells(
            f,
            "safe, unplayed",
            self.safes.difference(&self.moves_made),
        )?;
        write_cells(f, "mines", self.mines.iter())
    }
}
