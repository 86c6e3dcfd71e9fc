//! One game: a hidden board, the AI's knowledge of it, and the move loop.
//!
//! Moves come from the knowledge base: a proven safe cell when there is
//! one, otherwise a random cell that is not a known mine.

use serde::Serialize;
use tracing::info;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::knowledge::KnowledgeBase;
use crate::rng::MoveRng;
use crate::types::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSource {
    /// Proven safe by the knowledge base.
    Safe,
    /// Guessed.
    Random,
    /// Chosen by the caller.
    Manual,
}

/// What a single move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Revealed {
        cell: Cell,
        count: u8,
        source: MoveSource,
    },
    Exploded {
        cell: Cell,
        source: MoveSource,
    },
    /// No move could be chosen.
    NoMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "cell", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Lost(Cell),
    /// Neither a safe nor a random move is available.
    Stuck,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    ai: KnowledgeBase,
    rng: MoveRng,
    exploded: Option<Cell>,
    stuck: bool,
}

impl Session {
    /// Start a game with randomly placed mines.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let mut rng = config.rng();
        let board = Board::random(config, &mut rng)?;
        Ok(Self::with_board(board, rng))
    }

    /// Start a game on a prepared board.
    pub fn with_board(board: Board, rng: MoveRng) -> Self {
        Self {
            ai: KnowledgeBase::new(board.height(), board.width()),
            board,
            rng,
            exploded: None,
            stuck: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.ai
    }

    /// Won once every safe cell is revealed, or once the AI has flagged
    /// exactly the board's mines. A board without mines is only won by
    /// revealing it.
    pub fn status(&self) -> GameStatus {
        if let Some(cell) = self.exploded {
            return GameStatus::Lost(cell);
        }
        let safe_cells = self.board.height() * self.board.width() - self.board.mine_count();
        let flagged = self.ai.mines();
        if self.ai.moves_made().len() == safe_cells
            || (!flagged.is_empty() && self.board.won(flagged))
        {
            return GameStatus::Won;
        }
        if self.stuck {
            return GameStatus::Stuck;
        }
        GameStatus::InProgress
    }

    /// The move the AI would make next.
    pub fn next_move(&mut self) -> Option<(Cell, MoveSource)> {
        if let Some(cell) = self.ai.make_safe_move() {
            return Some((cell, MoveSource::Safe));
        }
        self.ai
            .make_random_move(&mut self.rng)
            .map(|cell| (cell, MoveSource::Random))
    }

    /// Let the AI make one move. Does nothing once the game is over.
    pub fn step(&mut self) -> Step {
        if self.status().is_over() {
            return Step::NoMove;
        }
        match self.next_move() {
            Some((cell, source)) => self.apply(cell, source),
            None => {
                info!("no moves left to make");
                self.stuck = true;
                Step::NoMove
            }
        }
    }

    /// Reveal a cell chosen by the caller.
    pub fn reveal(&mut self, cell: Cell) -> Result<Step> {
        if self.status().is_over() {
            return Err(Error::GameOver);
        }
        if !self.board.contains(cell) {
            return Err(Error::OutOfBounds(cell));
        }
        if self.ai.moves_made().contains(&cell) {
            return Err(Error::AlreadyRevealed(cell));
        }
        Ok(self.apply(cell, MoveSource::Manual))
    }

    /// Step until the game is won, lost or stuck.
    pub fn play(&mut self) -> GameStatus {
        while !self.status().is_over() {
            self.step();
        }
        let status = self.status();
        info!(
            ?status,
            moves = self.ai.moves_made().len(),
            flagged = self.ai.mines().len(),
            "game finished"
        );
        status
    }

    fn apply(&mut self, cell: Cell, source: MoveSource) -> Step {
        if self.board.is_mine(cell) {
            info!(%cell, ?source, "hit a mine");
            self.exploded = Some(cell);
            return Step::Exploded { cell, source };
        }

        let count = self.board.nearby_mines(cell);
        info!(%cell, count, ?source, "revealed");
        self.ai.add_knowledge(cell, count);
        Step::Revealed {
            cell,
            count,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Sentence;

    fn session(height: usize, width: usize, mines: &[(usize, usize)], seed: u64) -> Session {
        let board = Board::with_mines(height, width, mines.iter().map(|&c| Cell::from(c))).unwrap();
        Session::with_board(board, MoveRng::from_seed(seed))
    }

    /// Every fact the AI holds agrees with the hidden board.
    fn assert_sound(session: &Session) {
        let ai = session.knowledge();
        assert!(ai.mines().is_disjoint(ai.safes()));
        for &cell in ai.mines() {
            assert!(session.board().is_mine(cell), "{} flagged but safe", cell);
        }
        for &cell in ai.safes() {
            assert!(!session.board().is_mine(cell), "{} deemed safe but a mine", cell);
        }
        for sentence in ai.knowledge() {
            assert!(sentence.count() >= 0 && sentence.count() <= sentence.len() as i32);
            let actual = sentence.cells().iter().filter(|&&c| session.board().is_mine(c)).count();
            assert_eq!(actual as i32, sentence.count(), "{} is false", sentence);
        }
    }

    #[test]
    fn test_reveal_corner_on_three_by_three() {
        let mut s = session(3, 3, &[(2, 2)], 1);
        let step = s.reveal(Cell::new(0, 0)).unwrap();

        assert_eq!(
            step,
            Step::Revealed {
                cell: Cell::new(0, 0),
                count: 0,
                source: MoveSource::Manual
            }
        );
        for cell in [(0, 1), (1, 0), (1, 1)] {
            assert!(s.knowledge().safes().contains(&Cell::from(cell)));
        }
        assert_eq!(s.next_move(), Some((Cell::new(0, 1), MoveSource::Safe)));
    }

    #[test]
    fn test_play_solves_single_mine_board() {
        let mut s = session(3, 3, &[(2, 2)], 1);
        s.reveal(Cell::new(0, 0)).unwrap();
        assert_eq!(s.play(), GameStatus::Won);
        assert!(s.knowledge().mines().iter().all(|&c| c == Cell::new(2, 2)));
        assert_sound(&s);
    }

    #[test]
    fn test_manual_reveal_errors() {
        let mut s = session(3, 3, &[(2, 2)], 1);
        assert_eq!(s.reveal(Cell::new(3, 3)), Err(Error::OutOfBounds(Cell::new(3, 3))));

        s.reveal(Cell::new(1, 1)).unwrap();
        assert_eq!(s.reveal(Cell::new(1, 1)), Err(Error::AlreadyRevealed(Cell::new(1, 1))));

        assert_eq!(
            s.reveal(Cell::new(2, 2)).unwrap(),
            Step::Exploded {
                cell: Cell::new(2, 2),
                source: MoveSource::Manual
            }
        );
        assert_eq!(s.status(), GameStatus::Lost(Cell::new(2, 2)));
        assert_eq!(s.reveal(Cell::new(0, 0)), Err(Error::GameOver));
        assert_eq!(s.step(), Step::NoMove);
    }

    #[test]
    fn test_won_once_every_mine_is_flagged() {
        let mut s = session(1, 4, &[(0, 0)], 5);
        s.reveal(Cell::new(0, 2)).unwrap();
        assert_eq!(s.status(), GameStatus::InProgress);

        s.reveal(Cell::new(0, 1)).unwrap();
        // (0, 3) is still unplayed, but the only mine is deduced.
        assert!(!s.knowledge().moves_made().contains(&Cell::new(0, 3)));
        assert_eq!(s.status(), GameStatus::Won);
    }

    #[test]
    fn test_mine_free_board_needs_a_move_to_win() {
        let mut s = session(3, 3, &[], 2);
        assert_eq!(s.status(), GameStatus::InProgress);

        assert!(matches!(s.step(), Step::Revealed { .. }));
        assert_eq!(s.play(), GameStatus::Won);
        assert_eq!(s.knowledge().moves_made().len(), 9);
        assert_sound(&s);
    }

    #[test]
    fn test_asserted_sentence_feeds_moves() {
        let mut s = session(1, 3, &[(0, 0)], 5);
        s.ai.add_sentence(Sentence::new([Cell::new(0, 0), Cell::new(0, 1)], 1));
        s.ai.add_sentence(Sentence::new([Cell::new(0, 0)], 1));

        assert_eq!(s.next_move(), Some((Cell::new(0, 1), MoveSource::Safe)));
    }

    #[test]
    fn test_stuck_when_only_unknown_mines_remain() {
        let mut s = session(1, 2, &[(0, 1)], 5);
        s.ai.mark_mine(Cell::new(0, 0));
        s.ai.mark_mine(Cell::new(0, 1));

        assert_eq!(s.step(), Step::NoMove);
        assert_eq!(s.status(), GameStatus::Stuck);
    }

    #[test]
    fn test_seeded_games_stay_sound() {
        for seed in 0..40 {
            let config = GameConfig {
                height: 8,
                width: 8,
                mines: 8,
                seed: Some(seed),
            };
            let mut s = Session::new(&config).unwrap();
            while !s.status().is_over() {
                s.step();
                assert_sound(&s);
            }
            if let GameStatus::Lost(cell) = s.status() {
                assert!(!s.knowledge().safes().contains(&cell));
            }
        }
    }

    #[test]
    fn test_seeded_game_is_reproducible() {
        let config = GameConfig {
            seed: Some(11),
            ..GameConfig::default()
        };
        let mut a = Session::new(&config).unwrap();
        let mut b = Session::new(&config).unwrap();
        assert_eq!(a.play(), b.play());
        assert_eq!(a.knowledge().moves_made(), b.knowledge().moves_made());
    }

    #[test]
    fn test_step_serializes() {
        let step = Step::Revealed {
            cell: Cell::new(1, 2),
            count: 3,
            source: MoveSource::Random,
        };
        let json = serde_json::to_value(step).unwrap();
        assert_eq!(json["kind"], "revealed");
        assert_eq!(json["source"], "random");
        assert_eq!(json["cell"]["col"], 2);

        let json = serde_json::to_value(GameStatus::Lost(Cell::new(0, 1))).unwrap();
        assert_eq!(json["status"], "lost");
        assert_eq!(json["cell"]["col"], 1);
    }
}
