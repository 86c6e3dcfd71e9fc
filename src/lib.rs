//! Knowledge-base Minesweeper inference engine.
//!
//! The AI keeps a list of sentences ("exactly `n` of these cells are mines")
//! and derives safe cells and mines from them after every revealed cell.
//! A [`Session`] drives that reasoning against a hidden [`Board`]. The same
//! session is exported to JavaScript via wasm-bindgen.
//!
//! Cell lists crossing the WASM boundary are flat `Uint32Array`s of
//! `[row0, col0, row1, col1, ...]`.

pub mod board;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod rng;
pub mod sentence;
pub mod session;
pub mod types;

pub use board::Board;
pub use config::GameConfig;
pub use error::{Error, Result};
pub use knowledge::{KnowledgeBase, KnowledgeSnapshot};
pub use rng::MoveRng;
pub use sentence::{Sentence, SentenceState};
pub use session::{GameStatus, MoveSource, Session, Step};
pub use types::{Cell, NeighborCache};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use std::collections::BTreeSet;

    use wasm_bindgen::prelude::*;

    use crate::types::Cell;
    use crate::{GameConfig, Session};

    fn flatten(cells: &BTreeSet<Cell>) -> js_sys::Uint32Array {
        let flat: Vec<u32> = cells
            .iter()
            .flat_map(|cell| [cell.row as u32, cell.col as u32])
            .collect();
        let arr = js_sys::Uint32Array::new_with_length(flat.len() as u32);
        arr.copy_from(&flat);
        arr
    }

    fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
    }

    /// A game played by the AI, optionally with moves from the caller.
    #[wasm_bindgen]
    pub struct AiSession {
        inner: Session,
    }

    #[wasm_bindgen]
    impl AiSession {
        /// Build from `{ height, width, mines, seed }`; missing keys use defaults.
        #[wasm_bindgen(constructor)]
        pub fn new(config: JsValue) -> Result<AiSession, JsError> {
            let config: GameConfig = if config.is_undefined() || config.is_null() {
                GameConfig::default()
            } else {
                serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?
            };
            let inner = Session::new(&config).map_err(|e| JsError::new(&e.to_string()))?;
            Ok(AiSession { inner })
        }

        /// Let the AI move once. Returns `{ kind, cell?, count?, source? }`.
        pub fn step(&mut self) -> Result<JsValue, JsError> {
            to_js(&self.inner.step())
        }

        /// Reveal a cell chosen by the player.
        pub fn reveal(&mut self, row: usize, col: usize) -> Result<JsValue, JsError> {
            let step = self
                .inner
                .reveal(Cell::new(row, col))
                .map_err(|e| JsError::new(&e.to_string()))?;
            to_js(&step)
        }

        /// Play until the game ends. Returns `{ status, cell? }`.
        pub fn play(&mut self) -> Result<JsValue, JsError> {
            to_js(&self.inner.play())
        }

        pub fn status(&self) -> Result<JsValue, JsError> {
            to_js(&self.inner.status())
        }

        /// Sentences, played cells, safe cells and mines as a plain object.
        pub fn snapshot(&self) -> Result<JsValue, JsError> {
            to_js(&self.inner.knowledge().snapshot())
        }

        #[wasm_bindgen(js_name = "knownMines")]
        pub fn known_mines(&self) -> js_sys::Uint32Array {
            flatten(self.inner.knowledge().mines())
        }

        #[wasm_bindgen(js_name = "knownSafes")]
        pub fn known_safes(&self) -> js_sys::Uint32Array {
            flatten(self.inner.knowledge().safes())
        }
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM inference engine ready".to_string()
    }
}
