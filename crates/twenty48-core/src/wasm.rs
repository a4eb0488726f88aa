//! WebAssembly bindings for the Twenty48 engine.
//!
//! This module exposes a game session to JavaScript through wasm-bindgen.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::GameAction;
#[cfg(feature = "wasm")]
use crate::board::Direction;
#[cfg(feature = "wasm")]
use crate::config::GameConfig;
#[cfg(feature = "wasm")]
use crate::game::{GameSession, GameStatus};

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    session: GameSession,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a new game on a `size` x `size` board. Pass a seed for a
    /// reproducible game.
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize, seed: Option<u64>) -> Result<WasmGame, JsValue> {
        let config = GameConfig::with_size(size);
        let session = match seed {
            Some(seed) => GameSession::with_seed(config, seed),
            None => GameSession::new(config),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(WasmGame { session })
    }

    /// Get the whole session as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.session).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the board as a JSON array of rows
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        serde_json::to_string(&self.session.board).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u64 {
        self.session.score
    }

    #[wasm_bindgen(js_name = getBestScore)]
    pub fn get_best_score(&self) -> u64 {
        self.session.best_score
    }

    /// "playing", "won" or "lost"
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> String {
        match self.session.status {
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
        .to_string()
    }

    /// Get the directions that would change the board as a JSON array
    #[wasm_bindgen(js_name = getValidMoves)]
    pub fn get_valid_moves(&self) -> String {
        serde_json::to_string(&self.session.valid_moves()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Move in a direction ("up", "down", "left", "right"), returns events JSON
    #[wasm_bindgen(js_name = "move")]
    pub fn make_move(&mut self, direction: &str) -> Result<String, JsValue> {
        let direction: Direction = direction
            .parse()
            .map_err(|e: crate::board::BoardError| JsValue::from_str(&e.to_string()))?;
        self.apply(GameAction::Move(direction))
    }

    /// Start over on the current board size
    pub fn restart(&mut self) -> Result<String, JsValue> {
        self.apply(GameAction::Restart)
    }

    /// Switch board size and start over
    pub fn resize(&mut self, size: usize) -> Result<String, JsValue> {
        self.apply(GameAction::Resize(size))
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }
}

#[cfg(feature = "wasm")]
impl WasmGame {
    fn apply(&mut self, action: GameAction) -> Result<String, JsValue> {
        match self.session.apply_action(action) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Action failed: {}", e))),
        }
    }
}
