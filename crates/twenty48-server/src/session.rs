//! Per-connection game sessions.

use thiserror::Error;
use twenty48_core::{
    Direction, GameAction, GameConfig, GameError, GameEvent, GameSession, GameStatus,
};

use crate::protocol::GameSnapshot;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No game in progress")]
    NoActiveGame,

    #[error(transparent)]
    Game(#[from] GameError),
}

/// A connected player and their current game.
pub struct PlayerSession {
    /// Size used when a new game doesn't ask for one
    pub default_size: usize,
    /// Best score across every game played on this connection
    pub best_score: u64,
    /// The game in progress (once started)
    pub game: Option<GameSession>,
}

impl PlayerSession {
    pub fn new(default_size: usize) -> Self {
        Self {
            default_size,
            best_score: 0,
            game: None,
        }
    }

    /// Start a fresh game, replacing the current one.
    pub fn new_game(&mut self, size: Option<usize>, seed: Option<u64>) -> Result<(), SessionError> {
        let config = GameConfig::with_size(size.unwrap_or(self.default_size));
        let mut game = match seed {
            Some(seed) => GameSession::with_seed(config, seed)?,
            None => GameSession::new(config)?,
        };
        game.best_score = self.best_score;
        self.game = Some(game);
        Ok(())
    }

    pub fn apply_move(&mut self, direction: Direction) -> Result<Vec<GameEvent>, SessionError> {
        self.apply(GameAction::Move(direction))
    }

    pub fn apply(&mut self, action: GameAction) -> Result<Vec<GameEvent>, SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NoActiveGame)?;
        let events = game.apply_action(action)?;
        self.best_score = self.best_score.max(game.best_score);
        Ok(events)
    }

    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.game.as_ref().map(|g| GameSnapshot {
            board: g.board.clone(),
            score: g.score,
            best_score: g.best_score,
            status: g.status,
            moves: g.moves,
            valid_moves: g.valid_moves(),
        })
    }

    /// Final status and score if the game has ended
    pub fn outcome(&self) -> Option<(GameStatus, u64)> {
        let game = self.game.as_ref()?;
        if game.is_finished() {
            Some((game.status, game.score))
        } else {
            None
        }
    }
}
