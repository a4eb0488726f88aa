//! Game session state machine.
//!
//! A session owns the current board, the score and a seeded random source,
//! and turns [`GameAction`]s into board updates and [`GameEvent`]s.

use crate::actions::{GameAction, GameEvent};
use crate::board::{Board, Direction};
use crate::config::{GameConfig, SUPPORTED_SIZES};
use crate::spawn::{init_board_with, place_random_tile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Accepting moves
    Playing,
    /// The target tile was reached
    Won,
    /// No move can change the board
    Lost,
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Game is over")]
    GameOver,

    #[error("Unsupported board size {0}, expected 3 to 8")]
    UnsupportedSize(usize),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// A single-player game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SavedSession")]
pub struct GameSession {
    config: GameConfig,
    /// The current board
    pub board: Board,
    /// Score of the current game
    pub score: u64,
    /// Highest score seen by this session, kept across restarts
    pub best_score: u64,
    pub status: GameStatus,
    /// Moves that changed the board in the current game
    pub moves: u32,
    /// Seed this session was created with
    seed: u64,
    #[serde(skip)]
    rng: StdRng,
}

/// Serialized form of a [`GameSession`], checked before it becomes one
#[derive(Deserialize)]
struct SavedSession {
    config: GameConfig,
    board: Board,
    score: u64,
    best_score: u64,
    status: GameStatus,
    moves: u32,
    seed: u64,
}

impl TryFrom<SavedSession> for GameSession {
    type Error = GameError;

    /// A loaded session draws new tiles from a fresh entropy-seeded source.
    fn try_from(saved: SavedSession) -> Result<Self, Self::Error> {
        saved.config.validate()?;
        if saved.board.size() != saved.config.size {
            return Err(GameError::InvalidConfig(format!(
                "board is {n}x{n} but config size is {}",
                saved.config.size,
                n = saved.board.size()
            )));
        }

        Ok(Self {
            config: saved.config,
            board: saved.board,
            score: saved.score,
            best_score: saved.best_score,
            status: saved.status,
            moves: saved.moves,
            seed: saved.seed,
            rng: StdRng::from_entropy(),
        })
    }
}

impl GameSession {
    /// Create a session with a random seed.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let seed = rand::thread_rng().gen();
        Self::with_seed(config, seed)
    }

    /// Create a session whose tile placement is fully determined by `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = init_board_with(config.size, &mut rng, config.four_probability);
        Self {
            config,
            board,
            score: 0,
            best_score: 0,
            status: GameStatus::Playing,
            moves: 0,
            seed,
            rng,
        }
    }

    /// Settings this session plays by
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Check if the game has ended (won or lost)
    pub fn is_finished(&self) -> bool {
        self.status != GameStatus::Playing
    }

    /// Directions that would change the board; empty once the game is over
    pub fn valid_moves(&self) -> Vec<Direction> {
        if self.is_finished() {
            return Vec::new();
        }
        self.board.available_moves()
    }

    /// Apply an action to the session.
    ///
    /// A move that leaves the board unchanged is ignored and yields no events.
    pub fn apply_action(&mut self, action: GameAction) -> Result<Vec<GameEvent>, GameError> {
        match action {
            GameAction::Move(direction) => self.apply_move(direction),

            GameAction::Restart => Ok(vec![self.restart()]),

            GameAction::Resize(size) => {
                if !SUPPORTED_SIZES.contains(&size) {
                    return Err(GameError::UnsupportedSize(size));
                }
                self.config.size = size;
                Ok(vec![self.restart()])
            }
        }
    }

    fn apply_move(&mut self, direction: Direction) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        let mut events = Vec::new();
        let outcome = self.board.shift_with_target(direction, self.config.target);
        if !outcome.moved {
            return Ok(events);
        }

        self.board = outcome.board;
        self.moves += 1;
        self.add_score(outcome.score_gained);
        events.push(GameEvent::TilesMoved {
            direction,
            score_gained: outcome.score_gained,
        });

        // No tile is spawned on the winning move
        if outcome.reached_target || self.board.has_tile_at_least(self.config.target) {
            self.status = GameStatus::Won;
            events.push(GameEvent::GameWon { score: self.score });
            return Ok(events);
        }

        let (board, spawned) =
            place_random_tile(&self.board, &mut self.rng, self.config.four_probability);
        self.board = board;
        if let Some(tile) = spawned {
            events.push(GameEvent::TileSpawned {
                pos: tile.pos,
                value: tile.value,
            });
        }

        if !self.board.has_legal_move() {
            self.status = GameStatus::Lost;
            events.push(GameEvent::GameLost { score: self.score });
        }

        Ok(events)
    }

    fn add_score(&mut self, gained: u64) {
        self.score += gained;
        self.best_score = self.best_score.max(self.score);
    }

    fn restart(&mut self) -> GameEvent {
        self.board = init_board_with(
            self.config.size,
            &mut self.rng,
            self.config.four_probability,
        );
        self.score = 0;
        self.moves = 0;
        self.status = GameStatus::Playing;
        GameEvent::GameRestarted {
            size: self.config.size,
        }
    }
}
