//! Twenty48 - rule engine for a sliding-tile merge puzzle
//!
//! This crate provides the core game logic, including:
//! - A validated N x N board with value semantics
//! - The directional slide/merge algorithm
//! - Random tile spawning from an injected random source
//! - Win and game-over predicates
//! - A session state machine for callers that want one
//!
//! # Architecture
//!
//! Everything below [`game`] is pure: boards are never mutated in place and
//! randomness only enters through a caller-supplied [`rand::Rng`]. The engine
//! can be compiled to:
//! - Native Rust for server-side hosting
//! - WebAssembly for a browser front end (feature `wasm`)
//!
//! # Modules
//!
//! - [`board`]: Board type, directions and terminal-state predicates
//! - [`engine`]: Move/merge algorithm
//! - [`spawn`]: Random tile placement
//! - [`config`]: Per-game settings
//! - [`game`]: Session state machine

pub mod actions;
pub mod board;
pub mod config;
pub mod engine;
pub mod game;
pub mod spawn;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use board::{Board, BoardError, CellPos, Direction, WINNING_TILE};
pub use config::{GameConfig, DEFAULT_SIZE, SUPPORTED_SIZES};
pub use engine::{slide_line_left, LineOutcome, MoveOutcome};
pub use game::{GameError, GameSession, GameStatus};
pub use spawn::{
    init_board, init_board_with, place_random_tile, spawn_tile, spawn_tile_with, SpawnedTile,
    FOUR_PROBABILITY,
};
