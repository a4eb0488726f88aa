//! Player actions and the events they produce.

use crate::board::{CellPos, Direction};
use serde::{Deserialize, Serialize};

/// Everything a player can ask a session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Slide all tiles in a direction
    Move(Direction),
    /// Start over on a fresh board of the current size
    Restart,
    /// Switch to a different board size and start over
    Resize(usize),
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Tiles slid (and possibly merged)
    TilesMoved {
        direction: Direction,
        score_gained: u64,
    },

    /// A new tile appeared after a move
    TileSpawned { pos: CellPos, value: u32 },

    /// A merge reached the target tile
    GameWon { score: u64 },

    /// The board filled up with no merges left
    GameLost { score: u64 },

    /// A fresh board was dealt
    GameRestarted { size: usize },
}
