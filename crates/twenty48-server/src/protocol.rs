//! WebSocket protocol messages for Twenty48.

use serde::{Deserialize, Serialize};
use twenty48_core::{Board, Direction, GameEvent, GameStatus};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Start a new game, replacing any game in progress
    NewGame {
        #[serde(default)]
        size: Option<usize>,
        #[serde(default)]
        seed: Option<u64>,
    },

    /// Slide the tiles
    Move { direction: Direction },

    /// Start over on the current board size
    Restart,

    /// Change board size and start over
    Resize { size: usize },

    /// Request the current game state
    GetState,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned session ID
    Welcome { session_id: Uuid },

    /// Current game state
    GameState { state: GameSnapshot },

    /// Outcome of a move request
    MoveResult {
        moved: bool,
        events: Vec<GameEvent>,
        error: Option<String>,
    },

    /// Game finished
    GameOver {
        status: GameStatus,
        score: u64,
        best_score: u64,
    },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// What a client needs to render a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub score: u64,
    pub best_score: u64,
    pub status: GameStatus,
    pub moves: u32,
    pub valid_moves: Vec<Direction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"Move","payload":{"direction":"left"}}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Move {
                direction: Direction::Left
            }
        ));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Restart"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Restart));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"NewGame","payload":{"size":5}}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::NewGame {
                size: Some(5),
                seed: None
            }
        ));
    }

    #[test]
    fn test_unknown_direction_rejected() {
        let parsed = serde_json::from_str::<ClientMessage>(
            r#"{"type":"Move","payload":{"direction":"ArrowLeft"}}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_server_message_format() {
        let msg = ServerMessage::GameOver {
            status: GameStatus::Won,
            score: 20480,
            best_score: 20480,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "GameOver");
        assert_eq!(json["payload"]["status"], "Won");
        assert_eq!(json["payload"]["score"], 20480);

        let json = serde_json::to_value(&ServerMessage::Pong).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Pong"}));
    }
}
