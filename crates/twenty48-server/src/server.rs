//! WebSocket server and connection handling.

use crate::config::ServerConfig;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::PlayerSession;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use twenty48_core::GameAction;
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    pub config: ServerConfig,
    /// One game session per connection
    pub sessions: DashMap<Uuid, PlayerSession>,
    /// Mapping from session ID to its message sender
    pub senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
            senders: DashMap::new(),
        }
    }

    /// Send a message to a specific session.
    pub fn send_to(&self, session_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&session_id) {
            let _ = sender.send(msg);
        }
    }

    fn send_error(&self, session_id: Uuid, message: impl Into<String>) {
        self.send_to(
            session_id,
            ServerMessage::Error {
                message: message.into(),
            },
        );
    }

    /// Send the current game state, or an error if no game has started.
    fn send_state(&self, session_id: Uuid) {
        let snapshot = self
            .sessions
            .get(&session_id)
            .and_then(|session| session.snapshot());

        match snapshot {
            Some(state) => self.send_to(session_id, ServerMessage::GameState { state }),
            None => self.send_error(session_id, "No game in progress"),
        }
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Twenty48 server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let session_id = Uuid::new_v4();
    state
        .sessions
        .insert(session_id, PlayerSession::new(state.config.default_size));

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.senders.insert(session_id, tx);

    // Send welcome message
    let welcome = ServerMessage::Welcome { session_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(session_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", session_id, text);
                    state.send_error(session_id, format!("Invalid message: {}", e));
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", session_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to(session_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", session_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    state.sessions.remove(&session_id);
    state.senders.remove(&session_id);
    send_task.abort();

    info!("Connection closed for {}", session_id);
    Ok(())
}

/// Handle a client message.
pub(crate) fn handle_message(session_id: Uuid, msg: ClientMessage, state: &ServerState) {
    match msg {
        ClientMessage::NewGame { size, seed } => {
            let result = match state.sessions.get_mut(&session_id) {
                Some(mut session) => session.new_game(size, seed),
                None => return,
            };
            match result {
                Ok(()) => {
                    info!("Session {} started a new game", session_id);
                    state.send_state(session_id);
                }
                Err(e) => state.send_error(session_id, e.to_string()),
            }
        }

        ClientMessage::Move { direction } => {
            let Some(mut session) = state.sessions.get_mut(&session_id) else {
                return;
            };

            match session.apply_move(direction) {
                Ok(events) => {
                    let moved = !events.is_empty();
                    let snapshot = session.snapshot();
                    let outcome = session.outcome();
                    let best_score = session.best_score;
                    drop(session); // Release lock before sending

                    debug!("Session {} moved {} (changed: {})", session_id, direction, moved);
                    state.send_to(
                        session_id,
                        ServerMessage::MoveResult {
                            moved,
                            events,
                            error: None,
                        },
                    );

                    // A move that changes nothing needs no re-render
                    if !moved {
                        return;
                    }
                    if let Some(state_snapshot) = snapshot {
                        state.send_to(
                            session_id,
                            ServerMessage::GameState {
                                state: state_snapshot,
                            },
                        );
                    }

                    if let Some((status, score)) = outcome {
                        info!(
                            "Session {} finished: {:?} with score {}",
                            session_id, status, score
                        );
                        state.send_to(
                            session_id,
                            ServerMessage::GameOver {
                                status,
                                score,
                                best_score,
                            },
                        );
                    }
                }
                Err(e) => {
                    drop(session);
                    state.send_to(
                        session_id,
                        ServerMessage::MoveResult {
                            moved: false,
                            events: vec![],
                            error: Some(e.to_string()),
                        },
                    );
                }
            }
        }

        ClientMessage::Restart => apply_and_send_state(session_id, GameAction::Restart, state),

        ClientMessage::Resize { size } => {
            apply_and_send_state(session_id, GameAction::Resize(size), state)
        }

        ClientMessage::GetState => state.send_state(session_id),

        ClientMessage::Ping => {
            state.send_to(session_id, ServerMessage::Pong);
        }
    }
}

/// Apply a non-move action and report the resulting state.
fn apply_and_send_state(session_id: Uuid, action: GameAction, state: &ServerState) {
    let result = match state.sessions.get_mut(&session_id) {
        Some(mut session) => session.apply(action),
        None => return,
    };

    match result {
        Ok(_) => state.send_state(session_id),
        Err(e) => state.send_error(session_id, e.to_string()),
    }
}
