//! WebSocket connection handlers.
//!
//! Each connection runs two tasks: the inbound reader that drives the
//! per-connection `ConnectionState` and dispatches protocol messages, and the
//! pusher loop that drains the outbound queue into the socket. When either task
//! ends the other is aborted and the connection is disconnected.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionState, Departure, DisplayName, Participant, SessionId},
    infrastructure::dto::websocket::{ClientMessage, ErrorCode, MemberInfo, ServerMessage},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Outbound queue of this connection
/// * `sender` - WebSocket sink of this connection
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.open_connection_usecase.execute(tx.clone()).await;
    tracing::info!("Connection '{}' opened", connection_id);

    let state_clone = state.clone();

    let mut recv_task = tokio::spawn(async move {
        let mut connection = ConnectionState::default();

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if let Err(reply) =
                        dispatch(&state_clone, connection_id, &mut connection, text.as_str()).await
                    {
                        tracing::warn!("Rejected message from '{}': {:?}", connection_id, reply);
                        // 違反の通知は送信者だけに返す
                        if let Some(json) = encode(&reply) {
                            let _ = tx.send(json);
                        }
                    }
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    connection.close();
                    break;
                }
                // Ping/pong is handled by the WebSocket layer
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let departure_notice = |departure: &Departure| {
        encode(&ServerMessage::Disconnected {
            connection_id: departure.connection_id.to_string(),
            display_name: departure.display_name.to_string(),
        })
    };
    state
        .disconnect_usecase
        .execute(&connection_id, &departure_notice)
        .await;
    tracing::info!("Connection '{}' closed", connection_id);
}

/// Handle one inbound text frame.
///
/// Returns the `error` message to send back to the sender when the frame is
/// malformed or not valid in the current state.
async fn dispatch(
    state: &AppState,
    connection_id: ConnectionId,
    connection: &mut ConnectionState,
    text: &str,
) -> Result<(), ServerMessage> {
    let message = serde_json::from_str::<ClientMessage>(text).map_err(|e| ServerMessage::Error {
        code: ErrorCode::InvalidMessage,
        message: format!("malformed message: {}", e),
    })?;

    match message {
        ClientMessage::Join {
            session_id,
            display_name,
        } => {
            connection.ensure_can_join()?;
            let session_id = SessionId::new(session_id)?;
            let display_name = DisplayName::new(display_name);

            let joined_notice = |members: &[Participant]| {
                encode(&ServerMessage::Joined {
                    members: members.iter().cloned().map(MemberInfo::from).collect(),
                    display_name: display_name.to_string(),
                    connection_id: connection_id.to_string(),
                })
            };
            state
                .join_session_usecase
                .execute(
                    connection_id,
                    session_id.clone(),
                    display_name.clone(),
                    &joined_notice,
                )
                .await?;
            connection.join(session_id)?;
        }
        ClientMessage::CodeChange { session_id, text } => {
            let joined = connection.joined_session()?.clone();
            if joined.as_str() != session_id {
                return Err(ServerMessage::Error {
                    code: ErrorCode::NotJoined,
                    message: format!("connection has not joined session '{}'", session_id),
                });
            }

            if let Some(json) = encode(&ServerMessage::CodeChange { text }) {
                state
                    .broadcast_edit_usecase
                    .execute(&connection_id, &joined, &json)
                    .await?;
            }
        }
        ClientMessage::SyncCode {
            target_connection_id,
            text,
        } => {
            connection.joined_session()?;
            let target = target_connection_id.parse::<ConnectionId>()?;

            if let Some(json) = encode(&ServerMessage::CodeChange { text }) {
                state
                    .sync_code_usecase
                    .execute(&connection_id, &target, &json)
                    .await?;
            }
        }
    }

    Ok(())
}

fn encode(message: &ServerMessage) -> Option<String> {
    match message.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to encode {:?}: {}", message, e);
            None
        }
    }
}
