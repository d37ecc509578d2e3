//! One WebSocket session: join, then relay between the terminal and the server.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use sharepad_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    domain::{Command, EditorState},
    error::ClientError,
    formatter::MessageFormatter,
    snapshot::SnapshotClient,
    ui::redisplay_prompt,
};

/// Run one client session until the user quits or the connection is lost.
///
/// `Ok(())` means the user asked to leave; any error is a connection loss the
/// caller may retry.
pub async fn run_client_session(
    url: &str,
    editor: Arc<Mutex<EditorState>>,
    snapshots: &SnapshotClient,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    let (mut write, mut read) = ws_stream.split();

    let (join, display_name) = {
        let mut editor = editor.lock().await;
        editor.reset_connection();
        (editor.join_message(), editor.display_name().to_string())
    };
    let join = encode(&join)?;
    write
        .send(Message::Text(join.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to {}", url);
    println!(
        "\nYou are '{}'. Type a line to append it to the shared buffer. Commands: /show /clear /save /who /quit\n",
        display_name
    );

    // 受信タスクと入力ループの両方から送信するためのキュー
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();

    let mut write_task = tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };
            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                break;
            }
        }
    });

    let editor_for_read = editor.clone();
    let out_tx_for_read = out_tx.clone();
    let name_for_read = display_name.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let message = match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::warn!("Ignoring unexpected message: {}", e);
                            continue;
                        }
                    };

                    let mut editor = editor_for_read.lock().await;
                    if let Some(reply) = editor.apply(&message) {
                        out_tx_for_read.send(reply).ok();
                    }
                    print!("{}", describe(&message, &editor));
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let input_loop = async {
        while let Some(line) = input_rx.recv().await {
            let mut editor = editor.lock().await;
            match Command::parse(&line) {
                Command::Append(text) => {
                    out_tx.send(editor.append_line(&text)).ok();
                }
                Command::Clear => {
                    out_tx.send(editor.clear()).ok();
                    println!("buffer cleared");
                }
                Command::Show => print!("{}", MessageFormatter::format_buffer(editor.buffer())),
                Command::Who => print!(
                    "{}",
                    MessageFormatter::format_roster(editor.members(), editor.connection_id())
                ),
                Command::Save => {
                    let session_id = editor.session_id().to_string();
                    let text = editor.buffer().to_string();
                    drop(editor);
                    match snapshots.save(&session_id, text).await {
                        Ok(saved) => print!("{}", MessageFormatter::format_saved(&saved.saved_at)),
                        Err(e) => println!("{}", e),
                    }
                }
                Command::Unknown(command) => {
                    print!("{}", MessageFormatter::format_unknown_command(&command))
                }
                Command::Quit => return,
            }
            redisplay_prompt(&display_name);
        }
    };

    // If any one of the tasks completes, abort the others
    tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        _ = &mut write_task => {
            read_task.abort();
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        _ = input_loop => {
            read_task.abort();
            write_task.abort();
            Ok(())
        }
    }
}

fn encode(message: &ClientMessage) -> Result<String, ClientError> {
    serde_json::to_string(message).map_err(|e| ClientError::ConnectionError(e.to_string()))
}

/// Render an incoming message after it has been applied to `editor`
fn describe(message: &ServerMessage, editor: &EditorState) -> String {
    match message {
        ServerMessage::Joined {
            display_name,
            connection_id,
            ..
        } => {
            let mut output = String::new();
            if editor.connection_id() != Some(connection_id.as_str()) {
                output.push_str(&MessageFormatter::format_participant_joined(display_name));
            }
            output.push_str(&MessageFormatter::format_roster(
                editor.members(),
                editor.connection_id(),
            ));
            output
        }
        ServerMessage::CodeChange { .. } => MessageFormatter::format_buffer(editor.buffer()),
        ServerMessage::Disconnected { display_name, .. } => {
            let mut output = MessageFormatter::format_participant_left(display_name);
            output.push_str(&MessageFormatter::format_roster(
                editor.members(),
                editor.connection_id(),
            ));
            output
        }
        ServerMessage::Error { code, message } => MessageFormatter::format_error(*code, message),
    }
}
