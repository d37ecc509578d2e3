//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{Mutex, mpsc};

use super::{
    domain::{EditorState, should_attempt_reconnect},
    session::run_client_session,
    snapshot::SnapshotClient,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Where to connect and who to be
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8080/ws`
    pub url: String,
    /// HTTP base for snapshots, e.g. `http://127.0.0.1:8080`
    pub api_url: String,
    pub session_id: String,
    pub display_name: String,
}

/// Run the client with reconnection logic
///
/// The buffer is loaded from the snapshot store once and kept across reconnects.
pub async fn run_client(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let snapshots = SnapshotClient::new(config.api_url.clone());
    let text = snapshots.load(&config.session_id).await?;
    tracing::info!(
        "Loaded snapshot of session '{}' ({} bytes)",
        config.session_id,
        text.len()
    );

    let editor = Arc::new(Mutex::new(EditorState::new(
        config.session_id.clone(),
        config.display_name.clone(),
        text,
    )));
    let mut input_rx = spawn_readline(config.display_name.clone());

    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            config.url,
            config.display_name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&config.url, editor.clone(), &snapshots, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(Box::new(e));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

/// Read lines on a blocking thread (rustyline is synchronous)
///
/// The thread outlives individual sessions so input survives reconnects.
fn spawn_readline(display_name: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", display_name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
