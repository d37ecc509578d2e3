//! Sharepad session server.
//!
//! Relays edits between the participants of a session over WebSocket and
//! serves session snapshots over HTTP.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sharepad-server
//! cargo run --bin sharepad-server -- --host 0.0.0.0 --port 3000 --snapshot-dir ./snapshots
//! ```

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use clap::Parser;
use sharepad_server::{
    domain::{SessionHub, SnapshotRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{FileSnapshotRepository, InMemorySessionRepository, InMemorySnapshotRepository},
    },
    ui::{AppState, Server},
};
use sharepad_shared::logger::setup_logger;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "sharepad-server")]
#[command(about = "Session synchronization server for collaborative editing", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Directory for session snapshots (kept in memory when omitted)
    #[arg(short = 'd', long)]
    snapshot_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // 1. Repositories
    let hub = Arc::new(Mutex::new(SessionHub::new()));
    let session_repository = Arc::new(InMemorySessionRepository::new(hub));
    let snapshot_repository: Arc<dyn SnapshotRepository> = match args.snapshot_dir {
        Some(dir) => {
            tracing::info!("Persisting snapshots under {}", dir.display());
            Arc::new(FileSnapshotRepository::with_system_clock(dir))
        }
        None => {
            tracing::info!("Keeping snapshots in memory");
            Arc::new(InMemorySnapshotRepository::default())
        }
    };

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. UseCases + server
    let state = AppState::new(session_repository, snapshot_repository, message_pusher);
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
