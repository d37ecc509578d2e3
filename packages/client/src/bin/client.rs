//! Sharepad terminal client.
//!
//! Loads the session snapshot, joins the session and keeps a shared text
//! buffer in sync with the other participants. Automatically reconnects on
//! disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sharepad-client -- --session-id room1 --name Alice
//! cargo run --bin sharepad-client -- -s room1 -n Bob -u ws://127.0.0.1:3000/ws -a http://127.0.0.1:3000
//! ```

use clap::Parser;

use sharepad_client::{ClientConfig, run_client};
use sharepad_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "sharepad-client")]
#[command(about = "Terminal client for collaborative editing sessions", long_about = None)]
struct Args {
    /// Session to join
    #[arg(short = 's', long)]
    session_id: String,

    /// Display name shown to the other participants
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// HTTP base URL for snapshots
    #[arg(short = 'a', long, default_value = "http://127.0.0.1:8080")]
    api_url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = ClientConfig {
        url: args.url,
        api_url: args.api_url,
        session_id: args.session_id,
        display_name: args.name,
    };
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
