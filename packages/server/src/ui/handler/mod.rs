//! Request handlers.

mod http;
mod websocket;

pub use http::{get_session_members, health_check, load_snapshot, save_snapshot};
pub use websocket::websocket_handler;
