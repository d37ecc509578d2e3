//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: real-time channel messages
//! - `http`: snapshot and introspection API bodies

pub mod conversion;
pub mod http;
pub mod websocket;
