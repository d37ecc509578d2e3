//! Session synchronization engine for a shared text editor.
//!
//! Tracks which connections belong to which editing session, runs the
//! join/presence handshake, relays whole-document edits between peers and
//! keeps a durable snapshot store behind a small HTTP surface.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
