//! Terminal collaborator for Sharepad sessions.
//!
//! Loads the session snapshot over HTTP, joins the session over WebSocket and
//! keeps a local text buffer in sync with the other participants.

mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod snapshot;
mod ui;

pub use runner::{ClientConfig, run_client};
