//! Utilities shared by the Sharepad server and client.

pub mod logger;
pub mod time;
