//! Error types for the Sharepad client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// WebSocket connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Snapshot HTTP request error
    #[error("Snapshot request failed: {0}")]
    SnapshotRequest(String),
}
