//! Domain error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("session id must not be empty")]
    EmptySessionId,

    #[error("invalid connection id: '{0}'")]
    InvalidConnectionId(String),
}

/// Connection registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error("connection '{0}' is not registered")]
    NotFound(String),
}

/// Session hub errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("connection '{0}' has already joined a session")]
    AlreadyJoined(String),

    #[error("connection '{0}' is already registered")]
    DuplicateConnection(String),
}

/// Per-connection state machine violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("connection has already joined session '{0}'")]
    AlreadyJoined(String),

    #[error("connection has not joined a session")]
    NotJoined,

    #[error("connection is closed")]
    Closed,
}

/// Message push errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("peer '{0}' is unreachable")]
    PeerUnreachable(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Snapshot store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("snapshot store unavailable: {0}")]
    SnapshotUnavailable(String),
}
