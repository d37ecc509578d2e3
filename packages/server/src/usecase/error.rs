//! UseCase error types.

use thiserror::Error;

use crate::domain::{RepositoryError, SessionError};

/// 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinSessionError {
    #[error("connection '{0}' has already joined a session")]
    AlreadyJoined(String),

    #[error("connection '{0}' is already registered")]
    DuplicateConnection(String),
}

impl From<SessionError> for JoinSessionError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::AlreadyJoined(id) => Self::AlreadyJoined(id),
            SessionError::DuplicateConnection(id) => Self::DuplicateConnection(id),
        }
    }
}

/// 編集の中継（broadcast-edit / sync-code）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("connection '{0}' is not a member of the session")]
    NotJoined(String),
}

/// スナップショット操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for SnapshotError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::SnapshotUnavailable(reason) => Self::Unavailable(reason),
        }
    }
}
