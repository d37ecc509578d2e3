//! UseCase: スナップショットの読み込み（loadOrCreate）

use std::sync::Arc;

use crate::domain::{DocumentSnapshot, SessionId, SnapshotRepository};

use super::error::SnapshotError;

/// スナップショット読み込みのユースケース
pub struct LoadSnapshotUseCase {
    /// Repository（スナップショットストアの抽象化）
    repository: Arc<dyn SnapshotRepository>,
}

impl LoadSnapshotUseCase {
    pub fn new(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self { repository }
    }

    /// Load the snapshot, creating an empty one on first access.
    ///
    /// Store failures are reported as `SnapshotError::Unavailable` and never retried.
    pub async fn execute(&self, session_id: &SessionId) -> Result<DocumentSnapshot, SnapshotError> {
        self.repository
            .load_or_create(session_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load snapshot of session '{}': {}", session_id, e);
                SnapshotError::from(e)
            })
    }
}
