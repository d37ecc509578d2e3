//! UseCase: スナップショットの保存（save）
//!
//! 保存はユーザー操作によるもので頻度が低く、リアルタイム経路には乗りません。
//! 同じセッションへの並行した保存は後勝ちです。

use std::sync::Arc;

use crate::domain::{DocumentSnapshot, SessionId, SnapshotRepository};

use super::error::SnapshotError;

/// スナップショット保存のユースケース
pub struct SaveSnapshotUseCase {
    /// Repository（スナップショットストアの抽象化）
    repository: Arc<dyn SnapshotRepository>,
}

impl SaveSnapshotUseCase {
    pub fn new(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        session_id: &SessionId,
        text: String,
    ) -> Result<DocumentSnapshot, SnapshotError> {
        let snapshot = self.repository.save(session_id, text).await.map_err(|e| {
            tracing::error!("Failed to save snapshot of session '{}': {}", session_id, e);
            SnapshotError::from(e)
        })?;

        tracing::info!(
            "Saved snapshot of session '{}' ({} bytes)",
            session_id,
            snapshot.text.len()
        );
        Ok(snapshot)
    }
}
