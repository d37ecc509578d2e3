//! InMemory Snapshot Repository 実装
//!
//! HashMap をインメモリ DB として使用します。プロセス終了時に内容は失われます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use sharepad_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{DocumentSnapshot, RepositoryError, SessionId, SnapshotRepository, Timestamp};

/// インメモリ Snapshot Repository 実装
pub struct InMemorySnapshotRepository {
    snapshots: Mutex<HashMap<SessionId, DocumentSnapshot>>,
    /// 時刻取得（テスト時は FixedClock を注入）
    clock: Arc<dyn Clock>,
}

impl InMemorySnapshotRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            snapshots: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

impl Default for InMemorySnapshotRepository {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn load_or_create(
        &self,
        session_id: &SessionId,
    ) -> Result<DocumentSnapshot, RepositoryError> {
        let now = self.now();
        let mut snapshots = self.snapshots.lock().await;
        let snapshot = snapshots
            .entry(session_id.clone())
            .or_insert_with(|| DocumentSnapshot::empty(session_id.clone(), now));
        Ok(snapshot.clone())
    }

    async fn save(
        &self,
        session_id: &SessionId,
        text: String,
    ) -> Result<DocumentSnapshot, RepositoryError> {
        let now = self.now();
        let mut snapshots = self.snapshots.lock().await;
        let revised = match snapshots.get(session_id) {
            Some(current) => current.revise(text, now),
            None => DocumentSnapshot {
                session_id: session_id.clone(),
                text,
                saved_at: now,
            },
        };
        snapshots.insert(session_id.clone(), revised.clone());
        tracing::debug!(
            "Saved snapshot of session '{}' ({} bytes)",
            session_id,
            revised.text.len()
        );
        Ok(revised)
    }
}
