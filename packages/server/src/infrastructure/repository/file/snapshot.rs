//! File-backed Snapshot Repository 実装
//!
//! セッションごとに一つの JSON ファイルを保存します。ファイル名は短い ID なら
//! `<hex(session id)>.json`、長い ID なら `h-<sha256(session id)>.json` です。
//! 書き込みは一時ファイルへ書いてから rename するため、読み手が書きかけの
//! ファイルを見ることはありません。

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sharepad_shared::time::{Clock, SystemClock};
use tokio::fs;
use uuid::Uuid;

use crate::domain::{DocumentSnapshot, RepositoryError, SessionId, SnapshotRepository, Timestamp};

/// On-disk record
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnapshot {
    session_id: String,
    text: String,
    saved_at: i64,
}

impl From<&DocumentSnapshot> for StoredSnapshot {
    fn from(snapshot: &DocumentSnapshot) -> Self {
        Self {
            session_id: snapshot.session_id.as_str().to_string(),
            text: snapshot.text.clone(),
            saved_at: snapshot.saved_at.value(),
        }
    }
}

pub struct FileSnapshotRepository {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileSnapshotRepository {
    pub fn new(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    pub fn with_system_clock(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Arc::new(SystemClock))
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    fn file_path(&self, session_id: &SessionId) -> PathBuf {
        self.root.join(file_name(session_id))
    }

    async fn read(&self, session_id: &SessionId) -> Result<Option<DocumentSnapshot>, RepositoryError> {
        let path = self.file_path(session_id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(unavailable(&path, e)),
        };
        let stored: StoredSnapshot =
            serde_json::from_slice(&bytes).map_err(|e| unavailable(&path, e))?;
        Ok(Some(DocumentSnapshot {
            session_id: session_id.clone(),
            text: stored.text,
            saved_at: Timestamp::new(stored.saved_at),
        }))
    }

    async fn write(&self, snapshot: &DocumentSnapshot) -> Result<(), RepositoryError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| unavailable(&self.root, e))?;

        let path = self.file_path(&snapshot.session_id);
        let tmp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        let bytes = serde_json::to_vec(&StoredSnapshot::from(snapshot))
            .map_err(|e| unavailable(&path, e))?;

        fs::write(&tmp_path, bytes)
            .await
            .map_err(|e| unavailable(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(unavailable(&path, e));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for FileSnapshotRepository {
    async fn load_or_create(
        &self,
        session_id: &SessionId,
    ) -> Result<DocumentSnapshot, RepositoryError> {
        if let Some(snapshot) = self.read(session_id).await? {
            return Ok(snapshot);
        }
        let snapshot = DocumentSnapshot::empty(session_id.clone(), self.now());
        self.write(&snapshot).await?;
        tracing::debug!("Created empty snapshot for session '{}'", session_id);
        Ok(snapshot)
    }

    async fn save(
        &self,
        session_id: &SessionId,
        text: String,
    ) -> Result<DocumentSnapshot, RepositoryError> {
        let now = self.now();
        let revised = match self.read(session_id).await? {
            Some(current) => current.revise(text, now),
            None => DocumentSnapshot {
                session_id: session_id.clone(),
                text,
                saved_at: now,
            },
        };
        self.write(&revised).await?;
        tracing::debug!(
            "Saved snapshot of session '{}' to {}",
            session_id,
            self.file_path(session_id).display()
        );
        Ok(revised)
    }
}

/// Longest session id (in bytes) stored under its hex encoding
const MAX_HEX_NAME_BYTES: usize = 100;

/// Session ids are caller-chosen and unbounded, so they never appear in the path
/// as-is. Short ids are hex-encoded; longer ones use a SHA-256 digest so the
/// name stays within file system limits. The `h-` prefix cannot occur in hex.
fn file_name(session_id: &SessionId) -> String {
    let bytes = session_id.as_str().as_bytes();
    if bytes.len() <= MAX_HEX_NAME_BYTES {
        format!("{}.json", hex(bytes))
    } else {
        format!("h-{}.json", hex(&Sha256::digest(bytes)))
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn unavailable(path: &Path, error: impl std::fmt::Display) -> RepositoryError {
    tracing::error!("Snapshot store failure at {}: {}", path.display(), error);
    RepositoryError::SnapshotUnavailable(format!("{}: {}", path.display(), error))
}
