//! UseCase: 編集のブロードキャスト（code-change）
//!
//! 送信者を除くセッションの全メンバーに文書全体のテキストを配信します。
//! 送信者自身には送り返しません（エコーによるフィードバックループを防ぐため）。
//! 配信はベストエフォートで、確認応答や再送はありません。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, SessionId, SessionRepository};

use super::error::RelayError;

/// 編集ブロードキャストのユースケース
pub struct BroadcastEditUseCase {
    /// Repository（セッションハブへのアクセスの抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastEditUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ブロードキャストを実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 配信対象（送信者を除くメンバー）
    /// * `Err(RelayError::NotJoined)` - 送信者が `session_id` のメンバーではない
    pub async fn execute(
        &self,
        from: &ConnectionId,
        session_id: &SessionId,
        message: &str,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let targets = self
            .repository
            .fan_out_targets(session_id, from)
            .await
            .ok_or_else(|| RelayError::NotJoined(from.to_string()))?;

        tracing::debug!(
            "Relaying edit from '{}' to {} peer(s) in session '{}'",
            from,
            targets.len(),
            session_id
        );
        self.message_pusher
            .broadcast(targets.clone(), message)
            .await;

        Ok(targets)
    }
}
