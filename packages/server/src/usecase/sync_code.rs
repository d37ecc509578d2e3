//! UseCase: 同期（sync-code）
//!
//! 指定された一つの接続だけに、送信者のバッファ内容を code-change として届けます。
//! ハブは文書を保持しないため、新しい参加者はこの directed send によって
//! 既存の参加者のバッファを受け取ります。
//!
//! 受け取る内容は依頼先の一人のバッファと同じ鮮度でしかありません。その参加者が
//! 他の参加者の未反映の編集より遅れていれば、次の code-change が届くまで古い値に
//! 収束します（最後のブロードキャストが勝つ、結果整合のモデル）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, SessionRepository};

use super::error::RelayError;

/// 同期のユースケース
pub struct SyncCodeUseCase {
    /// Repository（セッションハブへのアクセスの抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SyncCodeUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 同期を実行
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 配信した
    /// * `Ok(false)` - 宛先が既に切断済みのため破棄した
    /// * `Err(RelayError::NotJoined)` - 送信者がどのセッションにも参加していない
    pub async fn execute(
        &self,
        from: &ConnectionId,
        target: &ConnectionId,
        message: &str,
    ) -> Result<bool, RelayError> {
        let Some(session_id) = self.repository.session_of(from).await else {
            return Err(RelayError::NotJoined(from.to_string()));
        };

        match self.message_pusher.push_to(target, message).await {
            Ok(()) => {
                tracing::debug!(
                    "Synced buffer from '{}' to '{}' in session '{}'",
                    from,
                    target,
                    session_id
                );
                Ok(true)
            }
            Err(MessagePushError::PeerUnreachable(_)) => {
                tracing::debug!("Sync target '{}' is gone, dropping", target);
                Ok(false)
            }
            Err(e) => {
                tracing::warn!("Failed to sync to '{}': {}", target, e);
                Ok(false)
            }
        }
    }
}
