//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute()
//! - 切断処理（セッションからの離脱、レジストリからの削除、disconnected 通知）
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と残りのメンバーへの通知
//! - エッジケース：最後の参加者の切断（通知対象なし）、未参加の接続の切断
//! - 冪等性：二回目の切断では通知しない

use std::sync::Arc;

use crate::domain::{ConnectionId, Departure, DepartureNotice, MessagePusher, SessionRepository};

/// 切断のユースケース
pub struct DisconnectUseCase {
    /// Repository（セッションハブへのアクセスの抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行し、disconnected 通知を残りのメンバーに配信
    ///
    /// 送信キューの登録を解除してから、接続をセッションとレジストリから取り除きます。
    /// 通知はハブのロックを保持したまま送信キューに積まれます。
    ///
    /// # Arguments
    ///
    /// * `notice` - 離脱情報から disconnected メッセージ（JSON）を組み立てる
    ///
    /// # Returns
    ///
    /// * `Some(Departure)` - 離脱したセッションと残りのメンバー
    /// * `None` - 未参加、または切断済みの接続（通知は送らない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        notice: DepartureNotice<'_>,
    ) -> Option<Departure> {
        self.message_pusher.unregister_client(connection_id).await;

        let departure = self
            .repository
            .disconnect(connection_id, self.message_pusher.as_ref(), notice)
            .await;
        match &departure {
            Some(departure) => tracing::info!(
                "Connection '{}' ({}) left {} session(s)",
                connection_id,
                departure.display_name,
                departure.remaining.len()
            ),
            None => tracing::debug!(
                "Connection '{}' closed without an active session",
                connection_id
            ),
        }
        departure
    }
}
