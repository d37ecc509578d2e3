//! UseCase: セッションへの参加（join）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinSessionUseCase::execute()
//! - 参加処理（二重参加の拒否、メンバーリストの構築、joined 通知の配信）
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のセッションへの参加、既存メンバーがいるセッションへの参加
//! - 異常系：参加済みの接続による二回目の join
//! - エッジケース：同じ表示名での参加（許可される）
//! - 並行性：参加と切断が競合しても、通知を順に適用した結果がハブと一致する

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DisplayName, JoinedNotice, MessagePusher, Participant, SessionId,
    SessionRepository,
};

use super::error::JoinSessionError;

/// セッション参加のユースケース
pub struct JoinSessionUseCase {
    /// Repository（セッションハブへのアクセスの抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinSessionUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加を実行し、joined 通知を配信
    ///
    /// 通知はハブのロックを保持したまま送信キューに積まれます。参加者本人には
    /// 確認として、既存メンバーにはそれぞれ一度だけ同じメッセージが届きます。
    ///
    /// # Arguments
    ///
    /// * `notice` - 参加直後のメンバーリストから joined メッセージ（JSON）を組み立てる
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Participant>)` - 参加後の全メンバー（参加順、自分を含む）
    /// * `Err(JoinSessionError)` - 参加済みの接続による join
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        session_id: SessionId,
        display_name: DisplayName,
        notice: JoinedNotice<'_>,
    ) -> Result<Vec<Participant>, JoinSessionError> {
        let members = self
            .repository
            .join(
                session_id.clone(),
                connection_id,
                display_name,
                self.message_pusher.as_ref(),
                notice,
            )
            .await?;

        tracing::info!(
            "Connection '{}' joined session '{}' ({} member(s))",
            connection_id,
            session_id,
            members.len()
        );

        Ok(members)
    }
}
