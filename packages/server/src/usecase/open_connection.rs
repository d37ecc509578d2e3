//! UseCase: 接続の開始
//!
//! WebSocket のアップグレード直後に呼ばれ、接続の送信キューを MessagePusher に
//! 登録します。この時点では接続は Unjoined で、セッションには属していません。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// 接続開始のユースケース
pub struct OpenConnectionUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl OpenConnectionUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Assign a fresh connection id and attach its outbound queue
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        connection_id
    }
}
