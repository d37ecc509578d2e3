//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - 接続へのメッセージ送信（push_to, broadcast）
//!
//! WebSocket 自体は UI 層（`ui/handler/websocket.rs`）が所有し、送信キューから
//! 読み出してソケットに書き込みます。ここではキューへの投入だけを行うため、
//! 送信が他の参加者を待つことはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::PeerUnreachable(connection_id.to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|_| MessagePushError::PeerUnreachable(connection_id.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                Some(sender) => {
                    // 切断直後の接続への送信失敗は許容する
                    if sender.send(content.to_string()).is_err() {
                        tracing::debug!("Connection '{}' already closed, dropping message", target);
                    } else {
                        tracing::debug!("Broadcasted message to connection '{}'", target);
                    }
                }
                None => {
                    tracing::debug!(
                        "Connection '{}' not found during broadcast, skipping",
                        target
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone());
        (pusher, clients)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        pusher.register_client(alice, tx).await;

        // when (操作):
        let result = pusher.push_to(&alice, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_connection() {
        // テスト項目: 存在しない接続への送信は PeerUnreachable を返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let ghost = ConnectionId::generate();

        // when (操作):
        let result = pusher.push_to(&ghost, "Hello").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::PeerUnreachable(ghost.to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_receiver() {
        // テスト項目: 受信側が閉じた接続への送信も PeerUnreachable になる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, rx) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        pusher.register_client(alice, tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&alice, "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PeerUnreachable(_))));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_targets() {
        // テスト項目: 複数の接続にメッセージをブロードキャストできる
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        {
            let mut clients_lock = clients.lock().await;
            clients_lock.insert(alice, tx1);
            clients_lock.insert(bob, tx2);
        }

        // when (操作):
        pusher.broadcast(vec![alice, bob], "Broadcast message").await;

        // then (期待する結果):
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_skips_unregistered_targets() {
        // テスト項目: 登録解除済みの接続はブロードキャストでスキップされる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        pusher.register_client(alice, tx1).await;
        pusher.register_client(bob, tx2).await;
        pusher.unregister_client(&bob).await;

        // when (操作):
        pusher.broadcast(vec![alice, bob], "Broadcast message").await;

        // then (期待する結果):
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        // bob's sender was dropped on unregister, so the channel is closed and empty
        assert_eq!(rx2.recv().await, None);
    }
}
