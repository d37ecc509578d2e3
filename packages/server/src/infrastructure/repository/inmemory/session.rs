//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! SessionHub ドメインモデルを単一の Mutex で保護します。
//! join/disconnect の通知はロックを保持したまま送信キューに積むため、
//! 各接続はメンバー変更の通知をハブが適用した順に受け取ります。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Departure, DepartureNotice, DisplayName, JoinedNotice, MessagePusher,
    Participant, SessionError, SessionHub, SessionId, SessionRepository, announce_departure,
    announce_joined,
};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    /// SessionHub ドメインモデル
    hub: Arc<Mutex<SessionHub>>,
}

impl InMemorySessionRepository {
    pub fn new(hub: Arc<Mutex<SessionHub>>) -> Self {
        Self { hub }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(SessionHub::new())))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn join(
        &self,
        session_id: SessionId,
        connection_id: ConnectionId,
        display_name: DisplayName,
        pusher: &dyn MessagePusher,
        notice: JoinedNotice<'_>,
    ) -> Result<Vec<Participant>, SessionError> {
        let mut hub = self.hub.lock().await;
        let members = hub.join(session_id, connection_id, display_name)?;
        if let Some(message) = notice(&members) {
            announce_joined(pusher, &connection_id, &members, &message).await;
        }
        Ok(members)
    }

    async fn disconnect(
        &self,
        connection_id: &ConnectionId,
        pusher: &dyn MessagePusher,
        notice: DepartureNotice<'_>,
    ) -> Option<Departure> {
        let mut hub = self.hub.lock().await;
        let departure = hub.disconnect(connection_id)?;
        if let Some(message) = notice(&departure) {
            announce_departure(pusher, &departure, &message).await;
        }
        Some(departure)
    }

    async fn members_of(&self, session_id: &SessionId) -> Vec<ConnectionId> {
        let hub = self.hub.lock().await;
        hub.members_of(session_id)
    }

    async fn participants_of(&self, session_id: &SessionId) -> Vec<Participant> {
        let hub = self.hub.lock().await;
        hub.participants_of(session_id)
    }

    async fn fan_out_targets(
        &self,
        session_id: &SessionId,
        from: &ConnectionId,
    ) -> Option<Vec<ConnectionId>> {
        let hub = self.hub.lock().await;
        hub.fan_out_targets(session_id, from)
    }

    async fn session_of(&self, connection_id: &ConnectionId) -> Option<SessionId> {
        let hub = self.hub.lock().await;
        hub.session_of(connection_id).cloned()
    }
}
