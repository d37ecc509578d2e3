//! Outbound message delivery abstraction.
//!
//! The domain only knows connection ids; how a payload reaches the socket is
//! an infrastructure concern.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::Participant, error::MessagePushError, hub::Departure, value_object::ConnectionId,
};

/// Per-connection outbound queue
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Attach the outbound queue of a freshly opened connection
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Detach a connection. Unknown connections are ignored.
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Directed send to exactly one connection.
    ///
    /// # Errors
    ///
    /// `MessagePushError::PeerUnreachable` if the connection is gone.
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Best-effort fan-out; unreachable targets are skipped.
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str);
}

/// Deliver a `joined` notice: the joiner first, then every other member once.
pub async fn announce_joined(
    pusher: &dyn MessagePusher,
    joiner: &ConnectionId,
    members: &[Participant],
    message: &str,
) {
    if let Err(e) = pusher.push_to(joiner, message).await {
        // 参加直後に切断された場合
        tracing::debug!("Could not acknowledge join of '{}': {}", joiner, e);
    }

    let peers: Vec<ConnectionId> = members
        .iter()
        .map(|p| p.connection_id)
        .filter(|id| id != joiner)
        .collect();
    pusher.broadcast(peers, message).await;
}

/// Deliver a `disconnected` notice to the remaining members of every session left
pub async fn announce_departure(pusher: &dyn MessagePusher, departure: &Departure, message: &str) {
    for (session_id, remaining) in &departure.remaining {
        tracing::debug!(
            "Notifying {} member(s) of session '{}' that '{}' left",
            remaining.len(),
            session_id,
            departure.connection_id
        );
        pusher.broadcast(remaining.clone(), message).await;
    }
}
