//! Repository traits.
//!
//! The use case layer depends on these traits only; the infrastructure layer
//! provides the implementations.

use async_trait::async_trait;

use super::{
    entity::{DocumentSnapshot, Participant},
    error::{RepositoryError, SessionError},
    hub::Departure,
    message_pusher::MessagePusher,
    value_object::{ConnectionId, DisplayName, SessionId},
};

/// Renders the `joined` notice from the members after a join
pub type JoinedNotice<'a> = &'a (dyn Fn(&[Participant]) -> Option<String> + Send + Sync);

/// Renders the `disconnected` notice from a departure
pub type DepartureNotice<'a> = &'a (dyn Fn(&Departure) -> Option<String> + Send + Sync);

/// Access to the session hub.
///
/// Every method is one critical section over the hub. `join` and `disconnect`
/// enqueue their notices before the section ends, so every connection sees
/// membership notices in the order the hub applied them.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Register a connection, add it to a session and announce it.
    ///
    /// Returns the members after the add. The notice goes to the joiner first,
    /// then to every other member.
    async fn join(
        &self,
        session_id: SessionId,
        connection_id: ConnectionId,
        display_name: DisplayName,
        pusher: &dyn MessagePusher,
        notice: JoinedNotice<'_>,
    ) -> Result<Vec<Participant>, SessionError>;

    /// Leave and unregister a connection, announcing it to the remaining members.
    ///
    /// `None` if the connection was unknown; nothing is sent then.
    async fn disconnect(
        &self,
        connection_id: &ConnectionId,
        pusher: &dyn MessagePusher,
        notice: DepartureNotice<'_>,
    ) -> Option<Departure>;

    async fn members_of(&self, session_id: &SessionId) -> Vec<ConnectionId>;

    async fn participants_of(&self, session_id: &SessionId) -> Vec<Participant>;

    /// Members of `session_id` other than `from`; `None` if `from` is not a member
    async fn fan_out_targets(
        &self,
        session_id: &SessionId,
        from: &ConnectionId,
    ) -> Option<Vec<ConnectionId>>;

    async fn session_of(&self, connection_id: &ConnectionId) -> Option<SessionId>;
}

/// Durable snapshot store.
///
/// Calls for different sessions may run concurrently. Concurrent saves for
/// the same session are last-write-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Load the snapshot of a session, creating an empty one on first access
    async fn load_or_create(
        &self,
        session_id: &SessionId,
    ) -> Result<DocumentSnapshot, RepositoryError>;

    /// Replace the text of a session's snapshot, creating it if absent
    async fn save(
        &self,
        session_id: &SessionId,
        text: String,
    ) -> Result<DocumentSnapshot, RepositoryError>;
}
