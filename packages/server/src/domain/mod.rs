//! Domain layer: value objects, entities, the in-memory session models and
//! the traits implemented by the infrastructure layer.

pub mod connection_state;
pub mod entity;
pub mod error;
pub mod hub;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use connection_state::ConnectionState;
pub use entity::{DocumentSnapshot, Participant};
pub use error::{
    MessagePushError, ProtocolViolation, RegistryError, RepositoryError, SessionError,
    ValueObjectError,
};
pub use hub::{Departure, SessionHub};
pub use message_pusher::{MessagePusher, PusherChannel, announce_departure, announce_joined};
pub use registry::ConnectionRegistry;
pub use repository::{DepartureNotice, JoinedNotice, SessionRepository, SnapshotRepository};
pub use value_object::{ConnectionId, DisplayName, SessionId, Timestamp};
