//! UseCase layer: one use case per protocol operation.

mod broadcast_edit;
mod disconnect;
mod error;
mod get_session_members;
mod join_session;
mod load_snapshot;
mod open_connection;
mod save_snapshot;
mod sync_code;

pub use broadcast_edit::BroadcastEditUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::{JoinSessionError, RelayError, SnapshotError};
pub use get_session_members::GetSessionMembersUseCase;
pub use join_session::JoinSessionUseCase;
pub use load_snapshot::LoadSnapshotUseCase;
pub use open_connection::OpenConnectionUseCase;
pub use save_snapshot::SaveSnapshotUseCase;
pub use sync_code::SyncCodeUseCase;
