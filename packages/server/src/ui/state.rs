//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::{MessagePusher, SessionRepository, SnapshotRepository},
    usecase::{
        BroadcastEditUseCase, DisconnectUseCase, GetSessionMembersUseCase, JoinSessionUseCase,
        LoadSnapshotUseCase, OpenConnectionUseCase, SaveSnapshotUseCase, SyncCodeUseCase,
    },
};

/// Use cases shared by every handler
pub struct AppState {
    /// OpenConnectionUseCase（接続開始のユースケース）
    pub open_connection_usecase: Arc<OpenConnectionUseCase>,
    /// JoinSessionUseCase（セッション参加のユースケース）
    pub join_session_usecase: Arc<JoinSessionUseCase>,
    /// BroadcastEditUseCase（編集の配信のユースケース）
    pub broadcast_edit_usecase: Arc<BroadcastEditUseCase>,
    /// SyncCodeUseCase（新規参加者への同期のユースケース）
    pub sync_code_usecase: Arc<SyncCodeUseCase>,
    /// DisconnectUseCase（切断のユースケース）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// LoadSnapshotUseCase（スナップショット読み込みのユースケース）
    pub load_snapshot_usecase: Arc<LoadSnapshotUseCase>,
    /// SaveSnapshotUseCase（スナップショット保存のユースケース）
    pub save_snapshot_usecase: Arc<SaveSnapshotUseCase>,
    /// GetSessionMembersUseCase（メンバー取得のユースケース）
    pub get_session_members_usecase: Arc<GetSessionMembersUseCase>,
}

impl AppState {
    /// Wire every use case to the given repositories and pusher
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        snapshot_repository: Arc<dyn SnapshotRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            open_connection_usecase: Arc::new(OpenConnectionUseCase::new(message_pusher.clone())),
            join_session_usecase: Arc::new(JoinSessionUseCase::new(
                session_repository.clone(),
                message_pusher.clone(),
            )),
            broadcast_edit_usecase: Arc::new(BroadcastEditUseCase::new(
                session_repository.clone(),
                message_pusher.clone(),
            )),
            sync_code_usecase: Arc::new(SyncCodeUseCase::new(
                session_repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_usecase: Arc::new(DisconnectUseCase::new(
                session_repository.clone(),
                message_pusher,
            )),
            load_snapshot_usecase: Arc::new(LoadSnapshotUseCase::new(snapshot_repository.clone())),
            save_snapshot_usecase: Arc::new(SaveSnapshotUseCase::new(snapshot_repository)),
            get_session_members_usecase: Arc::new(GetSessionMembersUseCase::new(
                session_repository,
            )),
        }
    }
}
