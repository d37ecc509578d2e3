//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::SessionId,
    infrastructure::dto::{
        http::{ErrorDto, SaveSnapshotRequest, SavedSnapshotDto, SessionMembersDto, SnapshotTextDto},
        websocket::MemberInfo,
    },
    ui::state::AppState,
    usecase::SnapshotError,
};

type ApiError = (StatusCode, Json<ErrorDto>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorDto {
            error: error.to_string(),
        }),
    )
}

fn parse_session_id(raw: String) -> Result<SessionId, ApiError> {
    SessionId::new(raw).map_err(|e| {
        tracing::warn!("Invalid session id: {}", e);
        api_error(StatusCode::BAD_REQUEST, e)
    })
}

fn snapshot_error(error: SnapshotError) -> ApiError {
    match error {
        SnapshotError::Unavailable(_) => api_error(StatusCode::INTERNAL_SERVER_ERROR, error),
    }
}

/// Load the snapshot of a session (created empty on first access)
pub async fn load_snapshot(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SnapshotTextDto>, ApiError> {
    let session_id = parse_session_id(session_id)?;
    let snapshot = state
        .load_snapshot_usecase
        .execute(&session_id)
        .await
        .map_err(snapshot_error)?;

    // Domain Model から DTO への変換
    Ok(Json(snapshot.into()))
}

/// Save the text of a session
pub async fn save_snapshot(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<SaveSnapshotRequest>,
) -> Result<Json<SavedSnapshotDto>, ApiError> {
    let session_id = parse_session_id(session_id)?;
    let snapshot = state
        .save_snapshot_usecase
        .execute(&session_id, request.text)
        .await
        .map_err(snapshot_error)?;

    Ok(Json(snapshot.into()))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current members of a session in join order
pub async fn get_session_members(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionMembersDto>, ApiError> {
    let session_id = parse_session_id(session_id)?;
    let members = state
        .get_session_members_usecase
        .execute(&session_id)
        .await;

    Ok(Json(SessionMembersDto {
        session_id: session_id.into_string(),
        members: members.into_iter().map(MemberInfo::from).collect(),
    }))
}
