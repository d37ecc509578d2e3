//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::MemberInfo;

/// `GET /session/{id}` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotTextDto {
    pub text: String,
}

/// `POST /session/{id}/save` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSnapshotRequest {
    pub text: String,
}

/// `POST /session/{id}/save` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSnapshotDto {
    pub text: String,
    /// RFC 3339, UTC
    pub saved_at: String,
}

/// `GET /api/sessions/{id}/members` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMembersDto {
    pub session_id: String,
    pub members: Vec<MemberInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
