//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `"type"` with kebab-case type names
//! and camelCase fields.

use serde::{Deserialize, Serialize};

/// Messages sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Join {
        session_id: String,
        display_name: String,
    },
    CodeChange {
        session_id: String,
        text: String,
    },
    SyncCode {
        target_connection_id: String,
        text: String,
    },
}

/// Messages sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Roster after a join; the joiner's name and id identify who arrived
    Joined {
        members: Vec<MemberInfo>,
        display_name: String,
        connection_id: String,
    },
    CodeChange {
        text: String,
    },
    Disconnected {
        connection_id: String,
        display_name: String,
    },
    /// Protocol violation, sent to the offending connection only
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub connection_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    AlreadyJoined,
    NotJoined,
    InvalidMessage,
}
