//! Conversion logic between DTOs and domain entities.

use sharepad_shared::time::millis_to_rfc3339;

use crate::domain::{DocumentSnapshot, Participant, ProtocolViolation, ValueObjectError};
use crate::infrastructure::dto::{
    http::{SavedSnapshotDto, SnapshotTextDto},
    websocket::{ErrorCode, MemberInfo, ServerMessage},
};
use crate::usecase::{JoinSessionError, RelayError};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Participant> for MemberInfo {
    fn from(participant: Participant) -> Self {
        Self {
            connection_id: participant.connection_id.to_string(),
            display_name: participant.display_name.into_string(),
        }
    }
}

impl From<DocumentSnapshot> for SnapshotTextDto {
    fn from(snapshot: DocumentSnapshot) -> Self {
        Self {
            text: snapshot.text,
        }
    }
}

impl From<DocumentSnapshot> for SavedSnapshotDto {
    fn from(snapshot: DocumentSnapshot) -> Self {
        Self {
            saved_at: millis_to_rfc3339(snapshot.saved_at.value()),
            text: snapshot.text,
        }
    }
}

// ========================================
// Domain Error → DTO
// ========================================

impl From<ProtocolViolation> for ServerMessage {
    fn from(violation: ProtocolViolation) -> Self {
        let code = match violation {
            ProtocolViolation::AlreadyJoined(_) => ErrorCode::AlreadyJoined,
            ProtocolViolation::NotJoined | ProtocolViolation::Closed => ErrorCode::NotJoined,
        };
        Self::Error {
            code,
            message: violation.to_string(),
        }
    }
}

impl From<ValueObjectError> for ServerMessage {
    fn from(error: ValueObjectError) -> Self {
        Self::Error {
            code: ErrorCode::InvalidMessage,
            message: error.to_string(),
        }
    }
}

// ========================================
// UseCase Error → DTO
// ========================================

impl From<JoinSessionError> for ServerMessage {
    fn from(error: JoinSessionError) -> Self {
        // どちらも「この接続は既に参加している」ことを意味する
        Self::Error {
            code: ErrorCode::AlreadyJoined,
            message: error.to_string(),
        }
    }
}

impl From<RelayError> for ServerMessage {
    fn from(error: RelayError) -> Self {
        match error {
            RelayError::NotJoined(_) => Self::Error {
                code: ErrorCode::NotJoined,
                message: error.to_string(),
            },
        }
    }
}
