//! Per-connection protocol state.
//!
//! ```text
//! Unjoined --join--> Joined(session) --close--> Closed
//!     \________________close_______________________/^
//! ```
//!
//! A joined connection never moves to another session.

use super::{error::ProtocolViolation, value_object::SessionId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Unjoined,
    Joined(SessionId),
    Closed,
}

impl ConnectionState {
    /// Check that a `join` is acceptable in the current state
    pub fn ensure_can_join(&self) -> Result<(), ProtocolViolation> {
        match self {
            Self::Unjoined => Ok(()),
            Self::Joined(session_id) => {
                Err(ProtocolViolation::AlreadyJoined(session_id.to_string()))
            }
            Self::Closed => Err(ProtocolViolation::Closed),
        }
    }

    /// Transition `Unjoined -> Joined`
    pub fn join(&mut self, session_id: SessionId) -> Result<(), ProtocolViolation> {
        self.ensure_can_join()?;
        *self = Self::Joined(session_id);
        Ok(())
    }

    /// The joined session, required for `code-change` and `sync-code`
    pub fn joined_session(&self) -> Result<&SessionId, ProtocolViolation> {
        match self {
            Self::Joined(session_id) => Ok(session_id),
            Self::Unjoined => Err(ProtocolViolation::NotJoined),
            Self::Closed => Err(ProtocolViolation::Closed),
        }
    }

    /// Transition to `Closed`. Returns `false` if the connection was already closed.
    pub fn close(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        *self = Self::Closed;
        true
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
