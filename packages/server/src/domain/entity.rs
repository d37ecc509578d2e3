//! Domain entities.

use super::value_object::{ConnectionId, DisplayName, SessionId, Timestamp};

/// One joined connection, as seen by the session hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub session_id: SessionId,
}

impl Participant {
    pub fn new(
        connection_id: ConnectionId,
        display_name: DisplayName,
        session_id: SessionId,
    ) -> Self {
        Self {
            connection_id,
            display_name,
            session_id,
        }
    }
}

/// Durable copy of a session's document text.
///
/// Distinct from the live text held in connected editors; the two may diverge
/// between saves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub session_id: SessionId,
    pub text: String,
    pub saved_at: Timestamp,
}

impl DocumentSnapshot {
    /// Empty snapshot created on first access of a session
    pub fn empty(session_id: SessionId, now: Timestamp) -> Self {
        Self {
            session_id,
            text: String::new(),
            saved_at: now,
        }
    }

    /// Replace the text, advancing `saved_at`.
    ///
    /// `saved_at` strictly increases even when `now` does not.
    pub fn revise(&self, text: String, now: Timestamp) -> Self {
        let saved_at = if now > self.saved_at {
            now
        } else {
            Timestamp::new(self.saved_at.value() + 1)
        };
        Self {
            session_id: self.session_id.clone(),
            text,
            saved_at,
        }
    }
}
