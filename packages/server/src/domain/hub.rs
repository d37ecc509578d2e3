//! Session hub: session id to the ordered set of joined connections.
//!
//! The hub is the only owner of session membership. A session exists only
//! while it has members; the last `leave` drops its entry.

use std::collections::HashMap;

use super::{
    entity::Participant,
    error::{RegistryError, SessionError},
    registry::ConnectionRegistry,
    value_object::{ConnectionId, DisplayName, SessionId},
};

/// Result of removing a connection from the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    /// Sessions the connection left, each with the members that remain
    pub remaining: Vec<(SessionId, Vec<ConnectionId>)>,
}

#[derive(Debug, Default)]
pub struct SessionHub {
    registry: ConnectionRegistry,
    /// Members per session, in join order
    sessions: HashMap<SessionId, Vec<ConnectionId>>,
    /// Reverse index: connection to the session it joined
    memberships: HashMap<ConnectionId, SessionId>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and add it to a session.
    ///
    /// Returns the full member list after the add, in join order, with the
    /// joiner last.
    ///
    /// # Errors
    ///
    /// * `SessionError::AlreadyJoined` - the connection is already a member of a session
    /// * `SessionError::DuplicateConnection` - the connection is already registered
    pub fn join(
        &mut self,
        session_id: SessionId,
        connection_id: ConnectionId,
        display_name: DisplayName,
    ) -> Result<Vec<Participant>, SessionError> {
        if self.memberships.contains_key(&connection_id) {
            return Err(SessionError::AlreadyJoined(connection_id.to_string()));
        }
        self.registry
            .register(connection_id, display_name)
            .map_err(|e| match e {
                RegistryError::DuplicateConnection(id) | RegistryError::NotFound(id) => {
                    SessionError::DuplicateConnection(id)
                }
            })?;

        self.sessions
            .entry(session_id.clone())
            .or_default()
            .push(connection_id);
        self.memberships.insert(connection_id, session_id.clone());

        Ok(self.participants_of(&session_id))
    }

    /// Remove a connection from every session it is recorded in.
    ///
    /// Returns the ids of the sessions it was removed from. The registry entry
    /// is left untouched.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Vec<SessionId> {
        let Some(session_id) = self.memberships.remove(connection_id) else {
            return Vec::new();
        };

        if let Some(members) = self.sessions.get_mut(&session_id) {
            members.retain(|id| id != connection_id);
            if members.is_empty() {
                self.sessions.remove(&session_id);
            }
        }

        vec![session_id]
    }

    /// Leave all sessions and drop the registry entry.
    ///
    /// Returns `None` when the connection is unknown, which makes a repeated
    /// disconnect a no-op.
    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> Option<Departure> {
        let left = self.leave(connection_id);
        let display_name = self.registry.remove(connection_id)?;

        let remaining = left
            .into_iter()
            .map(|session_id| {
                let members = self.members_of(&session_id);
                (session_id, members)
            })
            .collect();

        Some(Departure {
            connection_id: *connection_id,
            display_name,
            remaining,
        })
    }

    /// Snapshot of the current members of a session, in join order
    pub fn members_of(&self, session_id: &SessionId) -> Vec<ConnectionId> {
        self.sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// Members of a session with their display names, in join order
    pub fn participants_of(&self, session_id: &SessionId) -> Vec<Participant> {
        self.sessions
            .get(session_id)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| {
                        self.registry.lookup(id).ok().map(|name| {
                            Participant::new(*id, name.clone(), session_id.clone())
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fan-out targets for an edit: every member of `session_id` except `exclude`.
    ///
    /// Returns `None` when `exclude` is not a member of that session.
    pub fn fan_out_targets(
        &self,
        session_id: &SessionId,
        exclude: &ConnectionId,
    ) -> Option<Vec<ConnectionId>> {
        if self.memberships.get(exclude) != Some(session_id) {
            return None;
        }
        Some(
            self.members_of(session_id)
                .into_iter()
                .filter(|id| id != exclude)
                .collect(),
        )
    }

    pub fn session_of(&self, connection_id: &ConnectionId) -> Option<&SessionId> {
        self.memberships.get(connection_id)
    }
}
