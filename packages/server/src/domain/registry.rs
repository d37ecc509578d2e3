//! Connection registry: connection id to announced display name.
//!
//! Pure in-memory state. Entries are independent of each other, so no
//! ordering is kept.

use std::collections::HashMap;

use super::{
    error::RegistryError,
    value_object::{ConnectionId, DisplayName},
};

#[derive(Debug, Default, Clone)]
pub struct ConnectionRegistry {
    entries: HashMap<ConnectionId, DisplayName>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a connection and its display name.
    ///
    /// # Errors
    ///
    /// `RegistryError::DuplicateConnection` if the connection is already present.
    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        display_name: DisplayName,
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(&connection_id) {
            return Err(RegistryError::DuplicateConnection(connection_id.to_string()));
        }
        self.entries.insert(connection_id, display_name);
        Ok(())
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Result<&DisplayName, RegistryError> {
        self.entries
            .get(connection_id)
            .ok_or_else(|| RegistryError::NotFound(connection_id.to_string()))
    }

    /// Remove a connection. Removing an unknown connection is a no-op.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<DisplayName> {
        self.entries.remove(connection_id)
    }
}
