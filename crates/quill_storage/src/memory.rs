use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::RwLock;
use quill_model::{ConnectionId, UserId};
use tracing::trace;

use crate::{ConnectionStore, error::Result};

/// An in-process connection store.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnectionStore {
    connections: Arc<RwLock<HashMap<UserId, ConnectionId>>>,
}

impl MemoryConnectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a connection for a user.
    #[must_use]
    pub fn with_connection(self, user: impl Into<UserId>, connection: impl Into<ConnectionId>) -> Self {
        self.connections.write().insert(user.into(), connection.into());
        self
    }

    /// Remove the connection of a user, as if they revoked it.
    pub fn revoke(&self, user: &UserId) -> Option<ConnectionId> {
        self.connections.write().remove(user)
    }
}

#[async_trait]
impl ConnectionStore for MemoryConnectionStore {
    async fn get_connection_id(&self, user: &UserId) -> Result<Option<ConnectionId>> {
        Ok(self.connections.read().get(user).cloned())
    }

    async fn set_connection_id(&self, user: &UserId, connection: ConnectionId) -> Result<()> {
        trace!(%user, "Storing connection.");
        self.connections.write().insert(user.clone(), connection);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
