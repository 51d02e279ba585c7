use std::sync::Arc;

use quill_model::{ConnectionId, UserId};
use quill_storage::ConnectionStore;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Resolves the router connection a user is authorized through.
///
/// Every call is a fresh lookup, so a revoked connection stops working on the
/// very next request.
#[derive(Debug, Clone)]
pub struct ConnectionAuthorizer {
    store: Arc<dyn ConnectionStore>,
}

impl ConnectionAuthorizer {
    #[must_use]
    pub fn new(store: Arc<dyn ConnectionStore>) -> Self {
        Self { store }
    }

    /// Get the current connection of `user`.
    ///
    /// Fails with [`Error::Unauthorized`] without a user, and with
    /// [`Error::Forbidden`] if the user has no connection. A failing store is
    /// reported as [`Error::Storage`].
    pub async fn resolve(&self, user: Option<&UserId>) -> Result<ConnectionId> {
        let user = user.ok_or(Error::Unauthorized)?;

        trace!(%user, "Looking up connection.");
        match self.store.get_connection_id(user).await? {
            Some(connection) => Ok(connection),
            None => {
                debug!(%user, "User has no active connection.");
                Err(Error::Forbidden(user.clone()))
            }
        }
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
