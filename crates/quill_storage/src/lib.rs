//! Storage for the connection between a user and the model router.
//!
//! The core only ever needs the *current* connection of a user. Implementations
//! must make a read of that value atomic with respect to concurrent writes from
//! the connect flow.

pub mod error;
mod file;
mod memory;
mod value;

use async_trait::async_trait;
use quill_model::{ConnectionId, UserId};

pub use crate::{error::Error, file::FileConnectionStore, memory::MemoryConnectionStore};

/// The connection store collaborator.
#[async_trait]
pub trait ConnectionStore: std::fmt::Debug + Send + Sync {
    /// Get the current connection of a user, if any.
    ///
    /// `Ok(None)` means the user never connected (or disconnected). An `Err`
    /// means the store itself failed, and must not be read as "no connection".
    async fn get_connection_id(&self, user: &UserId) -> Result<Option<ConnectionId>, Error>;

    /// Replace the current connection of a user.
    async fn set_connection_id(&self, user: &UserId, connection: ConnectionId)
    -> Result<(), Error>;
}
