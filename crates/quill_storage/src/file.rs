use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use quill_model::{ConnectionId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::trace;

use crate::{
    ConnectionStore,
    error::{Error, Result},
    value::{read_json, write_json},
};

/// The on-disk shape of the connections file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Connections {
    #[serde(default)]
    connections: BTreeMap<UserId, ConnectionId>,
}

/// A connection store backed by a single JSON file.
///
/// Writes go through a temporary file and a rename, so a concurrent read sees
/// either the old or the new connection of a user, never a torn file.
#[derive(Debug, Clone)]
pub struct FileConnectionStore {
    path: Utf8PathBuf,

    /// Serializes read-modify-write cycles within this process.
    write_lock: Arc<Mutex<()>>,
}

impl FileConnectionStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Result<Self> {
        let path: Utf8PathBuf = path.into();
        if path.exists() && !path.is_file() {
            return Err(Error::NotFile(path));
        }

        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn load(path: &Utf8Path) -> Result<Connections> {
    if !path.exists() {
        return Ok(Connections::default());
    }

    read_json(path)
}

#[async_trait]
impl ConnectionStore for FileConnectionStore {
    async fn get_connection_id(&self, user: &UserId) -> Result<Option<ConnectionId>> {
        let path = self.path.clone();
        let user = user.clone();

        tokio::task::spawn_blocking(move || {
            let mut connections = load(&path)?.connections;
            Ok(connections.remove(&user))
        })
        .await?
    }

    async fn set_connection_id(&self, user: &UserId, connection: ConnectionId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        let user = user.clone();

        trace!(%path, %user, "Storing connection.");
        tokio::task::spawn_blocking(move || {
            let mut data = load(&path)?;
            data.connections.insert(user, connection);
            write_json(&path, &data)
        })
        .await?
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
