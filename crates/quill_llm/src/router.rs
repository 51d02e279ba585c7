//! The provider-routing collaborator.

use async_trait::async_trait;
use quill_model::{ConnectionId, ModelId, ProviderId};
use serde::Serialize;

use crate::{error::Result, model::ModelHandle};

/// Builds routers scoped to a single user connection.
#[async_trait]
pub trait RouterFactory: std::fmt::Debug + Send + Sync {
    async fn connect(&self, connection: ConnectionId) -> Result<Box<dyn Router>>;
}

/// A router scoped to a single user connection.
#[async_trait]
pub trait Router: std::fmt::Debug + Send + Sync {
    /// Get a handle for the model with the given ID.
    ///
    /// Whether the model exists is only discovered once the handle is used.
    async fn resolve_model(&self, id: &ModelId) -> Result<ModelHandle>;

    /// The providers the connection holds credentials for.
    async fn list_providers(&self) -> Result<Vec<ProviderInfo>>;

    /// The models reachable through the connection.
    async fn list_models(&self, provider: Option<&ProviderId>) -> Result<Vec<ModelInfo>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub provider: ProviderId,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: ModelId,
    pub name: String,
}
