//! Turning a session and a model ID into a model handle.
//!
//! Two strategies exist, chosen once when the process starts:
//!
//! - [`RoutedResolver`] authorizes the session's user and asks the router for
//!   the model, on every request.
//! - [`RegistryResolver`] looks models up in a fixed in-process registry and
//!   never touches the connection store or the router.

use std::{
    collections::BTreeMap,
    sync::{Arc, OnceLock},
};

use async_trait::async_trait;
use quill_config::{AppConfig, Mode};
use quill_model::{ModelId, ProviderId, Session};
use quill_storage::ConnectionStore;
use tracing::{debug, info, trace};

use crate::{
    auth::ConnectionAuthorizer,
    error::{Error, Result},
    model::ModelHandle,
    provider::{mock::test_registry, routed::RoutedFactory},
    registry::ModelRegistry,
    router::{ModelInfo, ProviderInfo, Router, RouterFactory},
};

#[async_trait]
pub trait ModelResolver: std::fmt::Debug + Send + Sync {
    /// Resolve a syntactically valid model ID for `session`.
    async fn resolve(&self, session: &Session, id: &ModelId) -> Result<ModelHandle>;

    /// The providers available to `session`.
    async fn list_providers(&self, session: &Session) -> Result<Vec<ProviderInfo>>;

    /// The models available to `session`, optionally limited to a provider.
    async fn list_models(
        &self,
        session: &Session,
        provider: Option<&ProviderId>,
    ) -> Result<Vec<ModelInfo>>;
}

/// Resolve `model_id` into a handle for `session`.
///
/// The ID is validated before anything else happens, so a malformed ID fails
/// with [`Error::InvalidModelId`] without any storage or network call.
pub async fn resolve_model_handle(
    resolver: &dyn ModelResolver,
    session: &Session,
    model_id: &str,
) -> Result<ModelHandle> {
    let id: ModelId = model_id.parse()?;

    trace!(model = %id, "Resolving model.");
    resolver.resolve(session, &id).await
}

/// Build the resolver for the configured mode.
pub fn resolver_for(
    config: &AppConfig,
    store: Arc<dyn ConnectionStore>,
) -> Result<Arc<dyn ModelResolver>> {
    info!(mode = %config.mode, "Selecting model resolution strategy.");

    Ok(match config.mode {
        Mode::Production => {
            let factory = RoutedFactory::from_config(&config.router)?;
            Arc::new(RoutedResolver::new(store, Arc::new(factory)))
        }
        Mode::Test => Arc::new(RegistryResolver::with_registry(test_registry()?)),
    })
}

/// Resolves models through the router, on behalf of the session's user.
#[derive(Debug, Clone)]
pub struct RoutedResolver {
    authorizer: ConnectionAuthorizer,
    factory: Arc<dyn RouterFactory>,
}

impl RoutedResolver {
    #[must_use]
    pub fn new(store: Arc<dyn ConnectionStore>, factory: Arc<dyn RouterFactory>) -> Self {
        Self {
            authorizer: ConnectionAuthorizer::new(store),
            factory,
        }
    }

    /// Build a router scoped to the current connection of the session's user.
    pub async fn router(&self, session: &Session) -> Result<Box<dyn Router>> {
        let connection = self.authorizer.resolve(session.user_id()).await?;
        self.factory.connect(connection).await
    }
}

#[async_trait]
impl ModelResolver for RoutedResolver {
    async fn resolve(&self, session: &Session, id: &ModelId) -> Result<ModelHandle> {
        self.router(session).await?.resolve_model(id).await
    }

    async fn list_providers(&self, session: &Session) -> Result<Vec<ProviderInfo>> {
        self.router(session).await?.list_providers().await
    }

    async fn list_models(
        &self,
        session: &Session,
        provider: Option<&ProviderId>,
    ) -> Result<Vec<ModelInfo>> {
        self.router(session).await?.list_models(provider).await
    }
}

/// Resolves models against a fixed registry, regardless of the session.
#[derive(Debug, Default)]
pub struct RegistryResolver {
    registry: OnceLock<ModelRegistry>,
}

impl RegistryResolver {
    /// A resolver whose registry is installed later.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_registry(registry: ModelRegistry) -> Self {
        Self {
            registry: OnceLock::from(registry),
        }
    }

    /// Install the registry. Can only happen once.
    pub fn install(&self, registry: ModelRegistry) -> Result<()> {
        self.registry
            .set(registry)
            .map_err(|_| Error::RegistryAlreadyInitialized)
    }

    fn registry(&self) -> Result<&ModelRegistry> {
        self.registry.get().ok_or(Error::RegistryUninitialized)
    }
}

#[async_trait]
impl ModelResolver for RegistryResolver {
    async fn resolve(&self, _session: &Session, id: &ModelId) -> Result<ModelHandle> {
        let model = self
            .registry()?
            .get(id)
            .ok_or_else(|| Error::UnknownModel(id.clone()))?;

        debug!(model = %id, "Resolved model from registry.");
        Ok(model)
    }

    async fn list_providers(&self, _session: &Session) -> Result<Vec<ProviderInfo>> {
        let providers = self
            .registry()?
            .models()
            .map(|model| model.id().provider().clone())
            .map(|provider| (provider.to_string(), provider))
            .collect::<BTreeMap<_, _>>();

        Ok(providers
            .into_iter()
            .map(|(display_name, provider)| ProviderInfo {
                provider,
                display_name,
            })
            .collect())
    }

    async fn list_models(
        &self,
        _session: &Session,
        provider: Option<&ProviderId>,
    ) -> Result<Vec<ModelInfo>> {
        Ok(self
            .registry()?
            .models()
            .filter(|model| provider.is_none_or(|provider| model.id().provider() == provider))
            .map(|model| ModelInfo {
                id: model.id().clone(),
                name: model.id().name().to_owned(),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
