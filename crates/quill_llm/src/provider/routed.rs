//! Models served through the bring-your-own-key router.

use std::sync::Arc;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt as _, TryStreamExt as _, future};
use quill_config::RouterConfig;
use quill_model::{ConnectionId, ModelId, ProviderId};
use quill_router::{
    ChunkStream, Client,
    types::request::{ChatCompletion, Prediction, RequestMessage, ResponseFormat},
};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    error::{Error, Result},
    model::{Chunking, LanguageModel, ModelHandle, ObjectRequest, ObjectStream, TextRequest, TextStream},
    partial::PartialObject,
    router::{ModelInfo, ProviderInfo, Router, RouterFactory},
    smooth::smooth_words,
};

/// Builds router clients from the application's API key.
#[derive(Debug, Clone)]
pub struct RoutedFactory {
    api_key: String,
    base_url: String,
    app_name: String,
    app_referrer: Option<String>,
    max_retries: usize,
}

impl RoutedFactory {
    /// Build a factory, reading the API key from the environment variable
    /// named by `config`.
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        Self::from_config_with_env(config, |key| std::env::var(key).ok())
    }

    pub fn from_config_with_env(
        config: &RouterConfig,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_key = var(&config.api_key_env)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::MissingEnv(config.api_key_env.clone()))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            app_name: config.app_name.clone(),
            app_referrer: config.app_referrer.clone(),
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl RouterFactory for RoutedFactory {
    async fn connect(&self, connection: ConnectionId) -> Result<Box<dyn Router>> {
        trace!(%connection, base_url = %self.base_url, "Creating router client.");

        let client = Client::new(self.api_key.clone(), connection)
            .with_base_url(self.base_url.clone())
            .with_app_name(self.app_name.clone())
            .with_app_referrer(self.app_referrer.clone())
            .with_max_retries(self.max_retries);

        Ok(Box::new(RoutedRouter { client }))
    }
}

#[derive(Debug, Clone)]
pub struct RoutedRouter {
    client: Client,
}

#[async_trait]
impl Router for RoutedRouter {
    async fn resolve_model(&self, id: &ModelId) -> Result<ModelHandle> {
        Ok(Arc::new(RoutedModel {
            id: id.clone(),
            client: self.client.clone(),
        }))
    }

    async fn list_providers(&self) -> Result<Vec<ProviderInfo>> {
        let providers = self.client.providers().await?;

        Ok(providers
            .data
            .into_iter()
            .filter_map(|info| match info.provider.parse::<ProviderId>() {
                Ok(provider) => Some(ProviderInfo {
                    provider,
                    display_name: info.display_name,
                }),
                Err(error) => {
                    warn!(provider = %info.provider, %error, "Skipping invalid provider.");
                    None
                }
            })
            .collect())
    }

    async fn list_models(&self, provider: Option<&ProviderId>) -> Result<Vec<ModelInfo>> {
        let models = self.client.models(provider.map(ProviderId::as_str)).await?;

        Ok(models
            .data
            .into_iter()
            .filter_map(|info| match info.id.parse::<ModelId>() {
                Ok(id) => Some(ModelInfo {
                    id,
                    name: info.name,
                }),
                Err(error) => {
                    warn!(model = %info.id, %error, "Skipping invalid model.");
                    None
                }
            })
            .collect())
    }
}

/// A model reached through a connection-scoped router client.
#[derive(Debug, Clone)]
pub struct RoutedModel {
    id: ModelId,
    client: Client,
}

impl RoutedModel {
    fn completion(&self, system: String, prompt: String) -> ChatCompletion {
        ChatCompletion::new(self.id.to_string())
            .with_message(RequestMessage::system(system))
            .with_message(RequestMessage::user(prompt))
    }
}

#[async_trait]
impl LanguageModel for RoutedModel {
    fn id(&self) -> &ModelId {
        &self.id
    }

    async fn stream_text(&self, request: TextRequest) -> Result<TextStream> {
        let TextRequest {
            system,
            prompt,
            prediction,
            chunking,
        } = request;

        let mut completion = self.completion(system, prompt);
        completion.prediction = prediction.map(|content| Prediction::Content { content });

        debug!(model = %self.id, ?chunking, "Streaming text.");
        let fragments = content(self.client.chat_completion_stream(completion));

        Ok(match chunking {
            Chunking::None => fragments,
            Chunking::Word { delay } => smooth_words(fragments, delay),
        })
    }

    async fn stream_object(&self, request: ObjectRequest) -> Result<ObjectStream> {
        let ObjectRequest {
            system,
            prompt,
            schema_name,
            schema,
        } = request;

        let mut completion = self.completion(system, prompt);
        completion.response_format = Some(ResponseFormat::json_schema(schema_name, schema));

        debug!(model = %self.id, "Streaming object.");
        let fragments = content(self.client.chat_completion_stream(completion));

        Ok(Box::pin(partial_objects(fragments)))
    }
}

/// The non-empty content fragments of a chunk stream.
fn content(chunks: ChunkStream) -> TextStream {
    let fragments = chunks
        .map(|chunk| {
            let chunk = chunk?;
            if let Some(error) = chunk.choices.first().and_then(|choice| choice.error.clone()) {
                return Err(Error::Router(quill_router::Error::Api {
                    code: error.code,
                    message: error.message,
                }));
            }

            Ok(chunk.content().unwrap_or_default().to_owned())
        })
        .try_filter(|fragment| future::ready(!fragment.is_empty()));

    Box::pin(fragments)
}

fn partial_objects(mut fragments: TextStream) -> impl Stream<Item = Result<Value>> {
    try_stream! {
        let mut object = PartialObject::new();

        while let Some(fragment) = fragments.next().await {
            if let Some(value) = object.push(&fragment?) {
                yield value;
            }
        }

        object
            .finish()
            .map_err(|error| Error::Schema(format!("incomplete structured output: {error}")))?;
    }
}

#[cfg(test)]
#[path = "routed_tests.rs"]
mod tests;
