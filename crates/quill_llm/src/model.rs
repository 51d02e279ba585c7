//! Model handles and the incremental generation capability.
//!
//! A [`ModelHandle`] is obtained fresh for every request through a
//! [`ModelResolver`](crate::ModelResolver) and is never cached. Both generation
//! modes return lazy, finite streams that cannot be restarted.

use std::{pin::Pin, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::Stream;
use quill_model::ModelId;
use serde_json::Value;

use crate::error::Result;

/// A resolved, callable model.
pub type ModelHandle = Arc<dyn LanguageModel>;

/// A stream of text fragments, each to be appended to the previous ones.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A stream of partial objects, each the full current value of the object
/// generated so far.
pub type ObjectStream = Pin<Box<dyn Stream<Item = Result<Value>> + Send>>;

#[async_trait]
pub trait LanguageModel: std::fmt::Debug + Send + Sync {
    /// The ID the model was resolved from.
    fn id(&self) -> &ModelId;

    /// Stream free-form text.
    async fn stream_text(&self, request: TextRequest) -> Result<TextStream>;

    /// Stream an object constrained by [`ObjectRequest::schema`].
    ///
    /// Every item is the full object as parsed so far. The stream fails if
    /// the complete output is not valid JSON.
    async fn stream_object(&self, request: ObjectRequest) -> Result<ObjectStream>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    /// The system instruction.
    pub system: String,

    /// The user prompt.
    pub prompt: String,

    /// Content the output is expected to largely repeat.
    pub prediction: Option<String>,

    /// How fragments are re-chunked before they are yielded.
    pub chunking: Chunking,
}

impl TextRequest {
    #[must_use]
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            prediction: None,
            chunking: Chunking::None,
        }
    }

    #[must_use]
    pub fn with_prediction(mut self, prediction: impl Into<String>) -> Self {
        self.prediction = Some(prediction.into());
        self
    }

    #[must_use]
    pub fn with_chunking(mut self, chunking: Chunking) -> Self {
        self.chunking = chunking;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chunking {
    /// Fragments are yielded as the model produces them.
    #[default]
    None,

    /// Fragments are yielded at word boundaries, optionally with a delay
    /// between them.
    Word { delay: Duration },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRequest {
    pub system: String,
    pub prompt: String,

    /// Name of the schema, as reported to the provider.
    pub schema_name: String,

    /// JSON schema the object must satisfy.
    pub schema: Value,
}

impl ObjectRequest {
    #[must_use]
    pub fn new(
        system: impl Into<String>,
        prompt: impl Into<String>,
        schema_name: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            schema_name: schema_name.into(),
            schema,
        }
    }
}
