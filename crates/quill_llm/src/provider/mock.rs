//! Scripted models for tests and offline runs.
//!
//! A [`MockModel`] replays a fixed list of increments for each generation
//! mode, optionally followed by a failure, and records every request it
//! receives. Increments are yielded verbatim, without any smoothing.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use quill_model::ModelId;
use serde_json::{Value, json};

use crate::{
    error::{Error, Result},
    model::{LanguageModel, ObjectRequest, ObjectStream, TextRequest, TextStream},
    registry::ModelRegistry,
};

/// A request received by a [`MockModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Text(TextRequest),
    Object(ObjectRequest),
}

#[derive(Debug, Clone)]
pub struct MockModel {
    id: ModelId,
    text: Vec<String>,
    objects: Vec<Value>,
    failure: Option<String>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockModel {
    #[must_use]
    pub fn new(id: ModelId) -> Self {
        Self {
            id,
            text: vec![],
            objects: vec![],
            failure: None,
            requests: Arc::default(),
        }
    }

    /// Set the fragments yielded by [`LanguageModel::stream_text`].
    #[must_use]
    pub fn with_text<S: Into<String>>(mut self, fragments: impl IntoIterator<Item = S>) -> Self {
        self.text = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Set the partial objects yielded by [`LanguageModel::stream_object`].
    #[must_use]
    pub fn with_objects(mut self, objects: impl IntoIterator<Item = Value>) -> Self {
        self.objects = objects.into_iter().collect();
        self
    }

    /// Yield `{"code": value}` for every value from
    /// [`LanguageModel::stream_object`].
    #[must_use]
    pub fn with_code<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        self.with_objects(values.into_iter().map(|value| {
            let code: String = value.into();
            json!({ "code": code })
        }))
    }

    /// Fail both streams with `message` once the scripted increments are
    /// exhausted.
    #[must_use]
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// The requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    fn script<T: Send + 'static>(
        &self,
        items: Vec<T>,
    ) -> impl futures::Stream<Item = Result<T>> + Send + 'static {
        let failure = self.failure.clone().map(|message| Err(Error::Generation(message)));
        stream::iter(items.into_iter().map(Ok).chain(failure))
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn id(&self) -> &ModelId {
        &self.id
    }

    async fn stream_text(&self, request: TextRequest) -> Result<TextStream> {
        self.requests.lock().push(RecordedRequest::Text(request));
        Ok(Box::pin(self.script(self.text.clone())))
    }

    async fn stream_object(&self, request: ObjectRequest) -> Result<ObjectStream> {
        self.requests.lock().push(RecordedRequest::Object(request));
        Ok(Box::pin(self.script(self.objects.clone())))
    }
}

/// The registry used when running in test mode.
///
/// Holds a chat, a reasoning and an artifact model, each with a short
/// deterministic script for both generation modes.
pub fn test_registry() -> Result<ModelRegistry> {
    let models = [
        ("openai", "gpt-4o", "This is a test document."),
        ("openai", "o1-mini", "This is a considered test document."),
        ("openai", "gpt-4o-mini", "This is a small test document."),
    ];

    models
        .into_iter()
        .try_fold(ModelRegistry::new(), |registry, (provider, name, text)| {
            let id = ModelId::try_from(format!("{provider}/{name}"))?;
            let model = MockModel::new(id)
                .with_text(text.split_inclusive(' '))
                .with_code([
                    "def main():",
                    "def main():\n    print(\"hello\")",
                    "def main():\n    print(\"hello\")\n\nmain()",
                ]);

            Ok(registry.with_model(Arc::new(model)))
        })
}

#[cfg(test)]
#[path = "mock_tests.rs"]
mod tests;
