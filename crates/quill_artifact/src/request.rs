use std::time::Duration;

use quill_llm::ModelHandle;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    kind::DocumentKind,
};

/// The delay between word-smoothed text chunks, unless configured otherwise.
pub const DEFAULT_SMOOTH_DELAY: Duration = Duration::from_millis(10);

/// A validated request to generate a document.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub kind: DocumentKind,
    pub action: Action,

    /// The model to generate with, resolved for this request only.
    pub model: ModelHandle,

    /// Delay between word-smoothed text chunks.
    pub smooth_delay: Duration,
}

impl GenerationRequest {
    #[must_use]
    pub fn create(kind: DocumentKind, title: impl Into<String>, model: ModelHandle) -> Self {
        Self::new(
            kind,
            Action::Create {
                title: title.into(),
            },
            model,
        )
    }

    #[must_use]
    pub fn update(
        kind: DocumentKind,
        existing_content: impl Into<String>,
        description: impl Into<String>,
        model: ModelHandle,
    ) -> Self {
        Self::new(
            kind,
            Action::Update {
                existing_content: existing_content.into(),
                description: description.into(),
            },
            model,
        )
    }

    fn new(kind: DocumentKind, action: Action, model: ModelHandle) -> Self {
        Self {
            kind,
            action,
            model,
            smooth_delay: DEFAULT_SMOOTH_DELAY,
        }
    }

    #[must_use]
    pub fn with_smooth_delay(mut self, delay: Duration) -> Self {
        self.smooth_delay = delay;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write a new document about `title`.
    Create { title: String },

    /// Revise `existing_content` as asked for by `description`.
    Update {
        existing_content: String,
        description: String,
    },
}

impl Action {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Update,
}

/// The loose shape of a generation request, as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationParams {
    pub kind: Option<DocumentKind>,
    pub action: Option<ActionKind>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub existing_content: Option<String>,
}

impl GenerationParams {
    /// Validate the parameters and bind them to `model`.
    ///
    /// `create` requires a title, `update` requires both the existing content
    /// and a description. Anything else is [`Error::InvalidRequest`].
    pub fn into_request(self, model: ModelHandle) -> Result<GenerationRequest> {
        let kind = self.kind.ok_or_else(|| missing("kind"))?;

        let action = match self.action.ok_or_else(|| missing("action"))? {
            ActionKind::Create => Action::Create {
                title: self.title.ok_or_else(|| missing("title"))?,
            },
            ActionKind::Update => Action::Update {
                existing_content: self
                    .existing_content
                    .ok_or_else(|| missing("existingContent"))?,
                description: self.description.ok_or_else(|| missing("description"))?,
            },
        };

        Ok(GenerationRequest::new(kind, action, model))
    }
}

fn missing(field: &str) -> Error {
    Error::InvalidRequest(format!("missing field `{field}`"))
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
