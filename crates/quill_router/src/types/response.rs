use serde::Deserialize;
use serde_json::Value;

/// A single chunk of a streaming chat completion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,

    /// The model that served the request.
    #[serde(default)]
    pub model: Option<String>,

    pub choices: Vec<StreamingChoice>,
}

impl ChatCompletionChunk {
    /// The content fragment carried by the first choice, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.choices.first().and_then(|choice| choice.finish_reason)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamingChoice {
    /// `None` until the stream is finished.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,

    pub delta: StreamingDelta,

    #[serde(default)]
    pub error: Option<ErrorResponse>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StreamingDelta {
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Option<String>,
}

/// The reason why the assistant stopped generating tokens.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The assistant has stopped generating tokens.
    Stop,

    /// The assistant has reached the maximum length of accepted tokens.
    Length,

    /// The assistant has filtered out the content due to a flag from content
    /// filters.
    ContentFilter,

    /// The assistant encountered an error generating the response.
    Error,

    /// Undefined/unknown finish reason.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionError {
    pub error: ErrorResponse,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,

    /// Provider-specific details, if the upstream provider caused the error.
    #[serde(default)]
    pub metadata: Option<ErrorMetadata>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorMetadata {
    /// The name of the provider that encountered the error.
    pub provider_name: String,

    /// The raw error from the provider.
    #[serde(default)]
    pub raw: Value,
}

/// The providers the user's connection has credentials for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Providers {
    pub data: Vec<ProviderInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderInfo {
    pub provider: String,

    #[serde(alias = "displayName")]
    pub display_name: String,
}

/// The models reachable through the user's connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Models {
    pub data: Vec<ModelInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelInfo {
    /// The full `<provider>/<model>` ID.
    pub id: String,

    /// Human-readable model name.
    pub name: String,
}
