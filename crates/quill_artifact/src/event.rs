use serde::{Deserialize, Serialize};

/// A partial-content event, forwarded to the client as it happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DeltaEvent {
    /// A fragment to append to the text document.
    TextDelta { content: String },

    /// The full current source of the code document.
    CodeDelta { content: String },
}

impl DeltaEvent {
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::TextDelta { content } | Self::CodeDelta { content } => content,
        }
    }
}
