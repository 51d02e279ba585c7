use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::Error, event::DeltaEvent};

/// The kind of document being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Free-form markdown, generated as appended fragments.
    Text,

    /// Source code, generated as successive full values.
    Code,
}

/// How an increment is combined with the draft generated so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulation {
    /// The increment is a fragment following the draft.
    Append,

    /// The increment is the new draft.
    Replace,
}

impl DocumentKind {
    #[must_use]
    pub fn accumulation(self) -> Accumulation {
        match self {
            Self::Text => Accumulation::Append,
            Self::Code => Accumulation::Replace,
        }
    }

    /// The event announcing `content` for this kind of document.
    #[must_use]
    pub fn delta(self, content: String) -> DeltaEvent {
        match self {
            Self::Text => DeltaEvent::TextDelta { content },
            Self::Code => DeltaEvent::CodeDelta { content },
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
        }
    }
}

impl Accumulation {
    /// Apply `increment` to `draft`.
    pub fn apply(self, draft: &mut String, increment: &str) {
        match self {
            Self::Append => draft.push_str(increment),
            Self::Replace => increment.clone_into(draft),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "code" => Ok(Self::Code),
            _ => Err(Error::InvalidRequest(format!("unknown document kind: {s}"))),
        }
    }
}
