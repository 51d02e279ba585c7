mod error;
pub mod session;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use crate::{
    error::Error,
    session::{ConnectionId, Session, UserId},
};
use crate::error::Result;

/// The provider selected for a user that has just connected.
pub const DEFAULT_CHAT_PROVIDER: &str = "openai";

/// The model used when a request does not name one.
pub const DEFAULT_CHAT_MODEL: &str = "openai/gpt-4o";

/// The separator between the provider and model segments of a [`ModelId`].
pub const SEPARATOR: char = '/';

/// The ID of a model, composed of a provider and a model name.
///
/// The string form is `<provider>/<model>`. Parsing is purely syntactic: a
/// well-formed ID says nothing about whether the provider or model exist, that
/// is only discovered once the router is asked to generate with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId {
    provider: ProviderId,
    name: String,
}

impl ModelId {
    /// The provider of the model.
    #[must_use]
    pub fn provider(&self) -> &ProviderId {
        &self.provider
    }

    /// The name of the model, without the provider prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The default chat model.
    #[must_use]
    pub fn default_chat_model() -> Self {
        Self {
            provider: ProviderId(DEFAULT_CHAT_PROVIDER.to_owned()),
            name: "gpt-4o".to_owned(),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.provider, self.name)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.to_string()
    }
}

impl TryFrom<&str> for ModelId {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::from_str(s)
    }
}

impl TryFrom<String> for ModelId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::from_str(s.as_str())
    }
}

impl TryFrom<(ProviderId, &str)> for ModelId {
    type Error = Error;

    fn try_from((provider, name): (ProviderId, &str)) -> Result<Self> {
        Self::from_str(&format!("{provider}{SEPARATOR}{name}"))
    }
}

impl FromStr for ModelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::Empty("model ID"));
        }

        let (provider, name) = s.split_once(SEPARATOR).ok_or_else(|| {
            Error::InvalidIdFormat(format!("{s:?} must match <provider>/<model>"))
        })?;

        if name.contains(SEPARATOR) {
            return Err(Error::InvalidIdFormat(format!(
                "{s:?} must contain exactly one '{SEPARATOR}'"
            )));
        }

        if name.is_empty() {
            return Err(Error::Empty("model name"));
        }

        Ok(Self {
            provider: provider.parse()?,
            name: name.to_owned(),
        })
    }
}

/// The ID of a provider reachable through the model router, e.g. `openai`.
///
/// The set of providers is owned by the router, so this is an open string
/// rather than an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        Self(DEFAULT_CHAT_PROVIDER.to_owned())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        id.0
    }
}

impl TryFrom<String> for ProviderId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::from_str(&s)
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::Empty("provider ID"));
        }

        if s.contains(SEPARATOR) {
            return Err(Error::InvalidProviderId(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
