//! Application configuration.
//!
//! Configuration is read from a TOML file, falling back to defaults for
//! anything left out, after which a small set of environment variables can
//! override individual fields.

mod error;

use std::{fmt, fs, str::FromStr, time::Duration};

use camino::{Utf8Path, Utf8PathBuf};
use quill_model::ModelId;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub use crate::error::Error;
use crate::error::Result;

/// Overrides [`AppConfig::mode`].
pub const ENV_MODE: &str = "QUILL_MODE";

/// Overrides [`RouterConfig::base_url`].
pub const ENV_ROUTER_BASE_URL: &str = "QUILL_ROUTER_BASE_URL";

/// Overrides [`GenerationConfig::default_model`].
pub const ENV_DEFAULT_MODEL: &str = "QUILL_MODEL";

/// The default location of the configuration file, relative to the working
/// directory.
pub const DEFAULT_CONFIG_FILE: &str = ".quill/config.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// How model identifiers are resolved into model handles.
    pub mode: Mode,

    pub router: RouterConfig,
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Load the configuration at `path`, if it exists, and apply environment
    /// overrides.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Read the configuration file at `path`, or return the defaults if there
    /// is none.
    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        if !path.is_file() {
            debug!(%path, "No configuration file found, using defaults.");
            return Ok(Self::default());
        }

        trace!(%path, "Loading configuration file.");
        let contents = fs::read_to_string(path).map_err(|error| Error::Read {
            path: path.to_owned(),
            error,
        })?;

        toml::from_str(&contents).map_err(|error| Error::Parse {
            path: path.to_owned(),
            error,
        })
    }

    /// Apply environment overrides, looking variables up through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = var(ENV_MODE) {
            self.mode = value.parse()?;
        }

        if let Some(value) = var(ENV_ROUTER_BASE_URL) {
            self.router.base_url = value;
        }

        if let Some(value) = var(ENV_DEFAULT_MODEL) {
            self.generation.default_model =
                value.parse().map_err(|_| Error::InvalidValue {
                    key: ENV_DEFAULT_MODEL,
                    value,
                })?;
        }

        Ok(())
    }
}

/// The model resolution mode, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Resolve models through the router, authorized by the user's connection.
    #[default]
    Production,

    /// Resolve models against the fixed in-process registry of mock models.
    /// Never touches the connection store or the router.
    Test,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(Error::InvalidValue {
                key: ENV_MODE,
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// Model router configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Environment variable that contains the router API key.
    pub api_key_env: String,

    /// The base URL to use for API requests.
    pub base_url: String,

    /// Application name sent to the router.
    pub app_name: String,

    /// Optional HTTP referrer to send with requests.
    pub app_referrer: Option<String>,

    /// How often a request that failed before streaming started is retried.
    pub max_retries: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: "BYOROUTER_API_KEY".to_owned(),
            base_url: "https://api.byorouter.com".to_owned(),
            app_name: "quill".to_owned(),
            app_referrer: None,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// The JSON file holding the current connection of every user.
    pub connections: Utf8PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connections: Utf8PathBuf::from(".quill/connections.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// The model used when none is given.
    pub default_model: ModelId,

    /// Delay between word-smoothed text chunks, in milliseconds.
    pub smooth_delay_ms: u64,
}

impl GenerationConfig {
    #[must_use]
    pub fn smooth_delay(&self) -> Duration {
        Duration::from_millis(self.smooth_delay_ms)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_model: ModelId::default_chat_model(),
            smooth_delay_ms: 10,
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
