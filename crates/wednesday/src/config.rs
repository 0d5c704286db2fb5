//! Configuration read from the environment.

use std::env;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};

use wednesday_core::DEFAULT_AGENT_ID;

/// The variable holding the required Gemini API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// The variable holding the project that enables persistence.
pub const PROJECT_VAR: &str = "GOOGLE_CLOUD_PROJECT";
/// The variable holding an OAuth token for Firestore.
pub const ACCESS_TOKEN_VAR: &str = "GOOGLE_CLOUD_ACCESS_TOKEN";
/// The variable overriding the Gemini model.
pub const MODEL_VAR: &str = "WEDNESDAY_MODEL";
/// The variable holding the initial agent identifier.
pub const AGENT_ID_VAR: &str = "WEDNESDAY_AGENT_ID";

/// A configuration problem that prevents startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{name} is missing!"),
        }
    }
}

impl StdError for ConfigError {}

/// Startup configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// The Gemini API key.
    pub api_key: String,
    /// The Google Cloud project. Persistence is disabled without it.
    pub project_id: Option<String>,
    /// An OAuth bearer token for Firestore. The API key is used when absent.
    pub access_token: Option<String>,
    /// The Gemini model, or the provider default.
    pub model: Option<String>,
    /// The initial agent identifier.
    pub agent_id: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`. Blank values count as
    /// unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;
        Ok(Self {
            api_key,
            project_id: get(PROJECT_VAR),
            access_token: get(ACCESS_TOKEN_VAR),
            model: get(MODEL_VAR),
            agent_id: get(AGENT_ID_VAR)
                .unwrap_or_else(|| DEFAULT_AGENT_ID.to_owned()),
        })
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<deducted>")
            .field("project_id", &self.project_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<deducted>"),
            )
            .field("model", &self.model)
            .field("agent_id", &self.agent_id)
            .finish()
    }
}
