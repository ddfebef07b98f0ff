//! Configuration for the chat service.
//!
//! Every constant a deployment might need to change is carried here and can be
//! overridden through `DISKML_*` environment variables; defaults target a
//! single-backend deployment (local Ollama, `llama3`, 120s timeout).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::chat::errors::{ChatError, ChatResult};

/// Environment variable overriding the generation base URL.
pub const ENDPOINT_ENV: &str = "DISKML_OLLAMA_URL";
/// Environment variable overriding the model identifier.
pub const MODEL_ENV: &str = "DISKML_MODEL";
/// Environment variable overriding the server port.
pub const PORT_ENV: &str = "DISKML_PORT";
/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "DISKML_TIMEOUT_SECS";
/// Environment variable overriding the history window size.
pub const WINDOW_ENV: &str = "DISKML_HISTORY_WINDOW";
/// Environment variable overriding the top-N feature count.
pub const TOP_FEATURES_ENV: &str = "DISKML_TOP_FEATURES";
/// Environment variable overriding the feature-importance CSV path.
pub const IMPORTANCE_PATH_ENV: &str = "DISKML_IMPORTANCE_PATH";
/// Environment variable overriding the classifier artifact path.
pub const ARTIFACT_PATH_ENV: &str = "DISKML_MODEL_ARTIFACT";

/// Default generation base URL (local Ollama).
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
/// Default model identifier.
const DEFAULT_MODEL: &str = "llama3";
/// Default end-to-end request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Default connect timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default history window size, in messages.
const DEFAULT_HISTORY_WINDOW: usize = 20;
/// Default number of feature-importance rows carried into the prompt.
const DEFAULT_TOP_FEATURES: usize = 15;
/// Default server port.
const DEFAULT_PORT: u16 = 3000;

/// Configuration for the chat service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the generation endpoint (without the `/api/generate` path).
    pub base_url: String,
    /// Model identifier as installed on the backend.
    pub model: String,
    /// End-to-end timeout for one generation request.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connect timeout for the HTTP client.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
    /// Maximum number of history messages per context window.
    pub history_window: usize,
    /// Number of feature-importance rows carried into the prompt.
    pub top_features: usize,
    /// Classifier facts collaborator settings.
    pub facts: FactsConfig,
    /// HTTP server port.
    pub port: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            history_window: DEFAULT_HISTORY_WINDOW,
            top_features: DEFAULT_TOP_FEATURES,
            facts: FactsConfig::default(),
            port: DEFAULT_PORT,
        }
    }
}

impl ChatConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a config from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve a config from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to the defaults rather than failing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENDPOINT_ENV) {
            config.base_url = url;
        }
        if let Some(model) = lookup(MODEL_ENV) {
            config.model = model;
        }
        if let Some(secs) = lookup(TIMEOUT_ENV).and_then(|v| v.parse().ok()) {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(window) = lookup(WINDOW_ENV).and_then(|v| v.parse().ok()) {
            config.history_window = window;
        }
        if let Some(top) = lookup(TOP_FEATURES_ENV).and_then(|v| v.parse().ok()) {
            config.top_features = top;
        }
        if let Some(path) = lookup(IMPORTANCE_PATH_ENV) {
            config.facts.importance_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ARTIFACT_PATH_ENV) {
            config.facts.artifact_path = PathBuf::from(path);
        }
        if let Some(port) = lookup(PORT_ENV).and_then(|v| v.parse().ok()) {
            config.port = port;
        }

        config
    }

    /// Set the generation base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the history window size.
    #[must_use]
    pub const fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        if self.model.trim().is_empty() {
            return Err(ChatError::InvalidConfig(
                "model must not be empty".to_string(),
            ));
        }
        if self.history_window == 0 {
            return Err(ChatError::InvalidConfig(
                "history_window must be > 0".to_string(),
            ));
        }
        if self.top_features == 0 {
            return Err(ChatError::InvalidConfig(
                "top_features must be > 0".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ChatError::InvalidConfig(
                "request_timeout must be > 0".to_string(),
            ));
        }
        Url::parse(&self.base_url)?;
        Ok(())
    }

    /// Full URL of the generate endpoint.
    #[must_use]
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

/// Settings for the classifier-facts collaborator files.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FactsConfig {
    /// Path to the ranked `feature,importance` CSV.
    pub importance_path: PathBuf,
    /// Path to the serialized trained-classifier artifact.
    pub artifact_path: PathBuf,
    /// Overall accuracy of the classifier, percent.
    pub accuracy_percent: f64,
    /// Recall on actual failures, percent.
    pub recall_percent: f64,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            importance_path: PathBuf::from("feature_importance.csv"),
            artifact_path: PathBuf::from("disk_model.pkl"),
            accuracy_percent: 90.15,
            recall_percent: 86.0,
        }
    }
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
