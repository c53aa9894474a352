//! Generation client configuration with sensible defaults.
//!
//! [`GenerationConfig`] names the provider endpoint, model and credential.
//! The credential is optional at construction time so that a missing key
//! surfaces as a [`GenerationError::Configuration`] on the first call rather
//! than at startup.

use std::fmt;

use url::Url;

use crate::error::GenerationError;

/// Default Gemini REST base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Configuration for a generation client.
#[derive(Clone)]
pub struct GenerationConfig {
    /// Provider API key. `None` or blank means "not configured".
    pub api_key: Option<String>,
    /// REST base URL, without a trailing slash.
    pub api_base: String,
    /// Model identifier, with or without the `models/` prefix.
    pub model: String,
    /// Custom User-Agent. If `None`, the crate name and version are sent.
    pub user_agent: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            user_agent: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl GenerationConfig {
    /// Default configuration with the API key taken from the environment.
    ///
    /// Checks each of [`API_KEY_ENV_VARS`] and uses the first non-blank value.
    pub fn from_env() -> Self {
        Self::from_env_vars(API_KEY_ENV_VARS)
    }

    /// Default configuration with the API key taken from the first non-blank
    /// variable in `names`.
    pub fn from_env_vars(names: &[&str]) -> Self {
        let api_key = names
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_owned())
            .find(|value| !value.is_empty());
        Self {
            api_key,
            ..Default::default()
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a custom base URL (trailing slashes are dropped).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Returns the API key, or a configuration error when it is missing.
    pub fn credential(&self) -> Result<&str, GenerationError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(GenerationError::Configuration(
                "API key not found. Set GEMINI_API_KEY (or API_KEY) and try again.".into(),
            )),
        }
    }

    /// Validates the endpoint fields.
    ///
    /// Checks:
    /// - `api_base` must be an absolute http(s) URL
    /// - `model` must not be empty
    pub fn validate(&self) -> Result<(), GenerationError> {
        let parsed = Url::parse(&self.api_base).map_err(|e| {
            GenerationError::Configuration(format!("invalid api_base `{}`: {e}", self.api_base))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GenerationError::Configuration(format!(
                "api_base must use http or https, got `{}`",
                parsed.scheme()
            )));
        }
        if self.model.trim().is_empty() {
            return Err(GenerationError::Configuration("model must not be empty".into()));
        }
        Ok(())
    }

    /// Full `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_owned()
        } else {
            format!("models/{model}")
        };
        format!("{}/{model_path}:generateContent", self.api_base)
    }
}
