//! Shared HTTP client for provider requests.
//!
//! No request timeout is set here: a generation call waits for as long as
//! the underlying transport allows.

use crate::config::GenerationConfig;
use crate::error::GenerationError;

/// User-Agent sent when the config does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("wallsf1-genai/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for provider calls.
///
/// # Errors
///
/// Returns [`GenerationError::Configuration`] if the client cannot be constructed.
pub fn build_client(config: &GenerationConfig) -> Result<reqwest::Client, GenerationError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| GenerationError::Configuration(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_with_default_config() {
        assert!(build_client(&GenerationConfig::default()).is_ok());
    }

    #[test]
    fn build_client_with_custom_ua() {
        let config = GenerationConfig {
            user_agent: Some("CustomBot/1.0".into()),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn default_user_agent_names_crate() {
        assert!(DEFAULT_USER_AGENT.starts_with("wallsf1-genai/"));
    }
}
