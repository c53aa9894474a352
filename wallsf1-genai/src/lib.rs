//! # wallsf1-genai
//!
//! Prompt-to-image generation for WallsF1.
//!
//! This crate wraps a single external call that turns a text prompt and an
//! aspect ratio into an image payload, normalising success and failure into
//! a uniform [`GenerationResult`].
//!
//! ## Design
//!
//! - One outbound request per call: no retries, no queueing, no client-side timeout
//! - A missing credential fails before any network traffic
//! - Failures are classified ([`GenerationError`]) at this boundary; raw
//!   transport errors never leak to callers
//! - Pluggable backends via [`ImageProvider`]; [`GeminiProvider`] is the default
//!
//! ## Security
//!
//! - API keys are redacted from `Debug` output and never appear in errors
//! - Prompts are logged only at trace level

pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod providers;
pub mod types;

pub use config::GenerationConfig;
pub use error::{GenerationError, Result};
pub use provider::ImageProvider;
pub use providers::GeminiProvider;
pub use types::{AspectRatio, GeneratedImage, GenerationRequest, GenerationResult};

/// Generate an image with the default Gemini backend.
///
/// Builds a [`GeminiProvider`] from `config` and issues exactly one request.
///
/// # Errors
///
/// Returns [`GenerationError::Validation`] for a blank prompt,
/// [`GenerationError::Configuration`] for a missing or rejected credential,
/// [`GenerationError::EmptyResponse`] / [`GenerationError::NoImageData`] when
/// the provider produced nothing usable, and [`GenerationError::Transport`]
/// for network or HTTP failures.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> wallsf1_genai::Result<()> {
/// use wallsf1_genai::{AspectRatio, GenerationConfig, GenerationRequest};
///
/// let config = GenerationConfig::from_env();
/// let request = GenerationRequest::new("liquid glass aurora", AspectRatio::Portrait9x16);
/// let image = wallsf1_genai::generate(&request, &config).await?;
/// println!("{} bytes of {}", image.data.len(), image.mime_type);
/// # Ok(())
/// # }
/// ```
pub async fn generate(request: &GenerationRequest, config: &GenerationConfig) -> GenerationResult {
    request.validate()?;
    let provider = GeminiProvider::new(config.clone())?;
    provider.generate(request).await
}
