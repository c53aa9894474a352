//! Error types for the wallsf1-genai crate.
//!
//! Every variant carries a stable code (SCREAMING_SNAKE_CASE) that is part
//! of the Display output and accessible via [`GenerationError::code()`].
//! API keys never appear in error messages.

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Missing or rejected credential, or an invalid client configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// The provider answered without any content parts.
    pub const EMPTY_RESPONSE: &str = "EMPTY_RESPONSE";

    /// The provider answered with content parts but none held image data.
    pub const NO_IMAGE_DATA: &str = "NO_IMAGE_DATA";

    /// Network failure or non-success HTTP status.
    pub const TRANSPORT_FAILED: &str = "TRANSPORT_FAILED";

    /// The request was rejected before it was sent.
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
}

/// Generic message shown when the provider produced nothing usable.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate wallpaper. Please try again.";

/// Errors that can occur while generating an image.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Required credential is missing or was rejected by the provider.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Configuration(String),

    /// The provider responded with no content parts.
    #[error("[{}] {}", error_codes::EMPTY_RESPONSE, .0)]
    EmptyResponse(String),

    /// The provider responded with parts, none carrying inline image data.
    #[error("[{}] {}", error_codes::NO_IMAGE_DATA, .0)]
    NoImageData(String),

    /// Network or HTTP-level failure. The message is forwarded as-is.
    #[error("[{}] {}", error_codes::TRANSPORT_FAILED, .0)]
    Transport(String),

    /// The request failed local validation (e.g. an empty prompt).
    #[error("[{}] {}", error_codes::VALIDATION_FAILED, .0)]
    Validation(String),
}

impl GenerationError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => error_codes::CONFIG_INVALID,
            Self::EmptyResponse(_) => error_codes::EMPTY_RESPONSE,
            Self::NoImageData(_) => error_codes::NO_IMAGE_DATA,
            Self::Transport(_) => error_codes::TRANSPORT_FAILED,
            Self::Validation(_) => error_codes::VALIDATION_FAILED,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration(m)
            | Self::EmptyResponse(m)
            | Self::NoImageData(m)
            | Self::Transport(m)
            | Self::Validation(m) => m,
        }
    }

    /// Text suitable for an inline message next to the prompt input.
    ///
    /// Empty and image-less responses collapse to a generic retry hint;
    /// every other class keeps its own message.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyResponse(_) | Self::NoImageData(_) => GENERIC_FAILURE_MESSAGE.to_owned(),
            other if other.message().is_empty() => GENERIC_FAILURE_MESSAGE.to_owned(),
            other => other.message().to_owned(),
        }
    }
}

/// Convenience type alias for wallsf1-genai results.
pub type Result<T> = std::result::Result<T, GenerationError>;
