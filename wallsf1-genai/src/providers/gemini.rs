//! Gemini image generation via the `generateContent` REST endpoint.
//!
//! Sends the prompt as a single text part with an `imageConfig.aspectRatio`
//! hint, then takes the first inline image part of the first candidate.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::http;
use crate::provider::ImageProvider;
use crate::types::{GeneratedImage, GenerationRequest, GenerationResult, DEFAULT_IMAGE_MIME};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini `generateContent` client.
pub struct GeminiProvider {
    config: GenerationConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.config.model)
            .field("api_base", &self.config.api_base)
            .finish()
    }
}

impl GeminiProvider {
    /// Create a provider for the given configuration.
    ///
    /// A missing API key is not an error here; it is reported by
    /// [`ImageProvider::generate`] before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] if the endpoint fields are
    /// invalid or the HTTP client cannot be built.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let client = http::build_client(&config)?;
        Ok(Self { config, client })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn map_http_error(status: reqwest::StatusCode, body: &str) -> GenerationError {
        let message = extract_error_message(body);
        if matches!(status.as_u16(), 401 | 403) || body.contains("API_KEY_INVALID") {
            return GenerationError::Configuration(format!(
                "Gemini rejected the API key: {message}"
            ));
        }
        GenerationError::Transport(format!("Gemini HTTP {}: {message}", status.as_u16()))
    }
}

/// Build the JSON request body for a generation request.
pub fn build_request_body(request: &GenerationRequest) -> serde_json::Value {
    serde_json::json!({
        "contents": [
            { "parts": [ { "text": request.prompt } ] }
        ],
        "generationConfig": {
            "responseModalities": ["IMAGE"],
            "imageConfig": { "aspectRatio": request.aspect_ratio.as_str() }
        }
    })
}

impl ImageProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        request.validate()?;
        let api_key = self.config.credential()?;

        tracing::trace!(prompt = %request.prompt, ratio = %request.aspect_ratio, "Gemini generate");

        let response = self
            .client
            .post(self.config.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&build_request_body(request))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(format!("Gemini response read failed: {e}")))?;

        if !status.is_success() {
            let err = Self::map_http_error(status, &body);
            tracing::warn!(status = status.as_u16(), code = err.code(), "Gemini generation failed");
            return Err(err);
        }

        tracing::trace!(bytes = body.len(), "Gemini response received");
        parse_generate_response(&body, &request.prompt)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ── Response parsing ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(alias = "mime_type")]
    mime_type: Option<String>,
    data: Option<String>,
}

/// Parse a `generateContent` response body into a generated image.
///
/// Extracted as a separate function for testability with canned JSON.
pub(crate) fn parse_generate_response(body: &str, prompt: &str) -> GenerationResult {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Transport(format!("Gemini response parse failed: {e}")))?;

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    if parts.is_empty() {
        return Err(GenerationError::EmptyResponse("no content generated".into()));
    }

    let inline = parts
        .into_iter()
        .filter_map(|part| part.inline_data)
        .find(|inline| inline.data.as_deref().is_some_and(|d| !d.is_empty()));

    let Some(inline) = inline else {
        return Err(GenerationError::NoImageData(
            "no image data found in response".into(),
        ));
    };

    let encoded = inline.data.unwrap_or_default();
    let data = BASE64.decode(encoded.trim().as_bytes()).map_err(|e| {
        GenerationError::NoImageData(format!("inline image data is not valid base64: {e}"))
    })?;
    let mime_type = inline
        .mime_type
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_owned());

    tracing::debug!(bytes = data.len(), mime = %mime_type, "Gemini image decoded");

    Ok(GeneratedImage {
        mime_type,
        data,
        prompt: prompt.to_owned(),
    })
}

/// Extract an error message from a Gemini error body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}
