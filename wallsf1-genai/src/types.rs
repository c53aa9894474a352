//! Request and result types for image generation.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// MIME type assumed when the provider omits one.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Supported output shapes, passed to the provider as `W:H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Square.
    #[serde(rename = "1:1")]
    Square,
    /// Portrait 3:4.
    #[serde(rename = "3:4")]
    Portrait3x4,
    /// Landscape 4:3.
    #[serde(rename = "4:3")]
    Landscape4x3,
    /// Tall phone wallpaper.
    #[default]
    #[serde(rename = "9:16")]
    Portrait9x16,
    /// Widescreen desktop wallpaper.
    #[serde(rename = "16:9")]
    Landscape16x9,
}

impl AspectRatio {
    /// Returns the wire form, e.g. `"16:9"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait3x4 => "3:4",
            Self::Landscape4x3 => "4:3",
            Self::Portrait9x16 => "9:16",
            Self::Landscape16x9 => "16:9",
        }
    }

    /// Returns all supported ratios.
    pub fn all() -> &'static [AspectRatio] {
        &[
            Self::Square,
            Self::Portrait3x4,
            Self::Landscape4x3,
            Self::Portrait9x16,
            Self::Landscape16x9,
        ]
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|ratio| ratio.as_str() == trimmed)
            .ok_or_else(|| {
                GenerationError::Validation(format!(
                    "unsupported aspect ratio `{trimmed}` (expected one of 1:1, 3:4, 4:3, 9:16, 16:9)"
                ))
            })
    }
}

/// A single prompt-to-image request. Built per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text description of the desired image.
    pub prompt: String,
    /// Output shape.
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    /// Create a new request.
    pub fn new(prompt: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio,
        }
    }

    /// Rejects blank prompts.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::Validation("prompt must not be empty".into()));
        }
        Ok(())
    }
}

/// A successfully generated image.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// MIME type reported by the provider, or [`DEFAULT_IMAGE_MIME`].
    pub mime_type: String,
    /// Decoded image bytes.
    pub data: Vec<u8>,
    /// The prompt that produced the image.
    pub prompt: String,
}

impl GeneratedImage {
    /// Render as a self-contained `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.data))
    }
}

impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .field("prompt", &self.prompt)
            .finish()
    }
}

/// Outcome of one generation attempt.
pub type GenerationResult = Result<GeneratedImage, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_wire_form() {
        assert_eq!(AspectRatio::Landscape16x9.to_string(), "16:9");
        assert_eq!(AspectRatio::Square.as_str(), "1:1");
    }

    #[test]
    fn aspect_ratio_parses_every_variant() {
        for ratio in AspectRatio::all() {
            let parsed: AspectRatio = ratio.as_str().parse().expect("parse");
            assert_eq!(parsed, *ratio);
        }
    }

    #[test]
    fn aspect_ratio_rejects_unknown() {
        let err = "21:9".parse::<AspectRatio>().unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");
        assert!(err.to_string().contains("21:9"));
    }

    #[test]
    fn aspect_ratio_default_is_phone_portrait() {
        assert_eq!(AspectRatio::default(), AspectRatio::Portrait9x16);
    }

    #[test]
    fn aspect_ratio_serializes_as_ratio_string() {
        let json = serde_json::to_string(&AspectRatio::Landscape4x3).expect("serialize");
        assert_eq!(json, "\"4:3\"");
    }

    #[test]
    fn blank_prompt_rejected() {
        let request = GenerationRequest::new("   ", AspectRatio::Square);
        assert!(request.validate().is_err());
        let request = GenerationRequest::new("sunset", AspectRatio::Square);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn data_uri_is_self_describing() {
        let image = GeneratedImage {
            mime_type: "image/png".into(),
            data: vec![1, 2, 3],
            prompt: "dots".into(),
        };
        assert_eq!(image.to_data_uri(), "data:image/png;base64,AQID");
    }

    #[test]
    fn debug_omits_raw_bytes() {
        let image = GeneratedImage {
            mime_type: "image/png".into(),
            data: vec![0; 1024],
            prompt: "big".into(),
        };
        let debug = format!("{image:?}");
        assert!(debug.contains("bytes: 1024"));
    }
}
