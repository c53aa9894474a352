//! Gallery item model.
//!
//! A [`GalleryItem`] is immutable once built. Its image is an [`ImageRef`]:
//! either bytes embedded in the item or a remote URL, never both.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use wallsf1_genai::GeneratedImage;

use super::GalleryError;

/// Prefix that marks a textual image reference as self-contained.
pub const DATA_URI_PREFIX: &str = "data:";

const BASE64_MARKER: &str = ";base64";

/// `s` without `prefix`, compared ASCII case-insensitively.
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    let rest = s.get(prefix.len()..)?;
    head.eq_ignore_ascii_case(prefix).then_some(rest)
}

/// `s` without `suffix`, compared ASCII case-insensitively.
fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let at = s.len().checked_sub(suffix.len())?;
    let tail = s.get(at..)?;
    tail.eq_ignore_ascii_case(suffix).then_some(&s[..at])
}

/// Image bytes carried inside the item.
#[derive(Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    mime_type: String,
    data: Vec<u8>,
}

impl EmbeddedImage {
    /// Wrap raw bytes with their MIME type.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// MIME type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Render as a `data:<mime>;base64,<payload>` URI.
    pub fn to_data_uri(&self) -> String {
        format!(
            "{DATA_URI_PREFIX}{};base64,{}",
            self.mime_type,
            BASE64.encode(&self.data)
        )
    }

    /// Parse a base64 `data:` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, GalleryError> {
        let invalid = |reason: &str| GalleryError::InvalidImageRef(format!("{reason}: {uri:.48}"));

        let uri = uri.trim();
        let rest = strip_prefix_ignore_case(uri, DATA_URI_PREFIX)
            .ok_or_else(|| invalid("missing data: prefix"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| invalid("missing payload separator"))?;
        let mime_type = strip_suffix_ignore_case(header, BASE64_MARKER)
            .ok_or_else(|| invalid("only base64 data URIs are supported"))?;
        let data = BASE64
            .decode(payload.trim())
            .map_err(|e| invalid(&format!("invalid base64 ({e})")))?;

        Ok(Self::new(mime_type, data))
    }
}

impl fmt::Debug for EmbeddedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedImage")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl From<GeneratedImage> for EmbeddedImage {
    fn from(image: GeneratedImage) -> Self {
        Self::new(image.mime_type, image.data)
    }
}

/// Where an item's pixels live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageRef {
    /// Self-contained bytes; rendering needs no network fetch.
    Embedded(EmbeddedImage),
    /// URL of externally hosted bytes.
    Remote(String),
}

impl ImageRef {
    /// Classify a textual reference: `data:` URIs are embedded, anything
    /// else must be an absolute URL.
    pub fn parse(s: &str) -> Result<Self, GalleryError> {
        let s = s.trim();
        if strip_prefix_ignore_case(s, DATA_URI_PREFIX).is_some() {
            return EmbeddedImage::from_data_uri(s).map(Self::Embedded);
        }
        let url = url::Url::parse(s)
            .map_err(|e| GalleryError::InvalidImageRef(format!("{e}: {s:.48}")))?;
        Ok(Self::Remote(url.into()))
    }

    /// Shorthand for a remote reference.
    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote(url.into())
    }

    /// Whether the bytes are carried inline.
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }

    /// The embedded image, if any.
    pub fn as_embedded(&self) -> Option<&EmbeddedImage> {
        match self {
            Self::Embedded(image) => Some(image),
            Self::Remote(_) => None,
        }
    }

    /// The remote URL, if any.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            Self::Remote(url) => Some(url),
            Self::Embedded(_) => None,
        }
    }

    /// Something a browser can open: the URL, or a `data:` URI.
    pub fn locator(&self) -> String {
        match self {
            Self::Embedded(image) => image.to_data_uri(),
            Self::Remote(url) => url.clone(),
        }
    }
}

impl TryFrom<String> for ImageRef {
    type Error = GalleryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageRef> for String {
    fn from(image: ImageRef) -> Self {
        image.locator()
    }
}

/// A displayable wallpaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    id: String,
    #[serde(rename = "url")]
    image: ImageRef,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default)]
    is_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
}

impl GalleryItem {
    /// Create a seeded or uploaded item with no author.
    pub fn new(id: impl Into<String>, image: ImageRef, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image,
            title: title.into(),
            author: None,
            is_generated: false,
            prompt: None,
        }
    }

    /// Create an item produced by the generation client.
    pub fn generated(
        id: impl Into<String>,
        image: EmbeddedImage,
        title: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            is_generated: true,
            prompt: Some(prompt.into()),
            ..Self::new(id, ImageRef::Embedded(image), title)
        }
    }

    /// Set the attribution.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Unique id within the gallery.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Image reference.
    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Attribution, if any.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Whether the generation client produced this item.
    pub fn is_generated(&self) -> bool {
        self.is_generated
    }

    /// Prompt that produced the image (generated items only).
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }
}
