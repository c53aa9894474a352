//! Turning a user-selected local file into a gallery item.
//!
//! Both entry points (file picker and drag-and-drop) funnel through
//! [`LocalFile`]; [`UploadIngestor::ingest`] reads the bytes, checks that
//! they are an image and builds an embedded [`GalleryItem`].

use std::path::{Path, PathBuf};

use crate::gallery::{mint_id, EmbeddedImage, GalleryItem, ImageRef};

/// Attribution applied to every uploaded item.
pub const UPLOAD_AUTHOR: &str = "You (Uploaded)";

/// Title used when none can be derived from the file name.
pub const UNTITLED: &str = "Untitled";

/// Errors raised while ingesting a local file.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file's content type is not `image/*`.
    #[error("`{name}` is not an image (content type: {content_type})")]
    NotAnImage {
        /// File name as presented by the user.
        name: String,
        /// Content type that was detected, or `unknown`.
        content_type: String,
    },

    /// The file could not be read.
    #[error("failed to read `{name}`: {reason}")]
    Read {
        /// File name as presented by the user.
        name: String,
        /// Underlying cause.
        reason: String,
    },
}

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A user-selected file awaiting ingestion.
#[derive(Debug, Clone)]
pub struct LocalFile {
    name: String,
    content_type: Option<String>,
    source: Source,
}

impl LocalFile {
    /// A file picked from disk. The content type is guessed from the
    /// extension; unknown extensions are sniffed after reading.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = image::ImageFormat::from_path(path)
            .ok()
            .map(|format| format.to_mime_type().to_owned());
        Self {
            name,
            content_type,
            source: Source::Path(path.to_path_buf()),
        }
    }

    /// A dropped payload with the content type reported by the drop source.
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let content_type: String = content_type.into();
        Self {
            name: name.into(),
            content_type: (!content_type.trim().is_empty()).then_some(content_type),
            source: Source::Bytes(bytes),
        }
    }

    /// File name as presented by the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content type known before reading, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    async fn read(self) -> Result<(Option<String>, Vec<u8>), UploadError> {
        let bytes = match self.source {
            Source::Bytes(bytes) => bytes,
            Source::Path(path) => tokio::fs::read(&path).await.map_err(|e| UploadError::Read {
                name: self.name.clone(),
                reason: e.to_string(),
            })?,
        };
        Ok((self.content_type, bytes))
    }
}

/// Builds gallery items from local files.
#[derive(Debug, Clone, Default)]
pub struct UploadIngestor;

impl UploadIngestor {
    /// Create an ingestor.
    pub fn new() -> Self {
        Self
    }

    /// Read `file` and produce an embedded gallery item.
    ///
    /// A blank `explicit_title` falls back to [`derive_title`].
    ///
    /// # Errors
    ///
    /// [`UploadError::NotAnImage`] if the content type (declared, guessed or
    /// sniffed) is not `image/*`; [`UploadError::Read`] if the bytes cannot
    /// be read.
    pub async fn ingest(
        &self,
        file: LocalFile,
        explicit_title: Option<&str>,
    ) -> Result<GalleryItem, UploadError> {
        let name = file.name.clone();

        match file.content_type() {
            Some(declared) if !is_image_type(declared) => {
                return Err(UploadError::NotAnImage {
                    name,
                    content_type: declared.to_owned(),
                });
            }
            _ => {}
        }

        let (declared, bytes) = file.read().await?;
        let content_type = declared
            .or_else(|| sniff_content_type(&bytes))
            .ok_or_else(|| UploadError::NotAnImage {
                name: name.clone(),
                content_type: "unknown".to_owned(),
            })?;
        if !is_image_type(&content_type) {
            return Err(UploadError::NotAnImage { name, content_type });
        }

        let title = match explicit_title.map(str::trim) {
            Some(title) if !title.is_empty() => title.to_owned(),
            _ => derive_title(&name),
        };

        tracing::debug!(%name, %content_type, bytes = bytes.len(), "upload ingested");
        let image = ImageRef::Embedded(EmbeddedImage::new(content_type, bytes));
        Ok(GalleryItem::new(mint_id("upload"), image, title).with_author(UPLOAD_AUTHOR))
    }
}

fn is_image_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

fn sniff_content_type(bytes: &[u8]) -> Option<String> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type().to_owned())
}

/// Default title for an uploaded file.
///
/// Drops the last extension, splits on `-` and `_`, upper-cases the first
/// letter of each word and joins with spaces. Falls back to [`UNTITLED`].
pub fn derive_title(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => file_name,
    };

    let title = stem
        .split(['-', '_'])
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if title.trim().is_empty() {
        UNTITLED.to_owned()
    } else {
        title
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
