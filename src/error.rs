//! Error types for the wallsf1 gallery core.

use crate::gallery::GalleryError;
use crate::storage::StorageError;
use crate::upload::UploadError;
use wallsf1_genai::GenerationError;

/// Top-level error type for the gallery core.
#[derive(Debug, thiserror::Error)]
pub enum WallsError {
    /// Configuration file or value error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Durable key/value storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Gallery state invariant violation.
    #[error("gallery error: {0}")]
    Gallery(#[from] GalleryError),

    /// Local image ingestion error.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Image generation error.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    /// A second generation was requested while one is still running.
    #[error("a generation request is already in progress")]
    GenerationInProgress,

    /// No gallery item has the requested id.
    #[error("no wallpaper with id `{0}`")]
    UnknownItem(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, WallsError>;
