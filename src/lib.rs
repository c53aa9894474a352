//! WallsF1: wallpaper gallery core.
//!
//! Browse a curated set of wallpapers, generate new ones from a text prompt,
//! import local images, keep favorites across restarts and save any image to
//! disk.
//!
//! # Architecture
//!
//! - **Gallery**: ordered, id-unique in-memory collection ([`gallery`])
//! - **Favorites**: saved ids mirrored to durable storage ([`favorites`], [`storage`])
//! - **Generation**: prompt-to-image via the `wallsf1-genai` crate
//! - **Upload**: local file to embedded item ([`upload`])
//! - **Export**: embedded or remote image to the download directory ([`export`])
//! - **Session**: the view state a front end renders ([`session`])

pub mod config;
pub mod error;
pub mod export;
pub mod favorites;
pub mod gallery;
pub mod session;
pub mod storage;
pub mod upload;
pub mod walls_dirs;

pub use config::WallsConfig;
pub use error::{Result, WallsError};
pub use export::{DownloadExporter, ExportOutcome, LinkOpener, SystemOpener};
pub use favorites::{FavoritesSet, FavoritesStore};
pub use gallery::{EmbeddedImage, GalleryItem, GalleryState, GalleryTab, ImageRef};
pub use session::Session;
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use upload::{LocalFile, UploadIngestor};

pub use wallsf1_genai::{AspectRatio, GenerationError, ImageProvider};
