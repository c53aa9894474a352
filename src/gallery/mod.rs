//! Gallery items and the in-memory collection that owns them.

pub mod item;
pub mod seed;
pub mod state;

pub use item::{EmbeddedImage, GalleryItem, ImageRef};
pub use seed::curated_wallpapers;
pub use state::{GalleryState, GalleryTab};

/// Errors raised by the gallery model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GalleryError {
    /// An item with this id is already in the gallery.
    #[error("duplicate wallpaper id `{0}`")]
    DuplicateId(String),

    /// A textual image reference could not be interpreted.
    #[error("invalid image reference: {0}")]
    InvalidImageRef(String),
}

/// Mint a fresh item id: `<prefix>-<unix millis>-<6 random digits>`.
pub(crate) fn mint_id(prefix: &str) -> String {
    use rand::Rng as _;
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{prefix}-{millis}-{suffix:06}")
}
