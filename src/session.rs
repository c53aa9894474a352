//! One user's gallery session.
//!
//! [`Session`] ties the gallery, favorites, generation, upload and export
//! together and holds the view state a front end renders: the active tab,
//! the previewed item, the prompt draft and the last generation error.

use std::sync::Arc;

use wallsf1_genai::{
    AspectRatio, GeminiProvider, GenerationError, GenerationRequest, GenerationResult,
    ImageProvider,
};

use crate::config::WallsConfig;
use crate::error::{Result, WallsError};
use crate::export::{DownloadExporter, ExportOutcome};
use crate::favorites::{FavoritesSet, FavoritesStore};
use crate::gallery::{curated_wallpapers, mint_id, GalleryItem, GalleryState, GalleryTab};
use crate::storage::JsonFileStorage;
use crate::upload::{LocalFile, UploadError, UploadIngestor};

/// Title given to every generated wallpaper.
pub const GENERATED_TITLE: &str = "AI Masterpiece";

/// Attribution given to every generated wallpaper.
pub const GENERATED_AUTHOR: &str = "You";

/// Clears the in-flight flag when dropped, so a generation future that is
/// dropped before completing does not leave the session stuck.
struct InFlight<'a>(&'a mut bool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Gallery session state and operations.
pub struct Session<P> {
    gallery: GalleryState,
    favorites_store: FavoritesStore,
    favorites: FavoritesSet,
    provider: P,
    ingestor: UploadIngestor,
    exporter: DownloadExporter,
    generated: Vec<GalleryItem>,
    tab: GalleryTab,
    selected: Option<String>,
    draft_prompt: String,
    draft_ratio: AspectRatio,
    is_generating: bool,
    last_error: Option<String>,
}

impl<P> std::fmt::Debug for Session<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("items", &self.gallery.len())
            .field("favorites", &self.favorites.len())
            .field("tab", &self.tab)
            .field("selected", &self.selected)
            .field("is_generating", &self.is_generating)
            .finish_non_exhaustive()
    }
}

impl Session<GeminiProvider> {
    /// Build a session wired to Gemini, file-backed favorites and the
    /// configured download directory.
    ///
    /// # Errors
    ///
    /// Returns [`WallsError::Generation`] if the generation endpoint
    /// settings are invalid.
    pub fn from_config(config: &WallsConfig) -> Result<Self> {
        let provider = GeminiProvider::new(config.generation.to_client_config())?;
        let storage = Arc::new(JsonFileStorage::new(config.storage.resolved_path()));
        let favorites = FavoritesStore::with_key(storage, config.storage.favorites_key.clone());
        let exporter = DownloadExporter::new(config.export.resolved_download_dir())
            .with_prefix(config.export.filename_prefix.clone());

        Ok(Self::new(provider, favorites, exporter)
            .with_draft_ratio(config.generation.default_aspect_ratio))
    }
}

impl<P: ImageProvider> Session<P> {
    /// Start a session seeded with the curated wallpapers and the saved
    /// favorites.
    pub fn new(provider: P, favorites_store: FavoritesStore, exporter: DownloadExporter) -> Self {
        let mut gallery = GalleryState::new();
        gallery.seed(curated_wallpapers());
        let favorites = favorites_store.load();
        tracing::debug!(
            provider = provider.name(),
            items = gallery.len(),
            favorites = favorites.len(),
            "session started"
        );

        Self {
            gallery,
            favorites_store,
            favorites,
            provider,
            ingestor: UploadIngestor::new(),
            exporter,
            generated: Vec::new(),
            tab: GalleryTab::default(),
            selected: None,
            draft_prompt: String::new(),
            draft_ratio: AspectRatio::default(),
            is_generating: false,
            last_error: None,
        }
    }

    /// Preselect an aspect ratio for the prompt form.
    #[must_use]
    pub fn with_draft_ratio(mut self, ratio: AspectRatio) -> Self {
        self.draft_ratio = ratio;
        self
    }

    // ── Views ─────────────────────────────────────────────────

    /// The underlying gallery.
    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    /// Items for the active tab: favorites on [`GalleryTab::Saved`], all
    /// items otherwise.
    pub fn visible_items(&self) -> Vec<&GalleryItem> {
        self.gallery.view(self.tab, &self.favorites)
    }

    /// Items generated in this session, newest first.
    pub fn generated(&self) -> &[GalleryItem] {
        &self.generated
    }

    /// Active tab.
    pub fn tab(&self) -> GalleryTab {
        self.tab
    }

    /// Switch tab.
    pub fn set_tab(&mut self, tab: GalleryTab) {
        self.tab = tab;
    }

    /// Preview the item with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`WallsError::UnknownItem`] if no such item exists.
    pub fn select(&mut self, id: &str) -> Result<&GalleryItem> {
        let item = self
            .gallery
            .get(id)
            .ok_or_else(|| WallsError::UnknownItem(id.to_owned()))?;
        self.selected = Some(id.to_owned());
        Ok(item)
    }

    /// Close the preview.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The previewed item, if any.
    pub fn selected(&self) -> Option<&GalleryItem> {
        self.selected.as_deref().and_then(|id| self.gallery.get(id))
    }

    // ── Favorites ─────────────────────────────────────────────

    /// Current favorites.
    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Whether `id` is saved.
    pub fn is_saved(&self, id: &str) -> bool {
        self.favorites.is_saved(id)
    }

    /// Flip `id` in the favorites and persist. Returns whether it is now saved.
    ///
    /// Ids need not be in the gallery, so stale favorites can be removed.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        self.favorites = self.favorites_store.toggle(&self.favorites, id);
        self.favorites.is_saved(id)
    }

    // ── Generation ────────────────────────────────────────────

    /// Prompt text as last entered. Kept after a successful generation.
    pub fn draft_prompt(&self) -> &str {
        &self.draft_prompt
    }

    /// Replace the prompt draft.
    pub fn set_draft_prompt(&mut self, prompt: impl Into<String>) {
        self.draft_prompt = prompt.into();
    }

    /// Aspect ratio selected in the prompt form.
    pub fn draft_ratio(&self) -> AspectRatio {
        self.draft_ratio
    }

    /// Select an aspect ratio.
    pub fn set_draft_ratio(&mut self, ratio: AspectRatio) {
        self.draft_ratio = ratio;
    }

    /// Whether a generation request is outstanding.
    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// User-facing message from the last failed generation.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The generation backend.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generate a wallpaper from `prompt` and add it to the front of the
    /// gallery.
    ///
    /// On success the new item is selected, the tab switches to
    /// [`GalleryTab::Explore`] and the prompt stays in the draft.
    ///
    /// # Errors
    ///
    /// [`WallsError::GenerationInProgress`] if a request is outstanding;
    /// otherwise the classified [`WallsError::Generation`] failure, whose
    /// user message is also kept in [`last_error`](Self::last_error).
    pub async fn generate(&mut self, prompt: &str, ratio: AspectRatio) -> Result<&GalleryItem> {
        let request = self.begin_generation(prompt, ratio)?;
        let result = {
            let _in_flight = InFlight(&mut self.is_generating);
            self.provider.generate(&request).await
        };
        self.finish_generation(result)
    }

    /// Mark a generation as started and build its request.
    ///
    /// For front ends that drive the provider call themselves; pair with
    /// [`finish_generation`](Self::finish_generation).
    ///
    /// # Errors
    ///
    /// Returns [`WallsError::GenerationInProgress`] if one is outstanding.
    pub fn begin_generation(
        &mut self,
        prompt: &str,
        ratio: AspectRatio,
    ) -> Result<GenerationRequest> {
        if self.is_generating {
            return Err(WallsError::GenerationInProgress);
        }
        self.is_generating = true;
        self.last_error = None;
        self.draft_prompt = prompt.to_owned();
        self.draft_ratio = ratio;
        tracing::trace!(%prompt, %ratio, "generation started");
        Ok(GenerationRequest::new(prompt, ratio))
    }

    /// Record the outcome of a generation started with
    /// [`begin_generation`](Self::begin_generation).
    ///
    /// # Errors
    ///
    /// Returns the generation failure, or [`WallsError::Gallery`] if the
    /// minted id collides.
    pub fn finish_generation(&mut self, result: GenerationResult) -> Result<&GalleryItem> {
        self.is_generating = false;

        let image = match result {
            Ok(image) => image,
            Err(e) => return Err(self.record_failure(e)),
        };

        let prompt = image.prompt.clone();
        let item = GalleryItem::generated(mint_id("gen"), image.into(), GENERATED_TITLE, prompt)
            .with_author(GENERATED_AUTHOR);
        let id = item.id().to_owned();

        self.gallery.insert_front(item.clone())?;
        self.generated.insert(0, item);
        self.tab = GalleryTab::Explore;
        self.selected = Some(id.clone());
        tracing::info!(%id, "wallpaper generated");

        self.gallery
            .get(&id)
            .ok_or_else(|| WallsError::UnknownItem(id))
    }

    fn record_failure(&mut self, error: GenerationError) -> WallsError {
        tracing::warn!(code = error.code(), error = %error, "generation failed");
        self.last_error = Some(error.user_message());
        error.into()
    }

    // ── Upload / export ───────────────────────────────────────

    /// Ingest a local file and add it to the front of the gallery.
    ///
    /// Non-image files are ignored and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`WallsError::Upload`] if the file cannot be read.
    pub async fn upload(
        &mut self,
        file: LocalFile,
        title: Option<&str>,
    ) -> Result<Option<&GalleryItem>> {
        let item = match self.ingestor.ingest(file, title).await {
            Ok(item) => item,
            Err(UploadError::NotAnImage { name, content_type }) => {
                tracing::info!(%name, %content_type, "ignoring non-image upload");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let id = item.id().to_owned();
        self.gallery.insert_front(item)?;
        self.tab = GalleryTab::Explore;
        tracing::info!(%id, "wallpaper uploaded");
        Ok(self.gallery.get(&id))
    }

    /// Export the item with `id` to the download directory.
    ///
    /// # Errors
    ///
    /// Returns [`WallsError::UnknownItem`] if no such item exists. Save
    /// failures are reported through the [`ExportOutcome`].
    pub async fn export(&self, id: &str) -> Result<ExportOutcome> {
        let item = self
            .gallery
            .get(id)
            .ok_or_else(|| WallsError::UnknownItem(id.to_owned()))?;
        Ok(self.exporter.export(item).await)
    }
}
