//! Saved-wallpaper favorites mirrored to durable storage.
//!
//! [`FavoritesSet`] is a plain value; [`FavoritesStore`] is the only writer
//! of the storage key. The whole set is written on every toggle. Persistence
//! is best effort: unreadable data loads as an empty set and failed writes
//! are logged, never surfaced.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::storage::{Storage, StorageError};

/// Storage key holding the JSON array of saved ids.
pub const DEFAULT_FAVORITES_KEY: &str = "wallsf1_saved";

/// The ids a user has saved.
///
/// Ids of items no longer in the gallery may linger; they are simply
/// never matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: BTreeSet<String>,
}

impl FavoritesSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is saved.
    pub fn is_saved(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// A copy of this set with `id` added if absent, removed if present.
    #[must_use]
    pub fn toggled(&self, id: &str) -> Self {
        let mut ids = self.ids.clone();
        if !ids.remove(id) {
            ids.insert(id.to_owned());
        }
        Self { ids }
    }

    /// Number of saved ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate saved ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.ids)
    }
}

impl<S: Into<String>> FromIterator<S> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Loads and persists a [`FavoritesSet`] under one storage key.
#[derive(Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Store using [`DEFAULT_FAVORITES_KEY`].
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_key(storage, DEFAULT_FAVORITES_KEY)
    }

    /// Store using a custom key.
    pub fn with_key(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the saved set. Absent or unparseable data yields an empty set.
    pub fn load(&self) -> FavoritesSet {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FavoritesSet::new(),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "favorites unreadable, starting empty");
                return FavoritesSet::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => {
                tracing::debug!(count = ids.len(), "favorites loaded");
                ids.into_iter().collect()
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "favorites corrupt, starting empty");
                FavoritesSet::new()
            }
        }
    }

    /// Flip `id` in `set`, persist the full result, and return it.
    ///
    /// A failed write is logged; the returned set is still the new state.
    pub fn toggle(&self, set: &FavoritesSet, id: &str) -> FavoritesSet {
        let next = set.toggled(id);
        if let Err(e) = self.persist(&next) {
            tracing::warn!(error = %e, %id, "failed to persist favorites");
        }
        next
    }

    /// Overwrite the stored set with `set`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend write fails.
    pub fn persist(&self, set: &FavoritesSet) -> Result<(), StorageError> {
        let json = set
            .to_json()
            .map_err(|e| StorageError::Io(format!("failed to serialize favorites: {e}")))?;
        self.storage.set(&self.key, &json)
    }
}
