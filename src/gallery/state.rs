//! The in-memory collection of gallery items.

use std::collections::{HashSet, VecDeque};

use super::{GalleryError, GalleryItem};
use crate::favorites::FavoritesSet;

/// Which view of the gallery is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GalleryTab {
    /// Every item.
    #[default]
    Explore,
    /// The prompt form.
    Generate,
    /// Saved items only.
    Saved,
}

/// Authoritative, ordered list of displayable items.
///
/// Seeds keep their order; user-created items are prepended so the newest
/// appears first. Ids are unique at all times.
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    items: VecDeque<GalleryItem>,
    ids: HashSet<String>,
}

impl GalleryState {
    /// Create an empty gallery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with `items`, in order.
    ///
    /// A later item whose id was already seen is dropped with a warning.
    pub fn seed(&mut self, items: impl IntoIterator<Item = GalleryItem>) {
        self.items.clear();
        self.ids.clear();
        for item in items {
            if self.ids.contains(item.id()) {
                tracing::warn!(id = item.id(), "duplicate seed id dropped");
                continue;
            }
            self.ids.insert(item.id().to_owned());
            self.items.push_back(item);
        }
        tracing::debug!(count = self.items.len(), "gallery seeded");
    }

    /// Prepend `item`.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::DuplicateId`] if an item with the same id is
    /// already present; the existing item is left untouched.
    pub fn insert_front(&mut self, item: GalleryItem) -> Result<(), GalleryError> {
        if self.ids.contains(item.id()) {
            return Err(GalleryError::DuplicateId(item.id().to_owned()));
        }
        self.ids.insert(item.id().to_owned());
        self.items.push_front(item);
        Ok(())
    }

    /// All items, newest user content first, then seeds in seed order.
    pub fn view_all(&self) -> Vec<&GalleryItem> {
        self.items.iter().collect()
    }

    /// The items whose id is in `favorites`, in [`view_all`](Self::view_all) order.
    pub fn view_favorites(&self, favorites: &FavoritesSet) -> Vec<&GalleryItem> {
        self.items
            .iter()
            .filter(|item| favorites.is_saved(item.id()))
            .collect()
    }

    /// The items a tab shows: favorites for [`GalleryTab::Saved`], everything
    /// otherwise.
    pub fn view(&self, tab: GalleryTab, favorites: &FavoritesSet) -> Vec<&GalleryItem> {
        match tab {
            GalleryTab::Saved => self.view_favorites(favorites),
            GalleryTab::Explore | GalleryTab::Generate => self.view_all(),
        }
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&GalleryItem> {
        if !self.ids.contains(id) {
            return None;
        }
        self.items.iter().find(|item| item.id() == id)
    }

    /// Whether an item with `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the gallery is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::ImageRef;

    fn item(id: &str) -> GalleryItem {
        GalleryItem::new(id, ImageRef::remote(format!("https://img/{id}")), format!("Item {id}"))
    }

    fn ids(items: &[&GalleryItem]) -> Vec<String> {
        items.iter().map(|i| i.id().to_owned()).collect()
    }

    #[test]
    fn seed_preserves_order() {
        let mut state = GalleryState::new();
        state.seed(vec![item("1"), item("2"), item("3")]);
        assert_eq!(ids(&state.view_all()), vec!["1", "2", "3"]);
    }

    #[test]
    fn seed_drops_duplicates_keeping_first() {
        let mut state = GalleryState::new();
        let first = item("1");
        let dup = GalleryItem::new("1", ImageRef::remote("https://other"), "Other");
        state.seed(vec![first.clone(), item("2"), dup]);
        assert_eq!(state.len(), 2);
        assert_eq!(state.get("1"), Some(&first));
    }

    #[test]
    fn seed_replaces_previous_contents() {
        let mut state = GalleryState::new();
        state.seed(vec![item("1")]);
        state.seed(vec![item("2")]);
        assert!(!state.contains("1"));
        assert_eq!(ids(&state.view_all()), vec!["2"]);
    }

    #[test]
    fn insert_front_prepends() {
        let mut state = GalleryState::new();
        state.seed(vec![item("1"), item("2")]);
        state.insert_front(item("upload-a")).expect("insert");
        state.insert_front(item("gen-b")).expect("insert");
        assert_eq!(ids(&state.view_all()), vec!["gen-b", "upload-a", "1", "2"]);
    }

    #[test]
    fn insert_duplicate_rejected_without_overwrite() {
        let mut state = GalleryState::new();
        let original = item("7");
        state.seed(vec![original.clone()]);
        let imposter = GalleryItem::new("7", ImageRef::remote("https://evil"), "Imposter");
        let err = state.insert_front(imposter).unwrap_err();
        assert!(matches!(err, GalleryError::DuplicateId(ref id) if id == "7"));
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("7"), Some(&original));
    }

    #[test]
    fn ids_stay_unique_across_many_inserts() {
        let mut state = GalleryState::new();
        state.seed((0..5).map(|i| item(&i.to_string())));
        for i in 0..10 {
            let _ = state.insert_front(item(&(i % 7).to_string()));
        }
        let all = state.view_all();
        let unique: HashSet<&str> = all.iter().map(|i| i.id()).collect();
        assert_eq!(unique.len(), all.len());
        assert_eq!(all.len(), 7);
    }

    #[test]
    fn favorites_view_is_ordered_subsequence() {
        let mut state = GalleryState::new();
        state.seed(vec![item("1"), item("2"), item("3"), item("4")]);
        state.insert_front(item("gen-1")).expect("insert");
        let favorites: FavoritesSet = ["4", "gen-1", "2", "stale"].into_iter().collect();

        let all = state.view_all();
        let saved = state.view_favorites(&favorites);
        assert_eq!(ids(&saved), vec!["gen-1", "2", "4"]);

        let mut cursor = all.iter();
        for wanted in &saved {
            assert!(favorites.is_saved(wanted.id()));
            assert!(cursor.any(|candidate| candidate.id() == wanted.id()));
        }
    }

    #[test]
    fn view_selects_by_tab() {
        let mut state = GalleryState::new();
        state.seed(vec![item("1"), item("2"), item("3")]);
        let favorites: FavoritesSet = ["3"].into_iter().collect();

        assert_eq!(ids(&state.view(GalleryTab::Explore, &favorites)), vec!["1", "2", "3"]);
        assert_eq!(ids(&state.view(GalleryTab::Generate, &favorites)), vec!["1", "2", "3"]);
        assert_eq!(ids(&state.view(GalleryTab::Saved, &favorites)), vec!["3"]);
        assert!(state.view(GalleryTab::Saved, &FavoritesSet::new()).is_empty());
    }

    #[test]
    fn empty_views_are_valid() {
        let state = GalleryState::new();
        assert!(state.view_all().is_empty());
        assert!(state.view_favorites(&FavoritesSet::new()).is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn get_missing_is_none() {
        let mut state = GalleryState::new();
        state.seed(vec![item("1")]);
        assert!(state.get("2").is_none());
    }
}
