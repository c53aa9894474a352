//! Built-in curated wallpapers shown before any user content exists.

use super::{GalleryItem, ImageRef};

/// `(id, seed, title, author)` for each curated wallpaper.
const CURATED: &[(&str, &str, &str, &str)] = &[
    ("1", "liquid1", "Deep Ocean Flow", "LiquidAI"),
    ("2", "neon2", "Neon Glass Shards", "Gemini"),
    ("3", "abstract3", "Pastel Dreams", "Studio"),
    ("4", "dark4", "Obsidian Ripples", "DarkMode"),
    ("5", "glass5", "Frosted Aurora", "Frost"),
    ("6", "tech6", "Cyber Fluid", "Net"),
    ("7", "red7", "Crimson Tide", "Flow"),
    ("8", "blue8", "Azure Glitch", "System"),
];

/// The curated seed set, in display order.
pub fn curated_wallpapers() -> Vec<GalleryItem> {
    CURATED
        .iter()
        .map(|(id, seed, title, author)| {
            GalleryItem::new(
                *id,
                ImageRef::remote(format!("https://picsum.photos/seed/{seed}/800/1200")),
                *title,
            )
            .with_author(*author)
        })
        .collect()
}
