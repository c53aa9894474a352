//! Centralized application directory paths for WallsF1.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | App data | `~/Library/Application Support/wallsf1/` | `~/.local/share/wallsf1/` |
//! | Config | `~/Library/Application Support/wallsf1/` | `~/.config/wallsf1/` |
//! | Downloads | `~/Downloads/` | `~/Downloads/` |
//!
//! # Environment Overrides
//!
//! - `WALLSF1_DATA_DIR`: overrides [`data_dir`]
//! - `WALLSF1_CONFIG_DIR`: overrides [`config_dir`]
//! - `WALLSF1_DOWNLOAD_DIR`: overrides [`download_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Holds the durable key/value store (favorites). Resolves to
/// `dirs::data_dir()/wallsf1/` by default.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("WALLSF1_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    ::dirs::data_dir()
        .map(|d| d.join("wallsf1"))
        .unwrap_or_else(|| PathBuf::from("/tmp/wallsf1-data"))
}

/// Application config directory. Resolves to `dirs::config_dir()/wallsf1/`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("WALLSF1_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    ::dirs::config_dir()
        .map(|d| d.join("wallsf1"))
        .unwrap_or_else(|| PathBuf::from("/tmp/wallsf1-config"))
}

/// Where exported wallpapers are written.
///
/// Resolves to the user's download directory, falling back to
/// `data_dir()/downloads/` when the platform has none.
#[must_use]
pub fn download_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("WALLSF1_DOWNLOAD_DIR") {
        return PathBuf::from(override_dir);
    }
    ::dirs::download_dir().unwrap_or_else(|| data_dir().join("downloads"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Durable key/value store path (`data_dir()/storage.json`).
#[must_use]
pub fn storage_file() -> PathBuf {
    data_dir().join("storage.json")
}
