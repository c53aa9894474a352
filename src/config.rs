//! Configuration types for the wallpaper gallery.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::WallsError;
use crate::export::DEFAULT_FILENAME_PREFIX;
use crate::favorites::DEFAULT_FAVORITES_KEY;
use wallsf1_genai::config::{DEFAULT_API_BASE, DEFAULT_MODEL};
use wallsf1_genai::{AspectRatio, GenerationConfig};

/// Secondary variable consulted when the configured one is unset.
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallsConfig {
    /// Image generation settings.
    pub generation: GenerationSettings,
    /// Favorites storage settings.
    pub storage: StorageSettings,
    /// Download export settings.
    pub export: ExportSettings,
}

/// Image generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Provider model id.
    pub model: String,
    /// Provider API base URL.
    pub api_base: String,
    /// Environment variable holding the API key.
    ///
    /// `API_KEY` is consulted as well when this one is unset.
    pub api_key_env: String,
    /// Aspect ratio preselected for new prompts.
    pub default_aspect_ratio: AspectRatio,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
            api_key_env: "GEMINI_API_KEY".to_owned(),
            default_aspect_ratio: AspectRatio::default(),
        }
    }
}

impl GenerationSettings {
    /// Build the client configuration, reading the API key from the
    /// environment.
    pub fn to_client_config(&self) -> GenerationConfig {
        let mut names = vec![self.api_key_env.as_str()];
        if self.api_key_env != FALLBACK_API_KEY_ENV {
            names.push(FALLBACK_API_KEY_ENV);
        }
        GenerationConfig::from_env_vars(&names)
            .with_base_url(self.api_base.clone())
            .with_model(self.model.clone())
    }
}

/// Favorites storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage file (None = `walls_dirs::storage_file()`).
    pub path: Option<PathBuf>,
    /// Key the favorites array is stored under.
    pub favorites_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: None,
            favorites_key: DEFAULT_FAVORITES_KEY.to_owned(),
        }
    }
}

impl StorageSettings {
    /// The configured storage file, or the platform default.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(crate::walls_dirs::storage_file)
    }
}

/// Download export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Target directory (None = `walls_dirs::download_dir()`).
    pub download_dir: Option<PathBuf>,
    /// Prefix for exported file names.
    pub filename_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            download_dir: None,
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_owned(),
        }
    }
}

impl ExportSettings {
    /// The configured download directory, or the platform default.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(crate::walls_dirs::download_dir)
    }
}

impl WallsConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WallsError::Config(e.to_string()))
    }

    /// Load from [`Self::default_config_path`], or defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default() -> crate::error::Result<Self> {
        let path = Self::default_config_path();
        if path.exists() {
            Self::from_file(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| WallsError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config_dir>/wallsf1/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::walls_dirs::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = WallsConfig::default();
        assert_eq!(config.generation.model, "gemini-2.5-flash-image");
        assert_eq!(config.generation.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.generation.default_aspect_ratio, AspectRatio::Portrait9x16);
        assert_eq!(config.storage.favorites_key, "wallsf1_saved");
        assert_eq!(config.export.filename_prefix, "WallsF1");
        assert!(config.storage.path.is_none());
        assert!(config.export.download_dir.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: WallsConfig = toml::from_str(
            r#"
            [generation]
            default_aspect_ratio = "16:9"

            [export]
            download_dir = "/srv/walls"
            "#,
        )
        .expect("parse");
        assert_eq!(config.generation.default_aspect_ratio, AspectRatio::Landscape16x9);
        assert_eq!(config.generation.model, DEFAULT_MODEL);
        assert_eq!(
            config.export.resolved_download_dir(),
            PathBuf::from("/srv/walls")
        );
        assert_eq!(config.export.filename_prefix, "WallsF1");
    }

    #[test]
    fn unknown_ratio_is_rejected() {
        let result: Result<WallsConfig, _> = toml::from_str(
            r#"
            [generation]
            default_aspect_ratio = "2:1"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn save_and_reload() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = WallsConfig::default();
        config.storage.favorites_key = "custom".to_owned();
        config.storage.path = Some(tmp.path().join("store.json"));
        config.save_to_file(&path).expect("save");

        let loaded = WallsConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
        assert_eq!(loaded.storage.resolved_path(), tmp.path().join("store.json"));
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = WallsConfig::from_file(std::path::Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(WallsError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_config_error() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");
        assert!(matches!(
            WallsConfig::from_file(&path),
            Err(WallsError::Config(_))
        ));
    }

    #[test]
    fn client_config_uses_settings() {
        let settings = GenerationSettings {
            model: "test-model".to_owned(),
            api_base: "http://127.0.0.1:9/v1/".to_owned(),
            api_key_env: "WALLSF1_TEST_KEY_THAT_IS_NEVER_SET".to_owned(),
            ..Default::default()
        };
        let client = settings.to_client_config();
        assert_eq!(client.model, "test-model");
        assert_eq!(client.api_base, "http://127.0.0.1:9/v1");
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = WallsConfig::default_config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
