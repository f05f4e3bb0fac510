//! Cache configuration loaded from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Top-level configuration.
///
/// Every field has a default, so the cache works without a config file.
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CoreError::from_io(path, e))?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }
}

/// Browsing preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// List entries whose name starts with `.`.
    #[serde(default)]
    pub show_hidden: bool,
}

/// Path backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Whether keys keep the case of the path. Case-insensitive file systems
    /// must fold case so that `Foo` and `foo` share one node.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
    /// The fixed root of the tree.
    #[serde(default = "default_root")]
    pub root: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            case_sensitive: default_case_sensitive(),
            root: default_root(),
        }
    }
}

/// Thumbnail cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Longest edge, in pixels, of a decoded thumbnail.
    #[serde(default = "default_thumbnail_size")]
    pub max_size: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: default_thumbnail_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_case_sensitive() -> bool {
    cfg!(unix) && !cfg!(target_os = "macos")
}

fn default_root() -> String {
    if cfg!(windows) {
        "C:\\".to_string()
    } else {
        "/".to_string()
    }
}

fn default_thumbnail_size() -> u32 {
    128
}
