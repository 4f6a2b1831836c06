//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::engine::options::DEFAULT_QUALITY;
use crate::error::{Error, Result};
use crate::fs::default_download_base;
use crate::platforms::CookieSource;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub tiktok: TikTokConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads; per-platform folders go inside it.
    #[serde(default)]
    pub output_directory: Option<PathBuf>,

    /// Default quality selector.
    #[serde(default = "default_quality")]
    pub quality: String,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            output_directory: None,
            quality: default_quality(),
        }
    }
}

/// TikTok authentication configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TikTokConfig {
    /// Exported cookies.txt file. Takes priority over `cookies_browser`.
    #[serde(default)]
    pub cookies_file: Option<PathBuf>,

    /// Browser to read cookies from, or `none`.
    #[serde(default)]
    pub cookies_browser: Option<String>,
}

/// Extraction engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path or name of the yt-dlp executable.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Timeout for resolving short-link redirects.
    #[serde(default = "default_redirect_timeout")]
    pub redirect_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            redirect_timeout_secs: default_redirect_timeout(),
        }
    }
}

fn default_quality() -> String {
    DEFAULT_QUALITY.to_string()
}

fn default_binary() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_redirect_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Default configuration file location for this platform.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "video-downloader").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the effective base download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .output_directory
            .clone()
            .unwrap_or_else(default_download_base)
    }

    pub fn redirect_timeout(&self) -> Duration {
        Duration::from_secs(self.engine.redirect_timeout_secs)
    }

    /// Cookie source for TikTok requests.
    pub fn cookie_source(&self) -> CookieSource {
        CookieSource::from_settings(
            self.tiktok.cookies_file.as_deref(),
            self.tiktok.cookies_browser.as_deref(),
        )
    }
}
