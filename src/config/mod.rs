//! Configuration module for the video-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{Config, EngineConfig, OptionsConfig, TikTokConfig};
pub use validation::{validate_config, validate_cookies_file, validate_playlist_selection};
