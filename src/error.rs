//! Error types for the video-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // Resolution errors
    #[error("Could not detect platform from URL: {0}")]
    PlatformUndetected(String),

    // Extraction errors
    #[error("Could not fetch video info: {0}")]
    InfoUnavailable(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    // Input errors
    #[error("File '{0}' not found")]
    FileNotFound(String),

    // External tool errors
    #[error("yt-dlp error: {0}")]
    Engine(String),

    #[error("yt-dlp not found ({0}). Please install yt-dlp and ensure it's in your PATH.")]
    EngineNotFound(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
}
