//! Configuration validation logic.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Browsers the engine can read cookies from.
const SUPPORTED_BROWSERS: &[&str] = &[
    "brave", "chrome", "chromium", "edge", "firefox", "opera", "safari", "vivaldi", "whale",
];

/// Bounds for the short-link redirect timeout, in seconds.
const MIN_REDIRECT_TIMEOUT: u64 = 1;
const MAX_REDIRECT_TIMEOUT: u64 = 120;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_quality(&config.options.quality)?;
    if let Some(browser) = &config.tiktok.cookies_browser {
        validate_cookies_browser(browser)?;
    }
    validate_redirect_timeout(config.engine.redirect_timeout_secs)?;

    Ok(())
}

/// Validate the quality selector.
pub fn validate_quality(quality: &str) -> Result<()> {
    if quality.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "quality".to_string(),
            message: "Quality selector cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// Validate the browser cookies are read from. `none` is accepted.
pub fn validate_cookies_browser(browser: &str) -> Result<()> {
    let browser = browser.trim().to_lowercase();
    if browser.is_empty() || browser == "none" || SUPPORTED_BROWSERS.contains(&browser.as_str()) {
        return Ok(());
    }

    Err(Error::ConfigValidation {
        field: "cookies_browser".to_string(),
        message: format!(
            "Unsupported browser '{}'. Expected one of: {}, none",
            browser,
            SUPPORTED_BROWSERS.join(", ")
        ),
    })
}

/// Validate an exported cookie file. Checked only when TikTok is used.
pub fn validate_cookies_file(file: &Path) -> Result<()> {
    if !file.is_file() {
        return Err(Error::ConfigValidation {
            field: "cookies_file".to_string(),
            message: format!("Cookie file does not exist: {}", file.display()),
        });
    }
    Ok(())
}

pub fn validate_redirect_timeout(secs: u64) -> Result<()> {
    if !(MIN_REDIRECT_TIMEOUT..=MAX_REDIRECT_TIMEOUT).contains(&secs) {
        return Err(Error::ConfigValidation {
            field: "redirect_timeout_secs".to_string(),
            message: format!(
                "Must be between {} and {} seconds (got {})",
                MIN_REDIRECT_TIMEOUT, MAX_REDIRECT_TIMEOUT, secs
            ),
        });
    }
    Ok(())
}

fn playlist_items_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Comma-separated indices, ranges and slices: "1,3,5-7", "-3", "::2"
    PATTERN.get_or_init(|| {
        Regex::new(r"^[-\d:]+(,[-\d:]+)*$").expect("playlist items pattern is valid")
    })
}

/// Validate playlist selection bounds.
pub fn validate_playlist_selection(
    items: Option<&str>,
    start: Option<u32>,
    end: Option<u32>,
) -> Result<()> {
    if let Some(items) = items {
        let compact: String = items.chars().filter(|c| !c.is_whitespace()).collect();
        if !playlist_items_pattern().is_match(&compact) {
            return Err(Error::ConfigValidation {
                field: "playlist_items".to_string(),
                message: format!(
                    "Invalid item list '{}'. Use indices, ranges or slices like 1,3,5-7 or 1:10:2",
                    items
                ),
            });
        }
    }

    for (field, value) in [("playlist_start", start), ("playlist_end", end)] {
        if value == Some(0) {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: "Playlist indices start at 1".to_string(),
            });
        }
    }

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(Error::ConfigValidation {
                field: "playlist_start".to_string(),
                message: format!("Start ({}) is after end ({})", start, end),
            });
        }
    }

    Ok(())
}
