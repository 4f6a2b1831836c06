//! Flat key/value option mapping handed to the extraction engine.

use std::collections::BTreeMap;

use serde_json::{json, Value};

/// Option keys understood by the engine.
pub mod keys {
    pub const FORMAT: &str = "format";
    pub const OUTPUT_TEMPLATE: &str = "outtmpl";
    pub const QUIET: &str = "quiet";
    pub const EXTRACT_FLAT: &str = "extract_flat";
    pub const SKIP_DOWNLOAD: &str = "skip_download";
    pub const IMPERSONATE: &str = "impersonate";
    pub const HTTP_HEADERS: &str = "http_headers";
    pub const COOKIE_FILE: &str = "cookiefile";
    pub const COOKIES_FROM_BROWSER: &str = "cookiesfrombrowser";
    pub const POSTPROCESSORS: &str = "postprocessors";
    pub const OVERWRITES: &str = "overwrites";
    pub const CONTINUE_DL: &str = "continuedl";
    pub const DOWNLOAD_ARCHIVE: &str = "download_archive";
    pub const NO_PLAYLIST: &str = "noplaylist";
    pub const PLAYLIST_ITEMS: &str = "playlist_items";
    pub const PLAYLIST_START: &str = "playliststart";
    pub const PLAYLIST_END: &str = "playlistend";
}

/// Quality token meaning "let the platform decide".
pub const DEFAULT_QUALITY: &str = "best";

/// Format selector used for audio-only downloads.
pub const AUDIO_ONLY_FORMAT: &str = "bestaudio/best";

/// Codec and bitrate of extracted audio.
pub const AUDIO_CODEC: &str = "mp3";
pub const AUDIO_QUALITY: &str = "192";

/// Post-processor key for audio extraction.
pub const EXTRACT_AUDIO_PP: &str = "FFmpegExtractAudio";

/// Engine configuration for a single call.
///
/// Later writes win, which is what gives the defaults → overlay → request
/// layering its meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadOptions {
    entries: BTreeMap<String, Value>,
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a key only when a value is present.
    ///
    /// The engine treats "present but empty" differently from "absent", so
    /// `None` never produces an entry.
    pub fn set_opt<T: Into<Value>>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Overlay another mapping on top of this one.
    pub fn merge(&mut self, other: DownloadOptions) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The format selector, if one has been chosen.
    pub fn format(&self) -> Option<&str> {
        self.get_str(keys::FORMAT)
    }

    /// Switch to audio-only: audio format selector plus mp3 extraction.
    pub fn set_audio_only(&mut self) -> &mut Self {
        self.set(keys::FORMAT, AUDIO_ONLY_FORMAT);
        self.set(keys::POSTPROCESSORS, audio_extraction_postprocessors());
        self
    }
}

/// Post-processor chain that extracts audio to a fixed codec and bitrate.
pub fn audio_extraction_postprocessors() -> Value {
    json!([{
        "key": EXTRACT_AUDIO_PP,
        "preferredcodec": AUDIO_CODEC,
        "preferredquality": AUDIO_QUALITY,
    }])
}

/// Apply request-derived format overrides.
///
/// Precedence: audio-only always wins; then an explicit non-default quality
/// verbatim; then the platform default selector unless one is already set.
pub fn apply_format_overrides(
    options: &mut DownloadOptions,
    quality: &str,
    audio_only: bool,
    platform_default: Option<&str>,
) {
    if audio_only {
        options.set_audio_only();
    } else if quality != DEFAULT_QUALITY {
        options.set(keys::FORMAT, quality);
    } else if let Some(default) = platform_default {
        if !options.contains(keys::FORMAT) {
            options.set(keys::FORMAT, default);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_later_wins() {
        let mut base = DownloadOptions::new()
            .with(keys::QUIET, false)
            .with(keys::FORMAT, "best");
        base.merge(DownloadOptions::new().with(keys::FORMAT, "worst"));

        assert_eq!(base.format(), Some("worst"));
        assert_eq!(base.get_bool(keys::QUIET), Some(false));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_set_opt_omits_none() {
        let mut options = DownloadOptions::new();
        options.set_opt(keys::PLAYLIST_ITEMS, None::<String>);
        options.set_opt(keys::PLAYLIST_START, Some(3));

        assert!(!options.contains(keys::PLAYLIST_ITEMS));
        assert_eq!(options.get(keys::PLAYLIST_START), Some(&json!(3)));
    }

    #[test]
    fn test_audio_only_wins_over_quality() {
        let mut options = DownloadOptions::new();
        apply_format_overrides(&mut options, "best[height<=720]", true, Some("best[ext=mp4]/best"));

        assert_eq!(options.format(), Some(AUDIO_ONLY_FORMAT));
        let pps = options.get(keys::POSTPROCESSORS).unwrap();
        assert_eq!(pps[0]["key"], EXTRACT_AUDIO_PP);
        assert_eq!(pps[0]["preferredcodec"], "mp3");
        assert_eq!(pps[0]["preferredquality"], "192");
    }

    #[test]
    fn test_default_quality_uses_platform_default() {
        let mut options = DownloadOptions::new();
        apply_format_overrides(&mut options, DEFAULT_QUALITY, false, Some("best[ext=mp4]/best"));
        assert_eq!(options.format(), Some("best[ext=mp4]/best"));

        let mut options = DownloadOptions::new();
        apply_format_overrides(&mut options, DEFAULT_QUALITY, false, None);
        assert_eq!(options.format(), None);
    }

    #[test]
    fn test_default_quality_keeps_overlay_format() {
        let mut options = DownloadOptions::new().with(keys::FORMAT, "mp4");
        apply_format_overrides(&mut options, DEFAULT_QUALITY, false, Some("best[ext=mp4]/best"));
        assert_eq!(options.format(), Some("mp4"));
    }

    #[test]
    fn test_explicit_quality_verbatim() {
        let mut options = DownloadOptions::new();
        apply_format_overrides(&mut options, "worst", false, Some("best[ext=mp4]/best"));
        assert_eq!(options.format(), Some("worst"));
        assert!(!options.contains(keys::POSTPROCESSORS));
    }
}
