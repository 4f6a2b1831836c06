//! Request and result records shared by the orchestrators.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::engine::options::DEFAULT_QUALITY;
use crate::platforms::PlatformId;

/// Maximum description length shown in info panels.
const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// An abstract download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub quality: String,
    pub audio_only: bool,
    pub output_dir: Option<PathBuf>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            quality: DEFAULT_QUALITY.to_string(),
            audio_only: false,
            output_dir: None,
        }
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn with_audio_only(mut self, audio_only: bool) -> Self {
        self.audio_only = audio_only;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }
}

/// Outcome of a single download.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadResult {
    pub success: bool,
    pub platform: PlatformId,
    pub title: Option<String>,
    pub filename: Option<String>,
    pub error: Option<String>,
}

impl DownloadResult {
    pub fn succeeded(platform: PlatformId, title: String, filename: String) -> Self {
        Self {
            success: true,
            platform,
            title: Some(title),
            filename: Some(filename),
            error: None,
        }
    }

    pub fn failed(platform: PlatformId, error: impl Into<String>) -> Self {
        Self {
            success: false,
            platform,
            title: None,
            filename: None,
            error: Some(error.into()),
        }
    }
}

fn str_or<'a>(raw: &'a Value, key: &str, default: &'a str) -> &'a str {
    raw[key].as_str().filter(|s| !s.is_empty()).unwrap_or(default)
}

/// Normalized video metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoInfo {
    pub title: String,
    /// Duration in seconds.
    pub duration: f64,
    pub uploader: String,
    pub view_count: u64,
    pub thumbnail: String,

    // Extra engagement fields some platforms report.
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub description: Option<String>,
}

impl VideoInfo {
    pub fn from_metadata(raw: &Value, default_title: &str) -> Self {
        Self {
            title: str_or(raw, "title", default_title).to_string(),
            duration: raw["duration"].as_f64().unwrap_or(0.0),
            uploader: str_or(raw, "uploader", "Unknown").to_string(),
            view_count: raw["view_count"].as_u64().unwrap_or(0),
            thumbnail: str_or(raw, "thumbnail", "").to_string(),
            like_count: None,
            comment_count: None,
            description: None,
        }
    }
}

/// Shorten a description for display.
pub fn description_preview(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return description.to_string();
    }
    let head: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{}...", head)
}

/// One downloadable format as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    pub format_id: String,
    pub format_note: String,
    pub ext: String,
    /// Exact size when known, otherwise the engine's estimate.
    pub filesize: Option<u64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

impl FormatDescriptor {
    pub fn from_metadata(raw: &Value) -> Self {
        let format_id = match &raw["format_id"] {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };

        Self {
            format_id,
            format_note: str_or(raw, "format_note", "unknown").to_string(),
            ext: str_or(raw, "ext", "unknown").to_string(),
            filesize: raw["filesize"]
                .as_u64()
                .or_else(|| raw["filesize_approx"].as_u64()),
            vcodec: raw["vcodec"].as_str().map(str::to_string),
            acodec: raw["acodec"].as_str().map(str::to_string),
        }
    }

    /// Size in megabytes, or `unknown`.
    pub fn size_label(&self) -> String {
        match self.filesize {
            Some(size) if size > 0 => format!("{:.1}MB", size as f64 / (1024.0 * 1024.0)),
            _ => "unknown".to_string(),
        }
    }

    /// Video codec, falling back to the audio codec for audio-only formats.
    pub fn codec_label(&self) -> &str {
        fn present(codec: &Option<String>) -> Option<&str> {
            codec.as_deref().filter(|c| !c.is_empty() && *c != "none")
        }
        present(&self.vcodec)
            .or_else(|| present(&self.acodec))
            .unwrap_or("none")
    }
}

/// A member of a playlist as returned by flat extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistEntry {
    pub id: String,
    pub title: Option<String>,
    /// Extractor name, used for archive keys.
    pub ie_key: Option<String>,
}

/// Read-only playlist snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistInfo {
    pub title: String,
    pub uploader: String,
    pub id: String,
    pub source_url: String,
    pub description: String,
    pub entries: Vec<PlaylistEntry>,
    pub count: usize,
}

impl PlaylistInfo {
    pub fn from_metadata(raw: &Value, url: &str) -> Self {
        let entries: Vec<PlaylistEntry> = raw["entries"]
            .as_array()
            .into_iter()
            .flatten()
            .filter(|e| !e.is_null())
            .map(|e| PlaylistEntry {
                id: e["id"].as_str().unwrap_or_default().to_string(),
                title: e["title"].as_str().map(str::to_string),
                ie_key: e["ie_key"].as_str().map(str::to_string),
            })
            .collect();

        Self {
            title: str_or(raw, "title", "YouTube Playlist").to_string(),
            uploader: str_or(raw, "uploader", "Unknown").to_string(),
            id: str_or(raw, "id", "").to_string(),
            source_url: str_or(raw, "webpage_url", url).to_string(),
            description: raw["description"].as_str().unwrap_or_default().to_string(),
            count: entries.len(),
            entries,
        }
    }
}
