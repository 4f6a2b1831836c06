//! URL → platform resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Youtube,
    Tiktok,
    Instagram,
    Facebook,
    Twitter,
}

impl PlatformId {
    pub const ALL: [PlatformId; 5] = [
        PlatformId::Youtube,
        PlatformId::Tiktok,
        PlatformId::Instagram,
        PlatformId::Facebook,
        PlatformId::Twitter,
    ];

    /// Lowercase name, also used as the per-platform folder name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::Youtube => "youtube",
            PlatformId::Tiktok => "tiktok",
            PlatformId::Instagram => "instagram",
            PlatformId::Facebook => "facebook",
            PlatformId::Twitter => "twitter",
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PlatformId::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown platform: {}", s))
    }
}

/// Domain fragments in match order.
const DOMAIN_TABLE: &[(&str, PlatformId)] = &[
    ("youtube.com", PlatformId::Youtube),
    ("youtu.be", PlatformId::Youtube),
    ("tiktok.com", PlatformId::Tiktok),
    ("instagram.com", PlatformId::Instagram),
    ("facebook.com", PlatformId::Facebook),
    ("fb.watch", PlatformId::Facebook),
    ("twitter.com", PlatformId::Twitter),
    ("x.com", PlatformId::Twitter),
];

/// Detect the platform of a URL by substring match.
pub fn resolve(url: &str) -> Option<PlatformId> {
    let url = url.to_lowercase();
    DOMAIN_TABLE
        .iter()
        .find(|(fragment, _)| url.contains(fragment))
        .map(|(_, platform)| *platform)
}

/// Whether the URL looks like a YouTube playlist.
pub fn is_playlist_url(url: &str) -> bool {
    let url = url.to_lowercase();
    url.contains("youtube.com/playlist?") || url.contains("list=")
}

/// Resolve with the explicit platform as a fallback only.
pub fn resolve_or(url: &str, explicit: Option<PlatformId>) -> Option<PlatformId> {
    resolve(url).or(explicit)
}
