//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::download::PlaylistSelection;
use crate::platforms::PlatformId;

const EXAMPLES: &str = "\
Examples:
  # Download a video (auto-detect platform)
  video-downloader https://www.youtube.com/watch?v=EXAMPLE

  # Interactive mode
  video-downloader -i

  # Download only audio
  video-downloader -a https://instagram.com/reel/EXAMPLE/

  # Specific quality and output directory
  video-downloader -q \"best[height<=720]\" -o ~/Videos https://tiktok.com/@user/video/123

  # Batch download from file
  video-downloader -b urls.txt

  # List available formats
  video-downloader -l https://youtube.com/watch?v=EXAMPLE

  # Download a playlist
  video-downloader --playlist https://www.youtube.com/playlist?list=PL123";

/// Video downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "video-downloader",
    version,
    about = "Download videos from YouTube, TikTok, Instagram, Facebook, and Twitter/X",
    after_help = EXAMPLES
)]
pub struct Args {
    /// Video URL to download.
    pub url: Option<String>,

    /// Start interactive mode.
    #[arg(short, long)]
    pub interactive: bool,

    /// Batch download from a text file (one URL per line).
    #[arg(short, long, value_name = "FILE")]
    pub batch: Option<PathBuf>,

    /// YouTube playlist URL to download.
    #[arg(long, visible_alias = "pl", value_name = "URL")]
    pub playlist: Option<String>,

    /// Playlist items to download (e.g. "1,3,5-8").
    #[arg(long, value_name = "ITEMS")]
    pub playlist_items: Option<String>,

    /// Start index for playlist download.
    #[arg(long, value_name = "N")]
    pub playlist_start: Option<u32>,

    /// End index for playlist download.
    #[arg(long, value_name = "N")]
    pub playlist_end: Option<u32>,

    /// Platform to use when it can't be detected from the URL.
    #[arg(short, long, value_enum)]
    pub platform: Option<PlatformArg>,

    /// Video quality / format selector (default: best).
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Download audio only (MP3).
    #[arg(short, long)]
    pub audio_only: bool,

    /// Base output directory.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// List available formats without downloading.
    #[arg(short, long)]
    pub list_formats: bool,

    /// Path to configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// TikTok cookies file (Netscape format).
    #[arg(long, env = "TIKTOK_COOKIES_FILE", hide_env_values = true)]
    pub tiktok_cookies_file: Option<PathBuf>,

    /// Browser to read TikTok cookies from, or "none".
    #[arg(long, env = "TIKTOK_COOKIES_BROWSER")]
    pub tiktok_cookies_browser: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI platform argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Youtube,
    Tiktok,
    Instagram,
    Facebook,
    Twitter,
}

impl From<PlatformArg> for PlatformId {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Youtube => PlatformId::Youtube,
            PlatformArg::Tiktok => PlatformId::Tiktok,
            PlatformArg::Instagram => PlatformId::Instagram,
            PlatformArg::Facebook => PlatformId::Facebook,
            PlatformArg::Twitter => PlatformId::Twitter,
        }
    }
}

impl Args {
    /// True when no action was requested at all.
    pub fn is_empty(&self) -> bool {
        !self.interactive && self.batch.is_none() && self.playlist.is_none() && self.url.is_none()
    }

    pub fn platform(&self) -> Option<PlatformId> {
        self.platform.map(Into::into)
    }

    pub fn playlist_selection(&self) -> PlaylistSelection {
        PlaylistSelection {
            items: self.playlist_items.clone(),
            start: self.playlist_start,
            end: self.playlist_end,
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.output {
            config.options.output_directory = Some(dir.clone());
        }

        if let Some(quality) = &self.quality {
            config.options.quality = quality.clone();
        }

        if let Some(file) = &self.tiktok_cookies_file {
            config.tiktok.cookies_file = Some(file.clone());
        }

        if let Some(browser) = &self.tiktok_cookies_browser {
            config.tiktok.cookies_browser = Some(browser.clone());
        }
    }
}
