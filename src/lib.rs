//! Video Downloader - download videos from YouTube, TikTok, Instagram,
//! Facebook and Twitter/X.
//!
//! Media extraction is delegated to `yt-dlp`; this crate decides which
//! platform a URL belongs to, which options to pass, and how to recover
//! from failures.
//!
//! # Features
//!
//! - Platform detection from the URL
//! - Per-platform option overlays (TikTok impersonation and cookies)
//! - A degrading fallback chain for TikTok
//! - Resumable YouTube playlists backed by a download archive
//! - Batch downloads from a file of URLs
//! - Interactive mode
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use video_downloader::{Config, DownloadContext, DownloadRequest, PlatformId, YtDlp};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let engine = YtDlp::new(config.engine.binary.clone());
//!     let ctx = DownloadContext::new(config, Arc::new(engine));
//!
//!     let adapter = ctx.adapter_for(PlatformId::Youtube)?;
//!     let request = DownloadRequest::new("https://www.youtube.com/watch?v=EXAMPLE");
//!     let result = adapter.download(&request, None).await;
//!     println!("success: {}", result.success);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod engine;
pub mod error;
pub mod fs;
pub mod output;
pub mod platforms;

// Re-exports for convenience
pub use config::Config;
pub use download::{DownloadContext, DownloadRequest, DownloadResult};
pub use engine::{Engine, YtDlp};
pub use error::{Error, Result};
pub use platforms::{resolve, PlatformId};
