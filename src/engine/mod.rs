//! Extraction engine boundary.
//!
//! This module provides:
//! - The `Engine` trait the orchestration core talks to
//! - The flat option mapping passed at call time
//! - Progress events and transfer records
//! - A `yt-dlp` backed implementation

pub mod options;
pub mod types;
pub mod ytdlp;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use options::{apply_format_overrides, keys, DownloadOptions};
pub use types::{ProgressEvent, ProgressHook, ProgressStatus, TransferredItem};
pub use ytdlp::YtDlp;

/// Opaque media extraction/download service.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Query metadata without downloading anything.
    async fn fetch_metadata(&self, url: &str, options: &DownloadOptions) -> Result<Value>;

    /// Download the given URLs, reporting progress through `hook`.
    async fn transfer(
        &self,
        urls: &[String],
        options: &DownloadOptions,
        hook: Option<ProgressHook<'_>>,
    ) -> Result<Vec<TransferredItem>>;
}
