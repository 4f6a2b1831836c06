//! Per-platform capability set.

use async_trait::async_trait;
use serde_json::Value;

use crate::download::models::{DownloadRequest, VideoInfo};
use crate::engine::DownloadOptions;
use crate::platforms::PlatformId;

/// An extra download attempt tried after the primary one failed.
#[derive(Debug, Clone)]
pub struct FallbackStage {
    pub name: &'static str,
    pub options: DownloadOptions,
}

/// What a platform contributes on top of the shared adapter skeleton.
///
/// Everything has a neutral default, so a platform only implements what it
/// actually changes.
#[async_trait]
pub trait PlatformProfile: Send + Sync {
    fn platform(&self) -> PlatformId;

    /// Engine options layered over the universal defaults.
    fn overlay(&self) -> DownloadOptions {
        DownloadOptions::new()
    }

    /// Format selector used when the request asks for the default quality.
    fn default_format(&self) -> Option<&'static str> {
        None
    }

    /// Title reported when the engine doesn't provide one.
    fn default_title(&self) -> &'static str {
        "Unknown"
    }

    /// Rewrite the URL before any engine call.
    async fn prepare_url(&self, url: &str) -> String {
        url.to_string()
    }

    /// Ordered degrading attempts after a failed primary download.
    fn fallback_stages(
        &self,
        _request: &DownloadRequest,
        _output_template: &str,
    ) -> Vec<FallbackStage> {
        Vec::new()
    }

    /// Add platform-specific fields to normalized metadata.
    fn enrich_info(&self, _raw: &Value, _info: &mut VideoInfo) {}
}
