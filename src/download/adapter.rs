//! Shared download skeleton parameterized by a platform profile.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::download::models::{DownloadRequest, DownloadResult, FormatDescriptor, VideoInfo};
use crate::engine::{apply_format_overrides, keys, DownloadOptions, Engine, ProgressHook};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, output_template, platform_dir};
use crate::platforms::{PlatformId, PlatformProfile};

/// File name pattern for single downloads.
pub const SINGLE_OUTPUT_PATTERN: &str = "%(title)s.%(ext)s";

/// Translates abstract requests into engine calls for one platform.
pub struct Adapter {
    profile: Arc<dyn PlatformProfile>,
    engine: Arc<dyn Engine>,
    default_base: PathBuf,
}

impl Adapter {
    pub fn new(
        profile: Arc<dyn PlatformProfile>,
        engine: Arc<dyn Engine>,
        default_base: impl Into<PathBuf>,
    ) -> Self {
        Self {
            profile,
            engine,
            default_base: default_base.into(),
        }
    }

    pub fn platform(&self) -> PlatformId {
        self.profile.platform()
    }

    fn metadata_options(&self) -> DownloadOptions {
        let mut options = DownloadOptions::new().with(keys::QUIET, true);
        options.merge(self.profile.overlay());
        options
    }

    /// The request with its URL prepared for the engine.
    ///
    /// Resolving once up front lets the info fetch and the download share the
    /// result; preparing an already prepared URL does no network work.
    pub async fn resolve_request(&self, request: &DownloadRequest) -> DownloadRequest {
        DownloadRequest {
            url: self.profile.prepare_url(&request.url).await,
            ..request.clone()
        }
    }

    /// Fetch normalized metadata without downloading.
    pub async fn get_video_info(&self, url: &str) -> Result<VideoInfo> {
        let url = self.profile.prepare_url(url).await;
        let raw = self
            .engine
            .fetch_metadata(&url, &self.metadata_options())
            .await
            .map_err(|e| Error::InfoUnavailable(e.to_string()))?;

        let mut info = VideoInfo::from_metadata(&raw, self.profile.default_title());
        self.profile.enrich_info(&raw, &mut info);
        Ok(info)
    }

    /// List the formats the engine reports. Empty on any failure.
    pub async fn get_available_formats(&self, url: &str) -> Vec<FormatDescriptor> {
        let url = self.profile.prepare_url(url).await;
        match self.engine.fetch_metadata(&url, &self.metadata_options()).await {
            Ok(raw) => raw["formats"]
                .as_array()
                .map(|formats| formats.iter().map(FormatDescriptor::from_metadata).collect())
                .unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Could not list formats for {}: {}", url, e);
                Vec::new()
            }
        }
    }

    /// Directory the request's files are written to.
    pub fn destination(&self, request: &DownloadRequest) -> PathBuf {
        let base = request.output_dir.as_deref().unwrap_or(&self.default_base);
        platform_dir(base, self.platform())
    }

    /// Layer universal defaults, the platform overlay and request overrides.
    pub fn build_options(&self, request: &DownloadRequest, output_template: &str) -> DownloadOptions {
        let mut options = DownloadOptions::new()
            .with(keys::OUTPUT_TEMPLATE, output_template)
            .with(keys::QUIET, false);
        options.merge(self.profile.overlay());
        apply_format_overrides(
            &mut options,
            &request.quality,
            request.audio_only,
            self.profile.default_format(),
        );
        options
    }

    /// Download one item, walking the platform's fallback stages on failure.
    ///
    /// Never returns an error: every failure ends up in the result.
    pub async fn download(
        &self,
        request: &DownloadRequest,
        hook: Option<ProgressHook<'_>>,
    ) -> DownloadResult {
        let platform = self.platform();
        let url = self.profile.prepare_url(&request.url).await;

        let dir = self.destination(request);
        if let Err(e) = ensure_dir(&dir) {
            let message = Error::DownloadFailed(e.to_string()).to_string();
            return DownloadResult::failed(platform, message);
        }
        let template = output_template(&dir, SINGLE_OUTPUT_PATTERN);

        let options = self.build_options(request, &template);
        let mut last_error = match self.attempt(&url, &options, &dir, hook).await {
            Ok(result) => return result,
            Err(e) => e,
        };

        for stage in self.profile.fallback_stages(request, &template) {
            tracing::warn!("{} download failed ({}), trying {}", platform, last_error, stage.name);
            match self.attempt(&url, &stage.options, &dir, hook).await {
                Ok(result) => return result,
                Err(e) => last_error = e,
            }
        }

        tracing::debug!("All attempts failed for {}", url);
        let message = Error::DownloadFailed(last_error.to_string()).to_string();
        DownloadResult::failed(platform, message)
    }

    async fn attempt(
        &self,
        url: &str,
        options: &DownloadOptions,
        dir: &Path,
        hook: Option<ProgressHook<'_>>,
    ) -> Result<DownloadResult> {
        let items = self
            .engine
            .transfer(&[url.to_string()], options, hook)
            .await?;

        let result = match items.into_iter().next() {
            Some(item) => DownloadResult::succeeded(self.platform(), item.title, item.filepath),
            // Nothing moved into place, e.g. the file already existed.
            None => DownloadResult::succeeded(
                self.platform(),
                self.profile.default_title().to_string(),
                dir.display().to_string(),
            ),
        };
        Ok(result)
    }
}
