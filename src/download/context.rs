//! Shared configuration and engine for one run.

use std::sync::Arc;

use crate::config::Config;
use crate::download::adapter::Adapter;
use crate::download::models::DownloadRequest;
use crate::download::playlist::PlaylistOrchestrator;
use crate::engine::Engine;
use crate::error::Result;
use crate::platforms::{profile_for, PlatformId};

/// Everything a download flow needs besides the request itself.
pub struct DownloadContext {
    config: Config,
    engine: Arc<dyn Engine>,
}

impl DownloadContext {
    pub fn new(config: Config, engine: Arc<dyn Engine>) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Adapter for a platform, writing under the configured base directory.
    pub fn adapter_for(&self, platform: PlatformId) -> Result<Adapter> {
        let profile = profile_for(platform, &self.config)?;
        Ok(Adapter::new(
            profile,
            self.engine.clone(),
            self.config.download_directory(),
        ))
    }

    pub fn playlists(&self) -> PlaylistOrchestrator {
        PlaylistOrchestrator::new(self.engine.clone(), self.config.download_directory())
    }

    /// A request carrying the configured quality.
    pub fn request(&self, url: &str) -> DownloadRequest {
        DownloadRequest::new(url).with_quality(self.config.options.quality.clone())
    }
}
