//! Platform detection and per-platform profiles.
//!
//! This module provides:
//! - URL → platform resolution
//! - The `PlatformProfile` capability set
//! - One profile per supported platform

pub mod facebook;
pub mod instagram;
pub mod resolver;
pub mod tiktok;
pub mod traits;
pub mod twitter;
pub mod youtube;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;

pub use resolver::{is_playlist_url, resolve, resolve_or, PlatformId};
pub use tiktok::{CookieSource, TikTok};
pub use traits::{FallbackStage, PlatformProfile};

/// Build the profile for a platform from the effective configuration.
pub fn profile_for(platform: PlatformId, config: &Config) -> Result<Arc<dyn PlatformProfile>> {
    let profile: Arc<dyn PlatformProfile> = match platform {
        PlatformId::Youtube => Arc::new(youtube::YouTube),
        PlatformId::Tiktok => Arc::new(TikTok::new(
            config.cookie_source(),
            config.redirect_timeout(),
        )?),
        PlatformId::Instagram => Arc::new(instagram::Instagram),
        PlatformId::Facebook => Arc::new(facebook::Facebook),
        PlatformId::Twitter => Arc::new(twitter::Twitter),
    };
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::keys;

    #[test]
    fn test_profile_for_every_platform() {
        let config = Config::default();
        for platform in PlatformId::ALL {
            let profile = profile_for(platform, &config).unwrap();
            assert_eq!(profile.platform(), platform);
        }
    }

    #[test]
    fn test_missing_cookie_file_only_blocks_tiktok() {
        let mut config = Config::default();
        config.tiktok.cookies_file = Some("/definitely/not/cookies.txt".into());

        assert!(profile_for(PlatformId::Youtube, &config).is_ok());
        assert!(profile_for(PlatformId::Twitter, &config).is_ok());
        assert!(matches!(
            profile_for(PlatformId::Tiktok, &config),
            Err(crate::error::Error::ConfigValidation { field, .. }) if field == "cookies_file"
        ));
    }

    #[test]
    fn test_overlays() {
        let config = Config::default();
        let overlay = |p| profile_for(p, &config).unwrap().overlay();

        assert!(overlay(PlatformId::Youtube).is_empty());
        assert!(overlay(PlatformId::Twitter).is_empty());
        assert_eq!(overlay(PlatformId::Instagram).get_bool(keys::EXTRACT_FLAT), Some(false));
        assert_eq!(overlay(PlatformId::Facebook).get_bool(keys::EXTRACT_FLAT), Some(false));
        assert!(overlay(PlatformId::Tiktok).contains(keys::IMPERSONATE));
    }

    #[test]
    fn test_only_tiktok_has_fallbacks() {
        use crate::download::models::DownloadRequest;

        let config = Config::default();
        let request = DownloadRequest::new("https://example.com/v");
        for platform in PlatformId::ALL {
            let stages = profile_for(platform, &config)
                .unwrap()
                .fallback_stages(&request, "%(title)s.%(ext)s");
            assert_eq!(stages.is_empty(), platform != PlatformId::Tiktok);
        }
    }

    #[test]
    fn test_prepare_url_is_identity_outside_tiktok() {
        let config = Config::default();
        let url = "https://m.facebook.com/watch/?v=1";
        for platform in [PlatformId::Youtube, PlatformId::Facebook, PlatformId::Twitter] {
            let profile = profile_for(platform, &config).unwrap();
            assert_eq!(tokio_test::block_on(profile.prepare_url(url)), url);
        }
    }
}
