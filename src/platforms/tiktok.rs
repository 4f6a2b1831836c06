//! TikTok profile: URL normalization, impersonation, cookies and the
//! degrading fallback chain.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use crate::config::validate_cookies_file;
use crate::download::models::{description_preview, DownloadRequest, VideoInfo};
use crate::engine::options::{keys, DownloadOptions};
use crate::error::Result;
use crate::platforms::traits::{FallbackStage, PlatformProfile};
use crate::platforms::PlatformId;

/// Browser identity the engine impersonates.
pub const IMPERSONATE_TARGET: &str = "chrome-131";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const REFERER: &str = "https://www.tiktok.com/";

/// Default selector: prefer an mp4 container.
const DEFAULT_FORMAT: &str = "best[ext=mp4]/best";

/// Selector used by the retry stages.
const CONSTRAINED_FORMAT: &str = "best[ext=mp4]";

const SHORT_LINK_HOSTS: &[&str] = &["vm.tiktok.com", "vt.tiktok.com"];

/// Where authentication cookies come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CookieSource {
    #[default]
    None,
    File(PathBuf),
    Browser(String),
}

impl CookieSource {
    /// An exported cookie file wins over a browser; browser `none` disables cookies.
    pub fn from_settings(file: Option<&Path>, browser: Option<&str>) -> Self {
        if let Some(file) = file {
            return CookieSource::File(file.to_path_buf());
        }
        match browser.map(str::trim) {
            Some(b) if !b.is_empty() && !b.eq_ignore_ascii_case("none") => {
                CookieSource::Browser(b.to_string())
            }
            _ => CookieSource::None,
        }
    }

    fn apply(&self, options: &mut DownloadOptions) {
        match self {
            CookieSource::None => {}
            CookieSource::File(path) => {
                options.set(keys::COOKIE_FILE, path.display().to_string());
            }
            CookieSource::Browser(browser) => {
                options.set(keys::COOKIES_FROM_BROWSER, browser.as_str());
            }
        }
    }
}

/// Whether the URL is a short link that has to be resolved first.
pub fn is_short_link(url: &str) -> bool {
    match Url::parse(url.trim()) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| SHORT_LINK_HOSTS.contains(&host))
            .unwrap_or(false),
        // Scheme-less input such as `vm.tiktok.com/abc`.
        Err(_) => {
            let url = url.to_lowercase();
            SHORT_LINK_HOSTS.iter().any(|host| url.starts_with(host))
        }
    }
}

/// Rewrite the mobile subdomain to the standard web subdomain.
pub fn rewrite_mobile(url: &str) -> String {
    url.replace("//m.tiktok.com", "//www.tiktok.com")
}

/// TikTok platform profile.
pub struct TikTok {
    cookies: CookieSource,
    http: Client,
}

impl TikTok {
    /// Fails if the cookie source names a file that doesn't exist.
    pub fn new(cookies: CookieSource, redirect_timeout: Duration) -> Result<Self> {
        if let CookieSource::File(path) = &cookies {
            validate_cookies_file(path)?;
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(redirect_timeout)
            .build()?;

        Ok(Self { cookies, http })
    }

    /// Follow redirects once; keep the original URL if that fails.
    async fn resolve_short_link(&self, url: &str) -> String {
        match self.http.head(url).send().await {
            Ok(response) => {
                let resolved = response.url().to_string();
                tracing::debug!("Resolved {} -> {}", url, resolved);
                resolved
            }
            Err(e) => {
                tracing::warn!("Could not resolve short link {}: {}", url, e);
                url.to_string()
            }
        }
    }

    fn retry_options(&self, request: &DownloadRequest, output_template: &str) -> DownloadOptions {
        let mut options = DownloadOptions::new()
            .with(keys::OUTPUT_TEMPLATE, output_template)
            .with(keys::QUIET, false)
            .with(keys::FORMAT, CONSTRAINED_FORMAT)
            .with(keys::EXTRACT_FLAT, false);
        if request.audio_only {
            options.set_audio_only();
        }
        options
    }

    fn alternative_options(
        &self,
        request: &DownloadRequest,
        output_template: &str,
    ) -> DownloadOptions {
        let mut options = DownloadOptions::new()
            .with(keys::OUTPUT_TEMPLATE, output_template)
            .with(keys::QUIET, false);
        if request.audio_only {
            options.set_audio_only();
        } else {
            options.set(keys::FORMAT, CONSTRAINED_FORMAT);
        }
        options
    }
}

#[async_trait]
impl PlatformProfile for TikTok {
    fn platform(&self) -> PlatformId {
        PlatformId::Tiktok
    }

    fn overlay(&self) -> DownloadOptions {
        let mut options = DownloadOptions::new()
            .with(keys::EXTRACT_FLAT, false)
            .with(keys::IMPERSONATE, IMPERSONATE_TARGET)
            .with(
                keys::HTTP_HEADERS,
                json!({
                    "User-Agent": USER_AGENT,
                    "Referer": REFERER,
                }),
            );
        self.cookies.apply(&mut options);
        options
    }

    fn default_format(&self) -> Option<&'static str> {
        Some(DEFAULT_FORMAT)
    }

    fn default_title(&self) -> &'static str {
        "TikTok Video"
    }

    async fn prepare_url(&self, url: &str) -> String {
        let url = if is_short_link(url) {
            self.resolve_short_link(url).await
        } else {
            url.to_string()
        };
        rewrite_mobile(&url)
    }

    fn fallback_stages(
        &self,
        request: &DownloadRequest,
        output_template: &str,
    ) -> Vec<FallbackStage> {
        vec![
            FallbackStage {
                name: "constrained format",
                options: self.retry_options(request, output_template),
            },
            FallbackStage {
                name: "alternative method",
                options: self.alternative_options(request, output_template),
            },
        ]
    }

    fn enrich_info(&self, raw: &Value, info: &mut VideoInfo) {
        info.like_count = Some(raw["like_count"].as_u64().unwrap_or(0));
        info.comment_count = Some(raw["comment_count"].as_u64().unwrap_or(0));
        info.description = raw["description"]
            .as_str()
            .filter(|d| !d.is_empty())
            .map(description_preview);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::options::{AUDIO_ONLY_FORMAT, EXTRACT_AUDIO_PP};

    fn profile(cookies: CookieSource) -> TikTok {
        TikTok::new(cookies, Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_cookie_file_takes_priority() {
        let source = CookieSource::from_settings(Some(Path::new("/tmp/c.txt")), Some("firefox"));
        assert_eq!(source, CookieSource::File(PathBuf::from("/tmp/c.txt")));
    }

    #[test]
    fn test_cookie_browser_none_disables() {
        assert_eq!(CookieSource::from_settings(None, Some("None")), CookieSource::None);
        assert_eq!(CookieSource::from_settings(None, Some("")), CookieSource::None);
        assert_eq!(CookieSource::from_settings(None, None), CookieSource::None);
        assert_eq!(
            CookieSource::from_settings(None, Some("chrome")),
            CookieSource::Browser("chrome".to_string())
        );
    }

    #[test]
    fn test_url_normalization_helpers() {
        assert!(is_short_link("https://vm.tiktok.com/ZMabc/"));
        assert!(is_short_link("https://VT.tiktok.com/xyz"));
        assert!(is_short_link("vm.tiktok.com/ZMabc/"));
        assert!(!is_short_link("https://www.tiktok.com/@u/video/1"));
        assert!(!is_short_link("https://example.com/?next=vm.tiktok.com"));

        assert_eq!(
            rewrite_mobile("https://m.tiktok.com/v/123.html"),
            "https://www.tiktok.com/v/123.html"
        );
        assert_eq!(
            rewrite_mobile("https://www.tiktok.com/@u/video/1"),
            "https://www.tiktok.com/@u/video/1"
        );
    }

    #[tokio::test]
    async fn test_prepare_url_rewrites_mobile_without_network() {
        let tiktok = profile(CookieSource::None);
        assert_eq!(
            tiktok.prepare_url("https://m.tiktok.com/v/123.html").await,
            "https://www.tiktok.com/v/123.html"
        );
    }

    #[test]
    fn test_overlay_includes_impersonation_and_cookies() {
        let overlay = profile(CookieSource::Browser("firefox".into())).overlay();
        assert_eq!(overlay.get_str(keys::IMPERSONATE), Some(IMPERSONATE_TARGET));
        assert_eq!(overlay.get_bool(keys::EXTRACT_FLAT), Some(false));
        assert_eq!(overlay.get(keys::HTTP_HEADERS).unwrap()["Referer"], REFERER);
        assert_eq!(overlay.get_str(keys::COOKIES_FROM_BROWSER), Some("firefox"));
        assert!(!overlay.contains(keys::COOKIE_FILE));

        let overlay = profile(CookieSource::None).overlay();
        assert!(!overlay.contains(keys::COOKIES_FROM_BROWSER));
    }

    #[test]
    fn test_overlay_uses_existing_cookie_file() {
        let cookies = tempfile::NamedTempFile::new().unwrap();
        let overlay = profile(CookieSource::File(cookies.path().to_path_buf())).overlay();

        assert_eq!(
            overlay.get_str(keys::COOKIE_FILE),
            Some(cookies.path().display().to_string().as_str())
        );
        assert!(!overlay.contains(keys::COOKIES_FROM_BROWSER));
    }

    #[test]
    fn test_fallback_stages() {
        let tiktok = profile(CookieSource::Browser("chrome".into()));
        let request = DownloadRequest::new("https://www.tiktok.com/@u/video/1")
            .with_quality("best[height<=480]");
        let stages = tiktok.fallback_stages(&request, "/out/%(title)s.%(ext)s");

        assert_eq!(stages.len(), 2);

        let retry = &stages[0].options;
        assert_eq!(retry.format(), Some(CONSTRAINED_FORMAT));
        assert_eq!(retry.get_bool(keys::EXTRACT_FLAT), Some(false));
        assert_eq!(retry.get_str(keys::OUTPUT_TEMPLATE), Some("/out/%(title)s.%(ext)s"));

        let alternative = &stages[1].options;
        assert_eq!(alternative.format(), Some(CONSTRAINED_FORMAT));
        assert!(!alternative.contains(keys::IMPERSONATE));
        assert!(!alternative.contains(keys::HTTP_HEADERS));
        assert!(!alternative.contains(keys::COOKIES_FROM_BROWSER));
    }

    #[test]
    fn test_fallback_stages_keep_audio_only() {
        let tiktok = profile(CookieSource::None);
        let request = DownloadRequest::new("https://www.tiktok.com/@u/video/1").with_audio_only(true);

        for stage in tiktok.fallback_stages(&request, "/out/%(title)s.%(ext)s") {
            assert_eq!(stage.options.format(), Some(AUDIO_ONLY_FORMAT), "{}", stage.name);
            assert_eq!(
                stage.options.get(keys::POSTPROCESSORS).unwrap()[0]["key"],
                EXTRACT_AUDIO_PP
            );
        }
    }

    #[test]
    fn test_enrich_info_truncates_description() {
        let tiktok = profile(CookieSource::None);
        let raw = json!({"like_count": 5, "description": "x".repeat(120)});
        let mut info = VideoInfo::from_metadata(&raw, tiktok.default_title());
        tiktok.enrich_info(&raw, &mut info);

        assert_eq!(info.title, "TikTok Video");
        assert_eq!(info.like_count, Some(5));
        assert_eq!(info.comment_count, Some(0));
        assert_eq!(info.description.unwrap().len(), 103);
    }
}
