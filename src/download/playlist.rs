//! Resumable playlist downloads.
//!
//! A playlist is fetched flat, written into its own folder, and downloaded
//! in a single engine call. The engine consults the folder's download archive
//! so items finished by an earlier run are skipped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::download::archive::{DownloadArchive, ARCHIVE_FILE_NAME};
use crate::download::models::{DownloadRequest, PlaylistEntry, PlaylistInfo};
use crate::engine::{
    apply_format_overrides, keys, DownloadOptions, Engine, ProgressEvent, ProgressHook,
};
use crate::error::Result;
use crate::fs::{ensure_dir, output_template, playlist_dir};
use crate::output::{create_item_bar, ItemCounter};
use crate::platforms::PlatformId;

/// File name pattern for playlist items: zero-padded index, then title.
pub const PLAYLIST_OUTPUT_PATTERN: &str = "%(playlist_index)03d_%(title)s.%(ext)s";

/// Extractor assumed for flat entries that don't name one.
const DEFAULT_EXTRACTOR: &str = "youtube";

/// Subset of a playlist to download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistSelection {
    /// Engine item list such as `1,3,5-7`.
    pub items: Option<String>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl PlaylistSelection {
    pub fn items(items: impl Into<String>) -> Self {
        Self {
            items: Some(items.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_none() && self.start.is_none() && self.end.is_none()
    }

    /// Add the selection bounds that are present.
    pub fn apply(&self, options: &mut DownloadOptions) {
        options.set_opt(keys::PLAYLIST_ITEMS, self.items.clone());
        options.set_opt(keys::PLAYLIST_START, self.start);
        options.set_opt(keys::PLAYLIST_END, self.end);
    }
}

/// Result of a playlist download.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistOutcome {
    pub success: bool,
    pub download_dir: Option<PathBuf>,
    /// Playlist size as reported by the metadata fetch.
    pub count: usize,
    /// Entries already in the archive before this run.
    pub previously_archived: usize,
    /// Items the progress counter saw finished or skipped.
    pub completed: u64,
    pub error: Option<String>,
}

impl PlaylistOutcome {
    fn succeeded(
        download_dir: PathBuf,
        count: usize,
        previously_archived: usize,
        completed: u64,
    ) -> Self {
        Self {
            success: true,
            download_dir: Some(download_dir),
            count,
            previously_archived,
            completed,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            download_dir: None,
            count: 0,
            previously_archived: 0,
            completed: 0,
            error: Some(error.into()),
        }
    }
}

fn is_archived(archive: &DownloadArchive, entry: &PlaylistEntry) -> bool {
    let extractor = entry.ie_key.as_deref().unwrap_or(DEFAULT_EXTRACTOR);
    !entry.id.is_empty() && archive.contains_item(extractor, &entry.id)
}

/// Drives playlist metadata and downloads.
pub struct PlaylistOrchestrator {
    engine: Arc<dyn Engine>,
    default_base: PathBuf,
}

impl PlaylistOrchestrator {
    pub fn new(engine: Arc<dyn Engine>, default_base: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            default_base: default_base.into(),
        }
    }

    /// Fetch the flat playlist. `None` on any failure.
    pub async fn get_playlist_info(
        &self,
        url: &str,
        selection: &PlaylistSelection,
    ) -> Option<PlaylistInfo> {
        let mut options = DownloadOptions::new()
            .with(keys::QUIET, true)
            .with(keys::EXTRACT_FLAT, true)
            .with(keys::SKIP_DOWNLOAD, true);
        selection.apply(&mut options);

        match self.engine.fetch_metadata(url, &options).await {
            Ok(raw) => Some(PlaylistInfo::from_metadata(&raw, url)),
            Err(e) => {
                tracing::warn!("Could not fetch playlist info for {}: {}", url, e);
                None
            }
        }
    }

    /// Create the playlist's folder under `<base>/youtube`.
    pub fn prepare_destination(
        &self,
        info: &PlaylistInfo,
        output_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let base = output_dir.unwrap_or(&self.default_base);
        let dir = playlist_dir(base, PlatformId::Youtube, &info.title);
        ensure_dir(&dir)?;
        Ok(dir)
    }

    pub fn build_options(
        &self,
        dir: &Path,
        request: &DownloadRequest,
        selection: &PlaylistSelection,
    ) -> DownloadOptions {
        let mut options = DownloadOptions::new()
            .with(keys::OUTPUT_TEMPLATE, output_template(dir, PLAYLIST_OUTPUT_PATTERN))
            .with(keys::QUIET, false)
            .with(keys::NO_PLAYLIST, false)
            .with(keys::OVERWRITES, false)
            .with(keys::CONTINUE_DL, true)
            .with(
                keys::DOWNLOAD_ARCHIVE,
                dir.join(ARCHIVE_FILE_NAME).to_string_lossy().into_owned(),
            );
        selection.apply(&mut options);
        apply_format_overrides(&mut options, &request.quality, request.audio_only, None);
        options
    }

    /// Download the playlist described by `info`.
    ///
    /// Only destination I/O errors are returned; engine failures become a
    /// failed outcome. Nothing is rolled back.
    pub async fn download(
        &self,
        info: &PlaylistInfo,
        request: &DownloadRequest,
        selection: &PlaylistSelection,
    ) -> Result<PlaylistOutcome> {
        let dir = self.prepare_destination(info, request.output_dir.as_deref())?;

        let archive = DownloadArchive::in_dir(&dir)?;
        if !archive.is_empty() {
            tracing::info!(
                "Found {} previously downloaded items in {}",
                archive.len(),
                archive.path().display()
            );
        }

        let options = self.build_options(&dir, request, selection);
        let counter = ItemCounter::new(create_item_bar(info.count.max(1) as u64, "Videos"));
        // Archived items are counted up front; the engine's skip notices
        // for them are then ignored as duplicates.
        for entry in info.entries.iter().filter(|e| is_archived(&archive, e)) {
            counter.mark_done(&entry.id);
        }
        let hook: ProgressHook<'_> = &|event: &ProgressEvent| {
            counter.observe(event);
        };

        let outcome = match self
            .engine
            .transfer(&[request.url.clone()], &options, Some(hook))
            .await
        {
            Ok(items) => {
                tracing::info!("Playlist run wrote {} new files", items.len());
                PlaylistOutcome::succeeded(dir, info.count, archive.len(), counter.position())
            }
            Err(e) => PlaylistOutcome::failed(e.to_string()),
        };
        counter.finish();

        Ok(outcome)
    }

    /// Fetch, then download.
    pub async fn run(
        &self,
        request: &DownloadRequest,
        selection: &PlaylistSelection,
    ) -> Result<PlaylistOutcome> {
        match self.get_playlist_info(&request.url, selection).await {
            Some(info) => self.download(&info, request, selection).await,
            None => Ok(PlaylistOutcome::failed("Could not fetch playlist information")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::options::AUDIO_ONLY_FORMAT;
    use crate::engine::testing::FakeEngine;
    use serde_json::json;
    use tempfile::TempDir;

    const URL: &str = "https://www.youtube.com/playlist?list=PL123";

    const ENTRIES: &[(&str, &str)] = &[
        ("a", "One"),
        ("b", "Two"),
        ("c", "Three"),
        ("d", "Four"),
        ("e", "Five"),
    ];

    fn orchestrator(engine: &Arc<FakeEngine>, base: &Path) -> PlaylistOrchestrator {
        PlaylistOrchestrator::new(engine.clone(), base)
    }

    #[tokio::test]
    async fn test_resume_skips_archived_items() {
        let tmp = TempDir::new().unwrap();
        let engine = Arc::new(FakeEngine::new().with_playlist(URL, "Road Trip", ENTRIES));
        let orchestrator = orchestrator(&engine, tmp.path());

        let dir = tmp.path().join("youtube").join("Road Trip");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(ARCHIVE_FILE_NAME),
            "youtube a\nyoutube b\nyoutube c\n",
        )
        .unwrap();

        let request = DownloadRequest::new(URL);
        let outcome = orchestrator
            .run(&request, &PlaylistSelection::default())
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.count, 5);
        assert_eq!(outcome.previously_archived, 3);
        assert_eq!(outcome.download_dir.as_deref(), Some(dir.as_path()));

        let transfers = engine.transfers();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].transferred, vec!["d".to_string(), "e".to_string()]);
        assert_eq!(outcome.completed, 5);

        let archive = DownloadArchive::in_dir(&dir).unwrap();
        assert_eq!(archive.len(), 5);
    }

    #[tokio::test]
    async fn test_archived_items_counted_without_skip_events() {
        let tmp = TempDir::new().unwrap();
        let engine = Arc::new(
            FakeEngine::new()
                .with_playlist(URL, "Road Trip", ENTRIES)
                .without_skip_events(),
        );
        let orchestrator = orchestrator(&engine, tmp.path());

        let dir = tmp.path().join("youtube").join("Road Trip");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(ARCHIVE_FILE_NAME),
            "youtube a\nyoutube b\nyoutube c\nyoutube unrelated\n",
        )
        .unwrap();

        let outcome = orchestrator
            .run(&DownloadRequest::new(URL), &PlaylistSelection::default())
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.completed, 5);
        assert_eq!(engine.transfers()[0].transferred.len(), 2);
    }

    #[tokio::test]
    async fn test_second_run_downloads_nothing() {
        let tmp = TempDir::new().unwrap();
        let engine = Arc::new(FakeEngine::new().with_playlist(URL, "Mix", ENTRIES));
        let orchestrator = orchestrator(&engine, tmp.path());
        let request = DownloadRequest::new(URL);

        orchestrator.run(&request, &PlaylistSelection::default()).await.unwrap();
        let outcome = orchestrator.run(&request, &PlaylistSelection::default()).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.previously_archived, 5);
        assert!(engine.transfers()[1].transferred.is_empty());
    }

    #[tokio::test]
    async fn test_transfer_options() {
        let tmp = TempDir::new().unwrap();
        let engine = Arc::new(FakeEngine::new().with_playlist(URL, "Mix", ENTRIES));
        let orchestrator = orchestrator(&engine, tmp.path());

        let request = DownloadRequest::new(URL).with_audio_only(true);
        let selection = PlaylistSelection {
            items: None,
            start: Some(2),
            end: Some(4),
        };
        orchestrator.run(&request, &selection).await.unwrap();

        let options = &engine.transfers()[0].options;
        let dir = tmp.path().join("youtube").join("Mix");
        let template = dir.join(PLAYLIST_OUTPUT_PATTERN).to_string_lossy().into_owned();
        assert_eq!(options.get_str(keys::OUTPUT_TEMPLATE), Some(template.as_str()));
        assert_eq!(options.get_bool(keys::NO_PLAYLIST), Some(false));
        assert_eq!(options.get_bool(keys::OVERWRITES), Some(false));
        assert_eq!(options.get_bool(keys::CONTINUE_DL), Some(true));
        assert_eq!(options.get(keys::PLAYLIST_START), Some(&json!(2)));
        assert_eq!(options.get(keys::PLAYLIST_END), Some(&json!(4)));
        assert!(!options.contains(keys::PLAYLIST_ITEMS));
        assert_eq!(options.format(), Some(AUDIO_ONLY_FORMAT));

        let metadata_options = &engine.metadata_calls()[0].1;
        assert_eq!(metadata_options.get_bool(keys::EXTRACT_FLAT), Some(true));
        assert_eq!(metadata_options.get_bool(keys::SKIP_DOWNLOAD), Some(true));
        assert_eq!(metadata_options.get(keys::PLAYLIST_START), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_unavailable_playlist() {
        let tmp = TempDir::new().unwrap();
        let engine = Arc::new(FakeEngine::new());
        let orchestrator = orchestrator(&engine, tmp.path());

        assert!(orchestrator
            .get_playlist_info(URL, &PlaylistSelection::default())
            .await
            .is_none());

        let outcome = orchestrator
            .run(&DownloadRequest::new(URL), &PlaylistSelection::default())
            .await
            .unwrap();
        assert!(!outcome.success);
        assert!(engine.transfers().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_failure_keeps_directory() {
        let tmp = TempDir::new().unwrap();
        let engine = Arc::new(
            FakeEngine::new()
                .with_playlist(URL, "Mix", ENTRIES)
                .with_outcomes(&[Err("network down")]),
        );
        let orchestrator = orchestrator(&engine, tmp.path());

        let outcome = orchestrator
            .run(&DownloadRequest::new(URL), &PlaylistSelection::default())
            .await
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("network down"));
        assert!(tmp.path().join("youtube").join("Mix").is_dir());
    }

    #[tokio::test]
    async fn test_unsafe_title_uses_fallback_folder() {
        let tmp = TempDir::new().unwrap();
        let engine = Arc::new(FakeEngine::new().with_playlist(URL, "../..", ENTRIES));
        let orchestrator = orchestrator(&engine, tmp.path());

        let outcome = orchestrator
            .run(&DownloadRequest::new(URL), &PlaylistSelection::default())
            .await
            .unwrap();

        assert_eq!(
            outcome.download_dir,
            Some(tmp.path().join("youtube").join("playlist"))
        );
    }

    #[test]
    fn test_selection_apply_only_present() {
        let mut options = DownloadOptions::new();
        PlaylistSelection::items("1,3").apply(&mut options);
        assert_eq!(options.get_str(keys::PLAYLIST_ITEMS), Some("1,3"));
        assert!(!options.contains(keys::PLAYLIST_START));
        assert!(!options.contains(keys::PLAYLIST_END));

        assert!(PlaylistSelection::default().is_empty());
    }
}
