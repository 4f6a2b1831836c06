//! Scripted engine used by orchestration tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::download::archive::DownloadArchive;
use crate::engine::options::{keys, DownloadOptions};
use crate::engine::types::{ProgressEvent, ProgressHook, ProgressStatus, TransferredItem};
use crate::engine::Engine;
use crate::error::{Error, Result};

/// One recorded `transfer` call.
#[derive(Debug, Clone)]
pub struct TransferCall {
    pub urls: Vec<String>,
    pub options: DownloadOptions,
    /// Item ids actually written during the call.
    pub transferred: Vec<String>,
}

/// Engine returning scripted outcomes without touching the network.
#[derive(Default)]
pub struct FakeEngine {
    metadata: Mutex<HashMap<String, Value>>,
    outcomes: Mutex<VecDeque<std::result::Result<(), String>>>,
    failing_urls: Mutex<HashSet<String>>,
    playlists: Mutex<HashMap<String, Vec<(String, String)>>>,
    transfers: Mutex<Vec<TransferCall>>,
    metadata_calls: Mutex<Vec<(String, DownloadOptions)>>,
    silent_skips: bool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(self, url: &str, value: Value) -> Self {
        self.metadata.lock().unwrap().insert(url.to_string(), value);
        self
    }

    /// Outcomes consumed by successive transfers; once empty, transfers succeed.
    pub fn with_outcomes(self, outcomes: &[std::result::Result<(), &str>]) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .extend(outcomes.iter().copied().map(|o| o.map_err(str::to_string)));
        self
    }

    /// Transfers involving this URL always fail.
    pub fn failing_url(self, url: &str) -> Self {
        self.failing_urls.lock().unwrap().insert(url.to_string());
        self
    }

    /// Register a playlist of `(id, title)` entries, honoring the download archive.
    pub fn with_playlist(self, url: &str, title: &str, entries: &[(&str, &str)]) -> Self {
        let flat: Vec<Value> = entries
            .iter()
            .map(|(id, title)| json!({"id": id, "title": title, "ie_key": "Youtube"}))
            .collect();
        let info = json!({
            "id": "PL123",
            "title": title,
            "uploader": "Uploader",
            "webpage_url": url,
            "description": "A playlist",
            "entries": flat,
        });
        self.playlists.lock().unwrap().insert(
            url.to_string(),
            entries
                .iter()
                .map(|(id, title)| (id.to_string(), title.to_string()))
                .collect(),
        );
        self.with_metadata(url, info)
    }

    /// Skip archived playlist items without reporting them, like an
    /// engine whose skip notice wasn't recognized.
    pub fn without_skip_events(mut self) -> Self {
        self.silent_skips = true;
        self
    }

    pub fn transfers(&self) -> Vec<TransferCall> {
        self.transfers.lock().unwrap().clone()
    }

    pub fn metadata_calls(&self) -> Vec<(String, DownloadOptions)> {
        self.metadata_calls.lock().unwrap().clone()
    }

    fn emit(hook: Option<ProgressHook<'_>>, event: ProgressEvent) {
        if let Some(hook) = hook {
            hook(&event);
        }
    }

    fn transfer_playlist(
        &self,
        entries: &[(String, String)],
        options: &DownloadOptions,
        hook: Option<ProgressHook<'_>>,
    ) -> Result<Vec<TransferredItem>> {
        let mut archive = match options.get_str(keys::DOWNLOAD_ARCHIVE) {
            Some(path) => Some(DownloadArchive::load(Path::new(path))?),
            None => None,
        };

        let mut items = Vec::new();
        for (index, (id, title)) in entries.iter().enumerate() {
            if archive
                .as_ref()
                .map(|a| a.contains_item("youtube", id))
                .unwrap_or(false)
            {
                if !self.silent_skips {
                    Self::emit(hook, ProgressEvent::new(ProgressStatus::Skipped).for_item(id));
                }
                continue;
            }

            let mut progress = ProgressEvent::new(ProgressStatus::Downloading).for_item(id);
            progress.downloaded_bytes = Some(512);
            progress.total_bytes = Some(1024);
            Self::emit(hook, progress);
            Self::emit(hook, ProgressEvent::new(ProgressStatus::Finished).for_item(id));

            if let Some(archive) = archive.as_mut() {
                archive.record("youtube", id)?;
            }

            items.push(TransferredItem {
                id: id.clone(),
                title: title.clone(),
                filepath: format!("{:03}_{}.mp4", index + 1, title),
            });
        }

        Ok(items)
    }
}

#[async_trait]
impl Engine for FakeEngine {
    async fn fetch_metadata(&self, url: &str, options: &DownloadOptions) -> Result<Value> {
        self.metadata_calls
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));

        self.metadata
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Engine(format!("Unsupported URL: {}", url)))
    }

    async fn transfer(
        &self,
        urls: &[String],
        options: &DownloadOptions,
        hook: Option<ProgressHook<'_>>,
    ) -> Result<Vec<TransferredItem>> {
        let failing = {
            let failing_urls = self.failing_urls.lock().unwrap();
            urls.iter().any(|u| failing_urls.contains(u))
        };
        let scripted = self.outcomes.lock().unwrap().pop_front();

        let outcome = if failing {
            Err(Error::Engine(format!("Unable to extract {}", urls.join(", "))))
        } else {
            match scripted {
                Some(Err(message)) => Err(Error::Engine(message)),
                _ => Ok(()),
            }
        };

        let result = outcome.and_then(|()| {
            let playlist = urls
                .first()
                .and_then(|u| self.playlists.lock().unwrap().get(u).cloned());

            match playlist {
                Some(entries) => self.transfer_playlist(&entries, options, hook),
                None => {
                    let url = urls.first().cloned().unwrap_or_default();
                    let title = self
                        .metadata
                        .lock()
                        .unwrap()
                        .get(&url)
                        .and_then(|m| m["title"].as_str().map(str::to_string))
                        .unwrap_or_else(|| "Fake Video".to_string());
                    let filepath = options
                        .get_str(keys::OUTPUT_TEMPLATE)
                        .unwrap_or("%(title)s.%(ext)s")
                        .replace("%(title)s", &title)
                        .replace("%(ext)s", "mp4");

                    let mut progress = ProgressEvent::new(ProgressStatus::Downloading);
                    progress.downloaded_bytes = Some(100);
                    progress.total_bytes_estimate = Some(200);
                    Self::emit(hook, progress);
                    Self::emit(hook, ProgressEvent::new(ProgressStatus::Finished));

                    Ok(vec![TransferredItem {
                        id: "fake".to_string(),
                        title,
                        filepath,
                    }])
                }
            }
        });

        let transferred = result
            .as_ref()
            .map(|items| items.iter().map(|i| i.id.clone()).collect())
            .unwrap_or_default();
        self.transfers.lock().unwrap().push(TransferCall {
            urls: urls.to_vec(),
            options: options.clone(),
            transferred,
        });

        result
    }
}
