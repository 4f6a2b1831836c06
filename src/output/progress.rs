//! Progress bar utilities.

use std::collections::HashSet;
use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::engine::{ProgressEvent, ProgressStatus};

/// Create a spinner for long-running operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("spinner template is valid"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Create a progress bar for downloads.
pub fn create_download_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
            .expect("download bar template is valid")
            .progress_chars("#>-"),
    );
    bar
}

/// Create a progress bar for item counts.
pub fn create_item_bar(total: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}}",
                message
            ))
            .expect("item bar template is valid")
            .progress_chars("#>-"),
    );
    bar
}

/// Byte progress for a single download, fed by engine events.
pub struct ByteProgress {
    bar: ProgressBar,
}

impl ByteProgress {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }

    pub fn observe(&self, event: &ProgressEvent) {
        match event.status {
            ProgressStatus::Downloading => {
                if let Some(total) = event.total() {
                    self.bar.set_length(total);
                }
                if let Some(downloaded) = event.downloaded_bytes {
                    self.bar.set_position(downloaded);
                }
            }
            ProgressStatus::Finished => {
                if let Some(length) = self.bar.length() {
                    self.bar.set_position(length);
                }
                self.bar.println("Download completed, processing...");
            }
            ProgressStatus::Skipped | ProgressStatus::Error => {}
        }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Counts playlist items as they finish or are skipped.
///
/// Each item id advances the bar once, so merged video+audio downloads are
/// not counted twice. Events without an id always advance.
pub struct ItemCounter {
    bar: ProgressBar,
    seen: Mutex<HashSet<String>>,
}

impl ItemCounter {
    pub fn new(bar: ProgressBar) -> Self {
        Self {
            bar,
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Returns whether the event advanced the counter.
    pub fn observe(&self, event: &ProgressEvent) -> bool {
        if !matches!(event.status, ProgressStatus::Finished | ProgressStatus::Skipped) {
            return false;
        }

        match &event.item_id {
            Some(id) => self.mark_done(id),
            None => {
                self.bar.inc(1);
                true
            }
        }
    }

    /// Count an item as done without an engine event, e.g. one already in
    /// the download archive. Later events for the same id are ignored.
    pub fn mark_done(&self, id: &str) -> bool {
        let mut seen = match self.seen.lock() {
            Ok(seen) => seen,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !seen.insert(id.to_string()) {
            return false;
        }

        self.bar.inc(1);
        true
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}
