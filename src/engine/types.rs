//! Records exchanged with the extraction engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transfer state reported by a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Downloading,
    Finished,
    /// Item was already recorded in the download archive.
    Skipped,
    Error,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::Downloading => write!(f, "downloading"),
            ProgressStatus::Finished => write!(f, "finished"),
            ProgressStatus::Skipped => write!(f, "skipped"),
            ProgressStatus::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for ProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "downloading" => Ok(ProgressStatus::Downloading),
            "finished" => Ok(ProgressStatus::Finished),
            "skipped" => Ok(ProgressStatus::Skipped),
            "error" => Ok(ProgressStatus::Error),
            _ => Err(format!("Unknown progress status: {}", s)),
        }
    }
}

/// A single progress notification emitted during a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    pub downloaded_bytes: Option<u64>,
    pub total_bytes: Option<u64>,
    pub total_bytes_estimate: Option<u64>,
    /// Identifier of the item being transferred, when known.
    pub item_id: Option<String>,
}

impl ProgressEvent {
    pub fn new(status: ProgressStatus) -> Self {
        Self {
            status,
            downloaded_bytes: None,
            total_bytes: None,
            total_bytes_estimate: None,
            item_id: None,
        }
    }

    pub fn for_item(mut self, id: impl Into<String>) -> Self {
        self.item_id = Some(id.into());
        self
    }

    /// Exact total if known, otherwise the estimate.
    pub fn total(&self) -> Option<u64> {
        self.total_bytes.or(self.total_bytes_estimate)
    }
}

/// Callback invoked synchronously from inside the engine's transfer loop.
///
/// Must not block and must not start another download.
pub type ProgressHook<'a> = &'a (dyn Fn(&ProgressEvent) + Send + Sync);

/// A file the engine finished writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferredItem {
    pub id: String,
    pub title: String,
    pub filepath: String,
}
