//! Download module.
//!
//! This module provides:
//! - Request/result records and metadata normalization
//! - The per-platform adapter with fallback stages
//! - Resumable playlist downloads backed by a download archive
//! - Single and batch download flows

pub mod adapter;
pub mod archive;
pub mod batch;
pub mod context;
pub mod models;
pub mod playlist;
pub mod single;
pub mod state;

pub use adapter::Adapter;
pub use archive::DownloadArchive;
pub use batch::run_batch;
pub use context::DownloadContext;
pub use models::{DownloadRequest, DownloadResult, FormatDescriptor, PlaylistInfo, VideoInfo};
pub use playlist::{PlaylistOrchestrator, PlaylistOutcome, PlaylistSelection};
pub use single::{download_with_progress, list_formats};
pub use state::BatchReport;
