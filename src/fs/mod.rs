//! Filesystem module.
//!
//! Provides:
//! - Download directory layout
//! - Filename sanitization

pub mod naming;
pub mod paths;

pub use naming::{playlist_folder_name, sanitize_filename};
pub use paths::{
    default_download_base, ensure_dir, output_template, platform_dir, playlist_dir,
};
