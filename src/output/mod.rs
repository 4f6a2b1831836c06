//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output and info panels
//! - Progress bars driven by engine events
//! - Summaries and format tables

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_error, print_info, print_playlist_info, print_success, print_video_info,
    print_warning,
};
pub use progress::{
    create_download_bar, create_item_bar, create_spinner, ByteProgress, ItemCounter,
};
pub use stats::{print_batch_summary, print_format_table};
