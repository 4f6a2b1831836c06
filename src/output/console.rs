//! Console output utilities.

use console::style;

use crate::download::models::{PlaylistInfo, VideoInfo};

/// Characters of a playlist description shown in its panel.
const PLAYLIST_DESCRIPTION_CHARS: usize = 200;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Video Downloader                                  ║
║     YouTube · TikTok · Instagram · Facebook · X       ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Render a duration in seconds as `M:SS` or `H:MM:SS`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Group digits with commas: `1234567` → `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Print the metadata panel for a single video.
pub fn print_video_info(info: &VideoInfo) {
    println!();
    println!("{}", style("Video Information:").bold());
    println!("  Title:    {}", style(&info.title).cyan());
    println!("  Uploader: {}", info.uploader);
    println!("  Duration: {}", format_duration(info.duration));
    println!("  Views:    {}", format_count(info.view_count));
    if let Some(likes) = info.like_count {
        println!("  Likes:    {}", format_count(likes));
    }
    if let Some(comments) = info.comment_count {
        println!("  Comments: {}", format_count(comments));
    }
    if let Some(description) = &info.description {
        println!("  Description: {}", style(description).dim());
    }
    println!();
}

/// Print the summary panel for a playlist.
pub fn print_playlist_info(info: &PlaylistInfo) {
    println!();
    println!("{}", style("Playlist Information:").bold());
    println!("  Title:    {}", style(&info.title).cyan());
    println!("  Uploader: {}", info.uploader);
    println!("  Videos:   {}", info.count);
    println!("  URL:      {}", info.source_url);
    if !info.description.is_empty() {
        let preview: String = info.description.chars().take(PLAYLIST_DESCRIPTION_CHARS).collect();
        println!("  {}", style(preview).dim());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.6), "1:00");
        assert_eq!(format_duration(125.0), "2:05");
        assert_eq!(format_duration(3725.0), "1:02:05");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
