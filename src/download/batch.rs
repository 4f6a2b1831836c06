//! Batch downloads from a file of URLs.

use std::path::Path;

use console::style;

use crate::download::context::DownloadContext;
use crate::download::models::DownloadRequest;
use crate::download::single::download_with_progress;
use crate::download::state::BatchReport;
use crate::error::{Error, Result};
use crate::output::{print_error, print_info};
use crate::platforms::{resolve_or, PlatformId};

/// Download every URL in `file`, one per line.
///
/// `template` carries the quality, audio and output settings applied to each
/// line. A failing line is recorded and the run moves on.
pub async fn run_batch(
    ctx: &DownloadContext,
    file: &Path,
    explicit_platform: Option<PlatformId>,
    template: &DownloadRequest,
) -> Result<BatchReport> {
    let content = tokio::fs::read_to_string(file).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(file.display().to_string())
        } else {
            Error::Io(e)
        }
    })?;

    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    print_info(&format!("Found {} URLs to process", lines.len()));

    let mut report = BatchReport::new();
    for (index, (line_no, url)) in lines.iter().enumerate() {
        println!();
        println!(
            "{}",
            style(format!("[{}/{}] Processing: {}", index + 1, lines.len(), url)).bold()
        );

        let Some(platform) = resolve_or(url, explicit_platform) else {
            let err = Error::PlatformUndetected(url.to_string());
            print_error(&err.to_string());
            report.record_failure(*line_no, url, err.to_string());
            continue;
        };

        let request = DownloadRequest {
            url: url.to_string(),
            ..template.clone()
        };

        let result = download_with_progress(ctx, &request, platform).await;
        if result.success {
            report.record_success();
        } else {
            let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
            tracing::warn!("Batch line {} failed: {}", line_no, reason);
            report.record_failure(*line_no, url, reason);
        }
    }

    Ok(report)
}
