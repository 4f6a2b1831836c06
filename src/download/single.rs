//! Single video download with console feedback.

use crate::download::context::DownloadContext;
use crate::download::models::{DownloadRequest, DownloadResult};
use crate::engine::{ProgressEvent, ProgressHook};
use crate::error::Error;
use crate::output::{
    create_download_bar, create_spinner, print_error, print_format_table, print_success,
    print_video_info, print_warning, ByteProgress,
};
use crate::platforms::PlatformId;

/// Download one video, showing its info panel and a byte progress bar.
pub async fn download_with_progress(
    ctx: &DownloadContext,
    request: &DownloadRequest,
    platform: PlatformId,
) -> DownloadResult {
    let adapter = match ctx.adapter_for(platform) {
        Ok(adapter) => adapter,
        Err(e) => {
            let message = Error::DownloadFailed(e.to_string()).to_string();
            print_error(&message);
            return DownloadResult::failed(platform, message);
        }
    };

    let request = &adapter.resolve_request(request).await;

    let spinner = create_spinner("Fetching video information...");
    let info = adapter.get_video_info(&request.url).await;
    spinner.finish_and_clear();

    match &info {
        Ok(info) => print_video_info(info),
        Err(e) => print_warning(&e.to_string()),
    }

    tracing::info!("Downloading {} video: {}", platform, request.url);

    let progress = ByteProgress::new(create_download_bar(0));
    progress
        .bar()
        .set_message(format!("Downloading {} video", platform));
    let hook: ProgressHook<'_> = &|event: &ProgressEvent| progress.observe(event);

    let result = adapter.download(request, Some(hook)).await;
    progress.finish();

    if result.success {
        print_success("Download completed!");
        if let Some(filename) = &result.filename {
            print_success(&format!("Saved to: {}", filename));
        }
    } else {
        print_error(result.error.as_deref().unwrap_or("Download failed: unknown error"));
    }

    result
}

/// Print the formats the engine offers for a URL. Returns whether any were found.
pub async fn list_formats(ctx: &DownloadContext, url: &str, platform: PlatformId) -> bool {
    let adapter = match ctx.adapter_for(platform) {
        Ok(adapter) => adapter,
        Err(e) => {
            print_error(&e.to_string());
            return false;
        }
    };

    let spinner = create_spinner("Fetching available formats...");
    let formats = adapter.get_available_formats(url).await;
    spinner.finish_and_clear();

    if formats.is_empty() {
        print_error("No formats available or could not fetch video info");
        return false;
    }

    print_format_table(platform.as_str(), &formats);
    true
}
