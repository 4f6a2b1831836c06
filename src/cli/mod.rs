//! Command-line front end.
//!
//! This module provides:
//! - Argument parsing
//! - Dispatch of the parsed arguments to a download flow
//! - The interactive prompt loop

pub mod args;
pub mod interactive;

use std::path::PathBuf;

use crate::download::{
    download_with_progress, list_formats, run_batch, DownloadContext, DownloadRequest,
    PlaylistOutcome, PlaylistSelection,
};
use crate::error::{Error, Result};
use crate::output::{
    create_spinner, print_batch_summary, print_error, print_info, print_playlist_info,
    print_success,
};
use crate::platforms::{is_playlist_url, resolve_or, PlatformId};

pub use args::{Args, PlatformArg};
pub use interactive::run_interactive;

/// Print a playlist outcome. Returns whether it succeeded.
pub fn report_playlist_outcome(outcome: &PlaylistOutcome) -> bool {
    if outcome.success {
        if outcome.previously_archived > 0 {
            print_info(&format!(
                "{} of {} items were already downloaded",
                outcome.previously_archived.min(outcome.count),
                outcome.count
            ));
        }
        print_success("Playlist download completed!");
        if let Some(dir) = &outcome.download_dir {
            print_success(&format!("Saved to: {}", dir.display()));
        }
    } else {
        print_error(&format!(
            "Playlist download failed: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        ));
    }
    outcome.success
}

/// Fetch, show and download a playlist.
pub async fn download_playlist(
    ctx: &DownloadContext,
    request: &DownloadRequest,
    selection: &PlaylistSelection,
) -> Result<bool> {
    let orchestrator = ctx.playlists();

    let spinner = create_spinner("Fetching playlist information...");
    let info = orchestrator.get_playlist_info(&request.url, selection).await;
    spinner.finish_and_clear();

    let Some(info) = info else {
        print_error("Could not fetch playlist info");
        return Ok(false);
    };
    print_playlist_info(&info);

    let outcome = orchestrator.download(&info, request, selection).await?;
    Ok(report_playlist_outcome(&outcome))
}

fn request_from(args: &Args, ctx: &DownloadContext, url: &str) -> DownloadRequest {
    ctx.request(url).with_audio_only(args.audio_only)
}

fn require_platform(url: &str, explicit: Option<PlatformId>) -> Result<PlatformId> {
    resolve_or(url, explicit).ok_or_else(|| Error::PlatformUndetected(url.to_string()))
}

/// Run the flow selected by the arguments. Returns whether it succeeded.
pub async fn execute(args: &Args, ctx: &DownloadContext) -> Result<bool> {
    let explicit = args.platform();
    let selection = args.playlist_selection();

    if args.interactive {
        run_interactive(ctx).await?;
        return Ok(true);
    }

    if let Some(url) = &args.playlist {
        return download_playlist(ctx, &request_from(args, ctx, url), &selection).await;
    }

    if let (true, Some(url)) = (args.list_formats, &args.url) {
        let platform = require_platform(url, explicit)?;
        return Ok(list_formats(ctx, url, platform).await);
    }

    if let Some(file) = &args.batch {
        let template = request_from(args, ctx, "");
        let report = run_batch(ctx, file, explicit, &template).await?;
        print_batch_summary(&report);
        return Ok(report.all_succeeded());
    }

    if let Some(url) = &args.url {
        let platform = require_platform(url, explicit)?;
        let request = request_from(args, ctx, url);

        if platform == PlatformId::Youtube && is_playlist_url(url) {
            return download_playlist(ctx, &request, &selection).await;
        }

        let result = download_with_progress(ctx, &request, platform).await;
        return Ok(result.success);
    }

    Ok(true)
}

/// Config file to load: the explicit path, else the default location if present.
pub fn config_path(args: &Args) -> Option<PathBuf> {
    args.config.clone().or_else(|| {
        crate::config::Config::default_path().filter(|path| path.exists())
    })
}
