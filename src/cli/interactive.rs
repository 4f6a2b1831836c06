//! Interactive prompt loop.
//!
//! Prompts run on a blocking thread so the runtime keeps polling the Ctrl+C
//! handler while waiting for input.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::download::{
    download_with_progress, DownloadContext, DownloadRequest, PlaylistSelection,
};
use crate::engine::options::DEFAULT_QUALITY;
use crate::error::{Error, Result};
use crate::output::{
    create_spinner, print_error, print_info, print_playlist_info, print_success,
    print_video_info, print_warning,
};
use crate::platforms::{is_playlist_url, resolve, PlatformId};

/// Quality presets offered for video downloads.
pub const QUALITY_CHOICES: &[(&str, &str)] = &[
    ("Best quality", DEFAULT_QUALITY),
    ("720p", "best[height<=720]"),
    ("480p", "best[height<=480]"),
    ("360p", "best[height<=360]"),
    ("Worst quality", "worst"),
];

const DOWNLOAD_TYPES: &[(&str, bool)] = &[("Video", false), ("Audio only (MP3)", true)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaylistAction {
    All,
    Items,
    Skip,
}

const PLAYLIST_ACTIONS: &[(&str, PlaylistAction)] = &[
    ("Download entire playlist", PlaylistAction::All),
    ("Select specific items (e.g., 1,3,5-8)", PlaylistAction::Items),
    ("Skip", PlaylistAction::Skip),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

async fn blocking_prompt<T, F>(prompt: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
{
    let answer = tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;
    Ok(answer)
}

async fn input(message: &str) -> Result<String> {
    let message = message.to_string();
    let answer = blocking_prompt(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
    })
    .await?;
    Ok(answer.trim().to_string())
}

/// Pick one entry; the first is preselected.
async fn select<T: Copy>(message: &str, choices: &[(&str, T)]) -> Result<T> {
    let message = message.to_string();
    let labels: Vec<String> = choices.iter().map(|(label, _)| label.to_string()).collect();
    let index = blocking_prompt(move || {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .items(&labels)
            .default(0)
            .interact()
    })
    .await?;
    Ok(choices[index].1)
}

async fn confirm(message: &str, default: bool) -> Result<bool> {
    let message = message.to_string();
    blocking_prompt(move || {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(default)
            .interact()
    })
    .await
}

/// Ask for video/audio and, for video, a quality preset.
async fn choose_format() -> Result<(String, bool)> {
    let audio_only = select("Download type", DOWNLOAD_TYPES).await?;

    if audio_only {
        return Ok((DEFAULT_QUALITY.to_string(), true));
    }

    let quality = select("Quality", QUALITY_CHOICES).await?;
    Ok((quality.to_string(), false))
}

async fn handle_playlist(ctx: &DownloadContext, url: &str) -> Result<Flow> {
    let orchestrator = ctx.playlists();

    let spinner = create_spinner("Fetching playlist information...");
    let info = orchestrator
        .get_playlist_info(url, &PlaylistSelection::default())
        .await;
    spinner.finish_and_clear();

    let Some(info) = info else {
        print_error("Could not fetch playlist info");
        return Ok(Flow::Continue);
    };
    print_playlist_info(&info);

    let action = select("Playlist action", PLAYLIST_ACTIONS).await?;

    let selection = match action {
        PlaylistAction::Skip => return Ok(Flow::Continue),
        PlaylistAction::All => PlaylistSelection::default(),
        PlaylistAction::Items => {
            let items = input("Enter items (e.g., 1,3,5-8)").await?;
            if items.is_empty() {
                PlaylistSelection::default()
            } else {
                crate::config::validate_playlist_selection(Some(&items), None, None)?;
                PlaylistSelection::items(items)
            }
        }
    };

    let (quality, audio_only) = choose_format().await?;

    if confirm("Start playlist download?", true).await? {
        let request = DownloadRequest::new(url)
            .with_quality(quality)
            .with_audio_only(audio_only);
        let outcome = orchestrator.download(&info, &request, &selection).await?;
        super::report_playlist_outcome(&outcome);
    }

    Ok(Flow::Continue)
}

async fn handle_single(ctx: &DownloadContext, url: &str, platform: PlatformId) -> Result<Flow> {
    let adapter = ctx.adapter_for(platform)?;
    let url = adapter.resolve_request(&DownloadRequest::new(url)).await.url;

    let spinner = create_spinner("Fetching video information...");
    let info = adapter.get_video_info(&url).await;
    spinner.finish_and_clear();

    match info {
        Ok(info) => {
            print_success(&format!("Video found on {}", platform));
            print_video_info(&info);
        }
        Err(e) => print_warning(&e.to_string()),
    }

    let (quality, audio_only) = choose_format().await?;

    if confirm("Start download?", true).await? {
        let request = DownloadRequest::new(&url)
            .with_quality(quality)
            .with_audio_only(audio_only);
        download_with_progress(ctx, &request, platform).await;
    }

    if confirm("Download another video?", true).await? {
        Ok(Flow::Continue)
    } else {
        Ok(Flow::Quit)
    }
}

async fn handle_url(ctx: &DownloadContext, url: &str) -> Result<Flow> {
    let platform = resolve(url);

    // Playlist links count as YouTube even when the host isn't recognized.
    if is_playlist_url(url) && matches!(platform, None | Some(PlatformId::Youtube)) {
        return handle_playlist(ctx, url).await;
    }

    match platform {
        Some(platform) => handle_single(ctx, url, platform).await,
        None => {
            print_error(&Error::PlatformUndetected(url.to_string()).to_string());
            Ok(Flow::Continue)
        }
    }
}

/// Run the interactive loop until the user enters an empty URL or declines
/// another download.
pub async fn run_interactive(ctx: &DownloadContext) -> Result<()> {
    println!(
        "{}",
        style("Interactive Video Downloader").cyan().bold()
    );
    print_info("Download videos from YouTube, TikTok, Instagram, Facebook, and Twitter/X");
    print_info("Press Ctrl+C to exit");

    loop {
        let url = input("Enter video URL").await?;
        if url.is_empty() {
            break;
        }

        match handle_url(ctx, &url).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => print_error(&format!("Error: {}", e)),
        }
    }

    print_success("Goodbye!");
    Ok(())
}
