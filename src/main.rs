//! Video Downloader - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, EnvFilter};

use video_downloader::{
    cli::{config_path, execute, Args},
    config::{validate_config, validate_playlist_selection, Config},
    download::DownloadContext,
    engine::YtDlp,
    error::{exit_codes, Result},
    output::{print_banner, print_error, print_info, print_warning},
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.is_empty() {
        let _ = Args::command().print_help();
        return ExitCode::from(exit_codes::SUCCESS);
    }

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    tokio::select! {
        result = run(args) => match result {
            Ok(true) => ExitCode::from(exit_codes::SUCCESS),
            Ok(false) => ExitCode::from(exit_codes::FAILURE),
            Err(e) => {
                print_error(&e.to_string());
                ExitCode::from(exit_codes::FAILURE)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!();
            print_warning("Download cancelled by user");
            // A prompt may still be blocking on stdin; don't wait for it.
            std::process::exit(i32::from(exit_codes::FAILURE));
        }
    }
}

async fn run(args: Args) -> Result<bool> {
    print_banner();

    // Load configuration
    let mut config = match config_path(&args) {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            Config::load(&path)?
        }
        None => Config::default(),
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    validate_config(&config)?;
    validate_playlist_selection(
        args.playlist_items.as_deref(),
        args.playlist_start,
        args.playlist_end,
    )?;

    let engine = YtDlp::new(config.engine.binary.clone());
    let version = engine.version().await?;
    tracing::debug!("Using yt-dlp {}", version);
    print_info(&format!(
        "Saving to: {}",
        config.download_directory().display()
    ));

    let ctx = DownloadContext::new(config, Arc::new(engine));
    execute(&args, &ctx).await
}
