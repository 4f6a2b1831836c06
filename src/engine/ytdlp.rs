//! `yt-dlp` process driver.
//!
//! Options are translated into command-line flags, metadata is requested as a
//! single JSON document, and progress is read back line by line from a custom
//! progress template on stdout.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::engine::options::{keys, DownloadOptions, EXTRACT_AUDIO_PP};
use crate::engine::types::{ProgressEvent, ProgressHook, ProgressStatus, TransferredItem};
use crate::engine::Engine;
use crate::error::{Error, Result};

/// Prefix that marks our progress lines in the engine's stdout.
const PROGRESS_MARKER: &str = "[vdl-progress]";

/// Per-file record written once the file is in its final place.
const PRINT_TEMPLATE: &str = "after_move:%(id)s\t%(filepath)s\t%(title)s";

/// Number of stderr lines kept for error reporting.
const STDERR_TAIL: usize = 50;

/// Engine backed by the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Report the installed version, failing if the binary can't be run.
    pub async fn version(&self) -> Result<String> {
        let output = self
            .command()
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(Error::Engine(format!(
                "yt-dlp --version exited with status: {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command.stdin(Stdio::null()).kill_on_drop(true);
        command
    }

    fn spawn_error(&self, e: std::io::Error) -> Error {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::EngineNotFound(self.binary.display().to_string())
        } else {
            Error::Engine(format!("Failed to run yt-dlp: {}", e))
        }
    }
}

#[async_trait]
impl Engine for YtDlp {
    async fn fetch_metadata(&self, url: &str, options: &DownloadOptions) -> Result<Value> {
        let mut args = vec!["-J".to_string(), "--no-warnings".to_string()];
        args.extend(option_args(options));
        args.push("--".to_string());
        args.push(url.to_string());

        tracing::debug!("yt-dlp {}", args.join(" "));

        let output = self
            .command()
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Engine(summarize_failure(stderr.lines(), output.status)));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn transfer(
        &self,
        urls: &[String],
        options: &DownloadOptions,
        hook: Option<ProgressHook<'_>>,
    ) -> Result<Vec<TransferredItem>> {
        let print_file = tempfile::NamedTempFile::new()?;

        let mut args = option_args(options);
        args.extend([
            "--newline".to_string(),
            "--progress".to_string(),
            "--progress-template".to_string(),
            progress_template(),
            "--print-to-file".to_string(),
            PRINT_TEMPLATE.to_string(),
            print_file.path().display().to_string(),
            "--".to_string(),
        ]);
        args.extend(urls.iter().cloned());

        tracing::debug!("yt-dlp {}", args.join(" "));

        let mut child = self
            .command()
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Engine("Failed to capture yt-dlp stdout".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Engine("Failed to capture yt-dlp stderr".into()))?;

        let stderr_task = tokio::spawn(async move {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL);
            let mut segments = BufReader::new(stderr).split(b'\n');
            while let Ok(Some(segment)) = segments.next_segment().await {
                let line = String::from_utf8_lossy(&segment).trim_end().to_string();
                tracing::debug!("yt-dlp stderr: {}", line);
                if tail.len() == STDERR_TAIL {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            tail
        });

        let mut segments = BufReader::new(stdout).split(b'\n');
        while let Some(segment) = segments.next_segment().await? {
            let line = String::from_utf8_lossy(&segment);
            let line = line.trim_end();

            match parse_progress_line(line).or_else(|| parse_archive_skip(line)) {
                Some(event) => {
                    if let Some(hook) = hook {
                        hook(&event);
                    }
                }
                None => tracing::debug!("yt-dlp: {}", line),
            }
        }

        let status = child.wait().await?;
        let tail = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(Error::Engine(summarize_failure(
                tail.iter().map(String::as_str),
                status,
            )));
        }

        let printed = tokio::fs::read_to_string(print_file.path()).await?;
        Ok(printed.lines().filter_map(parse_printed_item).collect())
    }
}

/// Translate an option mapping into `yt-dlp` flags.
pub fn option_args(options: &DownloadOptions) -> Vec<String> {
    let mut args = Vec::new();

    for (key, value) in options.iter() {
        match key {
            keys::FORMAT => push_valued(&mut args, "-f", value),
            keys::OUTPUT_TEMPLATE => push_valued(&mut args, "-o", value),
            keys::QUIET => push_switch(&mut args, value, Some("--quiet"), None),
            keys::EXTRACT_FLAT => push_switch(
                &mut args,
                value,
                Some("--flat-playlist"),
                Some("--no-flat-playlist"),
            ),
            keys::SKIP_DOWNLOAD => push_switch(&mut args, value, Some("--skip-download"), None),
            keys::IMPERSONATE => push_valued(&mut args, "--impersonate", value),
            keys::HTTP_HEADERS => {
                if let Some(headers) = value.as_object() {
                    for (name, header_value) in headers {
                        if let Some(header_value) = scalar_arg(header_value) {
                            args.push("--add-header".to_string());
                            args.push(format!("{}:{}", name, header_value));
                        }
                    }
                }
            }
            keys::COOKIE_FILE => push_valued(&mut args, "--cookies", value),
            keys::COOKIES_FROM_BROWSER => push_valued(&mut args, "--cookies-from-browser", value),
            keys::POSTPROCESSORS => {
                for pp in value.as_array().into_iter().flatten() {
                    if pp["key"] == EXTRACT_AUDIO_PP {
                        args.push("-x".to_string());
                        if let Some(codec) = pp["preferredcodec"].as_str() {
                            args.push("--audio-format".to_string());
                            args.push(codec.to_string());
                        }
                        if let Some(quality) = scalar_arg(&pp["preferredquality"]) {
                            args.push("--audio-quality".to_string());
                            args.push(format!("{}K", quality));
                        }
                    } else {
                        tracing::warn!("Ignoring unsupported post-processor: {}", pp["key"]);
                    }
                }
            }
            keys::OVERWRITES => push_switch(
                &mut args,
                value,
                Some("--force-overwrites"),
                Some("--no-overwrites"),
            ),
            keys::CONTINUE_DL => {
                push_switch(&mut args, value, Some("--continue"), Some("--no-continue"))
            }
            keys::DOWNLOAD_ARCHIVE => push_valued(&mut args, "--download-archive", value),
            keys::NO_PLAYLIST => push_switch(
                &mut args,
                value,
                Some("--no-playlist"),
                Some("--yes-playlist"),
            ),
            keys::PLAYLIST_ITEMS => push_valued(&mut args, "-I", value),
            keys::PLAYLIST_START => push_valued(&mut args, "--playlist-start", value),
            keys::PLAYLIST_END => push_valued(&mut args, "--playlist-end", value),
            other => tracing::warn!("Ignoring unsupported engine option: {}", other),
        }
    }

    args
}

fn scalar_arg(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn push_valued(args: &mut Vec<String>, flag: &str, value: &Value) {
    if let Some(value) = scalar_arg(value) {
        args.push(flag.to_string());
        args.push(value);
    }
}

fn push_switch(args: &mut Vec<String>, value: &Value, on: Option<&str>, off: Option<&str>) {
    let flag = match value.as_bool() {
        Some(true) => on,
        Some(false) => off,
        None => None,
    };
    if let Some(flag) = flag {
        args.push(flag.to_string());
    }
}

fn progress_template() -> String {
    format!(
        "download:{}%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(info.id)s",
        PROGRESS_MARKER
    )
}

fn parse_field(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "NA" || raw == "None" {
        None
    } else {
        Some(raw)
    }
}

fn parse_bytes(raw: &str) -> Option<u64> {
    let value: f64 = parse_field(raw)?.parse().ok()?;
    (value.is_finite() && value >= 0.0).then(|| value as u64)
}

/// Parse a line produced by our progress template.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let rest = line.trim_start().strip_prefix(PROGRESS_MARKER)?;
    let fields: Vec<&str> = rest.split('|').collect();
    if fields.len() < 5 {
        return None;
    }

    let status: ProgressStatus = fields[0].parse().ok()?;

    Some(ProgressEvent {
        status,
        downloaded_bytes: parse_bytes(fields[1]),
        total_bytes: parse_bytes(fields[2]),
        total_bytes_estimate: parse_bytes(fields[3]),
        item_id: parse_field(fields[4]).map(str::to_string),
    })
}

fn archive_skip_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\[download\]\s+(?:(\S+):\s.*?)?has already been recorded in the archive")
            .expect("archive skip pattern is valid")
    })
}

/// Turn the engine's "already recorded in the archive" notice into an event.
pub fn parse_archive_skip(line: &str) -> Option<ProgressEvent> {
    let captures = archive_skip_pattern().captures(line.trim())?;
    let event = ProgressEvent::new(ProgressStatus::Skipped);
    Some(match captures.get(1) {
        Some(id) => event.for_item(id.as_str()),
        None => event,
    })
}

/// Parse one record written through [`PRINT_TEMPLATE`].
pub fn parse_printed_item(line: &str) -> Option<TransferredItem> {
    let mut parts = line.splitn(3, '\t');
    let id = parts.next()?.trim();
    let filepath = parts.next()?.trim();
    let title = parts.next().unwrap_or("").trim();

    if filepath.is_empty() {
        return None;
    }

    Some(TransferredItem {
        id: id.to_string(),
        title: title.to_string(),
        filepath: filepath.to_string(),
    })
}

/// Pick the most useful message out of the engine's stderr.
fn summarize_failure<'a>(lines: impl Iterator<Item = &'a str>, status: ExitStatus) -> String {
    let lines: Vec<&str> = lines.map(str::trim).filter(|l| !l.is_empty()).collect();

    if let Some(error) = lines.iter().rev().find(|l| l.starts_with("ERROR:")) {
        return error.trim_start_matches("ERROR:").trim().to_string();
    }

    lines
        .last()
        .map(|l| l.to_string())
        .unwrap_or_else(|| format!("yt-dlp exited with status: {}", status))
}
