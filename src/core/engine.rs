//! Media engine: the yt-dlp subprocess backend.
//!
//! All extraction, downloading and transcoding work is delegated to the
//! external `yt-dlp` binary (which in turn drives ffmpeg). The engine builds
//! the argument vector from a [`JobRequest`], spawns the process with
//! `--newline` so progress arrives one line at a time, and streams stdout
//! lines to the caller. Retry behavior lives entirely in the flags passed to
//! yt-dlp; nothing here retries on its own.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};
use url::Url;

use crate::core::config::DownloadTuning;
use crate::core::ffmpeg;
use crate::core::models::{AppError, AppResult, JobRequest, MediaKind};

/// Default browser User-Agent sent when the user leaves the field empty.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Name of the download-archive file kept in the destination directory.
pub const ARCHIVE_FILE: &str = ".downloaded.txt";

/// Seam between the dispatcher and the external downloader.
///
/// `on_line` receives every stdout line as it is produced, on the calling
/// thread. Tests substitute a scripted implementation here.
pub trait MediaEngine: Send + Sync {
    /// Whether audio extraction can work (a transcoding binary resolved).
    fn supports_audio_extraction(&self) -> bool;

    /// Run one download to completion, streaming output lines.
    fn download(&self, job: &JobRequest, on_line: &mut dyn FnMut(&str)) -> AppResult<()>;
}

/// `MediaEngine` implementation backed by the yt-dlp executable.
pub struct YtDlpEngine {
    binary: PathBuf,
    ffmpeg: Option<PathBuf>,
    tuning: DownloadTuning,
}

impl YtDlpEngine {
    pub fn new(tuning: DownloadTuning) -> Self {
        let binary = if cfg!(windows) { "yt-dlp.exe" } else { "yt-dlp" };
        Self {
            binary: PathBuf::from(binary),
            ffmpeg: ffmpeg::locate_ffmpeg(),
            tuning,
        }
    }

    /// Override the yt-dlp binary path (tests, portable installs).
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Override the resolved ffmpeg path.
    pub fn with_ffmpeg(mut self, ffmpeg: Option<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg;
        self
    }

    pub fn ffmpeg_path(&self) -> Option<&Path> {
        self.ffmpeg.as_deref()
    }

    /// Build the full argument vector for one job.
    pub fn build_args(&self, job: &JobRequest) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();

        // Progress must arrive line-by-line for the parser.
        args.push("--newline".into());

        args.push("--no-overwrites".into());
        args.push("--ignore-errors".into());
        args.push("--restrict-filenames".into());
        args.push("--windows-filenames".into());
        args.push("--embed-metadata".into());

        args.push("--download-archive".into());
        args.push(job.destination.join(ARCHIVE_FILE).to_string_lossy().into_owned());

        args.push("--retries".into());
        args.push(self.tuning.retries.to_string());
        args.push("--fragment-retries".into());
        args.push(self.tuning.fragment_retries.to_string());
        // One fragment at a time avoids 403s on some HLS CDNs.
        args.push("--concurrent-fragments".into());
        args.push(self.tuning.concurrent_fragments.to_string());
        args.push("--http-chunk-size".into());
        args.push(self.tuning.http_chunk_size.clone());

        args.push("--extractor-args".into());
        args.push(format!("youtube:player_client={}", job.client.as_str()));

        args.push("--user-agent".into());
        args.push(
            job.user_agent
                .as_deref()
                .map(str::trim)
                .filter(|ua| !ua.is_empty())
                .unwrap_or(DEFAULT_USER_AGENT)
                .to_string(),
        );
        args.push("--add-header".into());
        args.push("Accept-Language:en-US,en;q=0.9".into());

        if let Some(browser) = job.cookies {
            args.push("--cookies-from-browser".into());
            args.push(browser.as_str().into());
        }

        if let Some(ffmpeg) = &self.ffmpeg {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.to_string_lossy().into_owned());
        }

        if job.verbose {
            args.push("--verbose".into());
        }

        match job.kind {
            MediaKind::Mp3 => {
                args.push("--format".into());
                args.push("bestaudio/best".into());
                args.push("--extract-audio".into());
                args.push("--audio-format".into());
                args.push("mp3".into());
                args.push("--audio-quality".into());
                args.push(job.bitrate.as_str().into());
                args.push("--embed-thumbnail".into());
                args.push("--postprocessor-args".into());
                args.push("ffmpeg:-id3v2_version 3 -write_id3v1 1".into());
            }
            MediaKind::Mp4 => {
                args.push("--format".into());
                args.push("bestvideo[ext=mp4]+bestaudio[ext=m4a]/bestvideo+bestaudio/best[ext=mp4]/best".into());
                args.push("--merge-output-format".into());
                args.push("mp4".into());
                args.push("--remux-video".into());
                args.push("mp4".into());
            }
        }

        args.push("--output".into());
        args.push(output_template(&job.destination, &job.url));

        args.push(job.url.clone());
        args
    }
}

impl MediaEngine for YtDlpEngine {
    fn supports_audio_extraction(&self) -> bool {
        self.ffmpeg.is_some()
    }

    fn download(&self, job: &JobRequest, on_line: &mut dyn FnMut(&str)) -> AppResult<()> {
        std::fs::create_dir_all(&job.destination)?;

        let args = self.build_args(job);
        debug!("Launching {} with {} args", self.binary.display(), args.len());

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                AppError::Engine(format!("failed to launch {}: {}", self.binary.display(), e))
            })?;

        // Drain stderr on its own thread so neither pipe can fill and stall
        // the child. Only the tail is kept for the error message.
        let stderr = child.stderr.take();
        let stderr_tail = std::thread::spawn(move || {
            let mut tail: Vec<String> = Vec::new();
            if let Some(stderr) = stderr {
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    if tail.len() >= 20 {
                        tail.remove(0);
                    }
                    tail.push(line);
                }
            }
            tail.join("\n")
        });

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                match line {
                    Ok(line) => on_line(&line),
                    Err(e) => {
                        warn!("Stopped reading engine output: {}", e);
                        break;
                    }
                }
            }
        }

        let status = child.wait()?;
        let tail = stderr_tail.join().unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            let detail = if tail.is_empty() {
                String::new()
            } else {
                format!(": {}", tail)
            };
            Err(AppError::Engine(format!("yt-dlp exited with {}{}", status, detail)))
        }
    }
}

/// Output template for one job.
///
/// Playlist URLs get a per-playlist subdirectory so batches of playlists do
/// not interleave their files.
pub fn output_template(destination: &Path, url: &str) -> String {
    let template = if is_playlist_url(url) {
        destination.join("%(playlist_title)s").join("%(title)s.%(ext)s")
    } else {
        destination.join("%(title)s.%(ext)s")
    };
    template.to_string_lossy().into_owned()
}

/// Heuristic playlist detection: a `list=` query parameter or a `/playlist`
/// path segment.
pub fn is_playlist_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            parsed.query_pairs().any(|(key, _)| key == "list")
                || parsed
                    .path_segments()
                    .map(|mut segments| segments.any(|s| s == "playlist"))
                    .unwrap_or(false)
        }
        // Not parseable as an absolute URL; fall back to substring checks so
        // the template choice stays deterministic for whatever yt-dlp may
        // still accept.
        Err(_) => url.contains("list=") || url.contains("/playlist"),
    }
}
