//! Core data models for the downloader.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Requested output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Mp3,
    Mp4,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Mp3 => "MP3",
            MediaKind::Mp4 => "MP4",
        }
    }
}

impl Default for MediaKind {
    fn default() -> Self {
        MediaKind::Mp3
    }
}

/// MP3 target bitrate in kbps. Ignored for video output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioBitrate {
    #[serde(rename = "128")]
    Kbps128,
    #[serde(rename = "192")]
    Kbps192,
    #[serde(rename = "256")]
    Kbps256,
    #[serde(rename = "320")]
    Kbps320,
}

impl AudioBitrate {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioBitrate::Kbps128 => "128",
            AudioBitrate::Kbps192 => "192",
            AudioBitrate::Kbps256 => "256",
            AudioBitrate::Kbps320 => "320",
        }
    }
}

impl Default for AudioBitrate {
    // 192 kbps works on the widest range of car players.
    fn default() -> Self {
        AudioBitrate::Kbps192
    }
}

/// YouTube player client passed through to the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerClient {
    Android,
    Web,
    Ios,
    Tv,
}

impl PlayerClient {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerClient::Android => "android",
            PlayerClient::Web => "web",
            PlayerClient::Ios => "ios",
            PlayerClient::Tv => "tv",
        }
    }
}

impl Default for PlayerClient {
    fn default() -> Self {
        PlayerClient::Android
    }
}

/// Browser whose cookie store the engine may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookieBrowser {
    Chrome,
    Edge,
    Firefox,
    Brave,
}

impl CookieBrowser {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookieBrowser::Chrome => "chrome",
            CookieBrowser::Edge => "edge",
            CookieBrowser::Firefox => "firefox",
            CookieBrowser::Brave => "brave",
        }
    }
}

/// One user-requested download. Immutable once dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub id: Uuid,
    pub url: String,
    pub destination: PathBuf,
    pub kind: MediaKind,
    pub bitrate: AudioBitrate,
    pub client: PlayerClient,
    pub cookies: Option<CookieBrowser>,
    pub user_agent: Option<String>,
    pub verbose: bool,
}

impl JobRequest {
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            destination: destination.into(),
            kind: MediaKind::default(),
            bitrate: AudioBitrate::default(),
            client: PlayerClient::default(),
            cookies: None,
            user_agent: None,
            verbose: false,
        }
    }

    /// Clone this request as a prototype for another URL, with a fresh id.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            ..self.clone()
        }
    }
}

/// A single UI-bound progress tick. Last value wins on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 0.0 ..= 100.0
    pub percent: f32,
    /// Transfer rate as reported by the engine, e.g. "1.23MiB/s".
    pub speed: String,
    pub eta_seconds: u64,
    pub title: String,
}

/// Terminal notification for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub message: String,
    pub succeeded: bool,
}

/// Position of the current item within a batch run (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPosition {
    pub index: usize,
    pub total: usize,
}

/// Everything the worker thread relays back to the interactive side.
///
/// A single mpsc channel carries these in FIFO order, so per-job event
/// ordering is preserved without any locking. The forwarder turns each
/// variant into its own webview event, so the enum itself never crosses
/// the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Log(String),
    Progress {
        event: ProgressEvent,
        batch: Option<BatchPosition>,
    },
    Completed {
        event: CompletionEvent,
        batch: Option<BatchPosition>,
    },
    BatchFinished {
        total: usize,
    },
}

/// Application error types.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine error: {0}")]
    Engine(String),
}

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;
