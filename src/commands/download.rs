//! Download management commands

use serde::Deserialize;
use tauri::{command, State};

use crate::core::links_file;
use crate::core::models::{
    AudioBitrate, CookieBrowser, JobRequest, MediaKind, PlayerClient,
};
use crate::AppState;

/// Form payload shared by single and batch downloads.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub url: String,
    pub destination: String,
    #[serde(default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub bitrate: AudioBitrate,
    #[serde(default)]
    pub client: PlayerClient,
    #[serde(default)]
    pub cookies: Option<CookieBrowser>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub verbose: bool,
}

impl DownloadRequest {
    fn into_job(self) -> JobRequest {
        let mut job = JobRequest::new(self.url, self.destination);
        job.kind = self.kind;
        job.bitrate = self.bitrate;
        job.client = self.client;
        job.cookies = self.cookies;
        job.user_agent = self.user_agent.filter(|ua| !ua.trim().is_empty());
        job.verbose = self.verbose;
        job
    }
}

/// Start a single download. Returns the job id.
#[command]
pub async fn start_download(
    request: DownloadRequest,
    state: State<'_, AppState>,
) -> Result<String, String> {
    let job = request.into_job();
    let id = job.id;
    state.session.start_download(job).map_err(|e| e.to_string())?;
    Ok(id.to_string())
}

/// Start one download per URL in a links file. Returns the item count.
#[command]
pub async fn start_batch_download(
    links_path: String,
    request: DownloadRequest,
    state: State<'_, AppState>,
) -> Result<usize, String> {
    let prototype = request.into_job();
    state
        .session
        .start_batch(prototype, links_path.as_ref())
        .map_err(|e| e.to_string())
}

/// Parse a links file without downloading anything.
#[command]
pub async fn preview_links(links_path: String) -> Result<Vec<String>, String> {
    links_file::read_links(links_path.as_ref()).map_err(|e| e.to_string())
}
