//! System status commands

use serde::Serialize;
use tauri::{command, State};

use crate::core::engine::MediaEngine;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct FfmpegStatus {
    pub available: bool,
    pub path: Option<String>,
}

/// Report whether ffmpeg resolved at startup, so the UI can warn before the
/// user picks MP3.
#[command]
pub async fn ffmpeg_status(state: State<'_, AppState>) -> Result<FfmpegStatus, String> {
    Ok(FfmpegStatus {
        available: state.engine.supports_audio_extraction(),
        path: state
            .engine
            .ffmpeg_path()
            .map(|p| p.to_string_lossy().into_owned()),
    })
}

/// Application version, shown in the window footer.
#[command]
pub fn app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
