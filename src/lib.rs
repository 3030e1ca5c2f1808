//! Tunegrab - Core Library
//!
//! YouTube to MP3/MP4 downloader built on the external yt-dlp and ffmpeg
//! binaries. The core modules are toolkit-independent; this crate root wires
//! them into the Tauri shell.

pub mod commands;
pub mod core;
pub mod release;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    config::AppConfig,
    engine::{MediaEngine, YtDlpEngine},
    models::{AppError, AppResult, JobRequest, UiEvent},
    session::Session,
};

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use tauri::Manager;
use tracing::{error, info, warn};

use commands::config::{get_config, reset_config, save_config};
use commands::download::{preview_links, start_batch_download, start_download};
use commands::system::{app_version, ffmpeg_status};

/// Application state shared between Tauri commands
pub struct AppState {
    pub session: Session,
    pub engine: Arc<YtDlpEngine>,
    pub config: Arc<tokio::sync::RwLock<AppConfig>>,
    // Taken once by the setup hook to start the event forwarder.
    events: Mutex<Option<Receiver<UiEvent>>>,
}

impl AppState {
    pub fn new() -> Self {
        let config = Self::load_or_initialize_config();

        let engine = Arc::new(YtDlpEngine::new(config.tuning.clone()));
        if !engine.supports_audio_extraction() {
            warn!("ffmpeg not found; MP3 conversion will be unavailable");
        }

        let (tx, rx): (Sender<UiEvent>, Receiver<UiEvent>) = std::sync::mpsc::channel();
        let session = Session::new(engine.clone(), tx);

        Self {
            session,
            engine,
            config: Arc::new(tokio::sync::RwLock::new(config)),
            events: Mutex::new(Some(rx)),
        }
    }

    fn load_or_initialize_config() -> AppConfig {
        match AppConfig::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load configuration ({}), using defaults", e);
                AppConfig::default()
            }
        }
    }

    fn take_event_receiver(&self) -> Option<Receiver<UiEvent>> {
        self.events.lock().ok()?.take()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain worker events on a dedicated thread and relay them to the webview.
///
/// One thread, one channel: events reach the frontend in the order the
/// workers produced them.
fn spawn_event_forwarder(app_handle: tauri::AppHandle, events: Receiver<UiEvent>) {
    std::thread::Builder::new()
        .name("ui-event-forwarder".to_string())
        .spawn(move || {
            for event in events {
                let result = match &event {
                    UiEvent::Log(line) => app_handle.emit_all("download_log", line),
                    UiEvent::Progress { event, batch } => app_handle.emit_all(
                        "download_progress",
                        serde_json::json!({ "event": event, "batch": batch }),
                    ),
                    UiEvent::Completed { event, batch } => app_handle.emit_all(
                        "download_complete",
                        serde_json::json!({ "event": event, "batch": batch }),
                    ),
                    UiEvent::BatchFinished { total } => {
                        app_handle.emit_all("batch_finished", serde_json::json!({ "total": total }))
                    }
                };
                if let Err(e) = result {
                    error!("Failed to emit UI event: {}", e);
                }
            }
            info!("Event channel closed, forwarder exiting");
        })
        .ok();
}

pub fn run() {
    utils::logging::init_tracing();
    info!("Starting Tunegrab v{}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .manage(AppState::new())
        .invoke_handler(tauri::generate_handler![
            // Download commands
            start_download,
            start_batch_download,
            preview_links,
            // Configuration commands
            get_config,
            save_config,
            reset_config,
            // System commands
            ffmpeg_status,
            app_version,
        ])
        .setup(|app| {
            let state: tauri::State<AppState> = app.state();
            match state.take_event_receiver() {
                Some(events) => spawn_event_forwarder(app.handle(), events),
                None => error!("Event receiver already taken; UI updates disabled"),
            }
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.config.try_read().is_ok());
        assert!(state.take_event_receiver().is_some());
        // The receiver can only be taken once.
        assert!(state.take_event_receiver().is_none());
    }
}
