//! Core business logic module
//!
//! Toolkit-independent downloader internals: job models, the yt-dlp engine,
//! the dispatcher that runs jobs on worker threads, and the event plumbing
//! back to the interactive side.

pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod ffmpeg;
pub mod links_file;
pub mod models;
pub mod progress;
pub mod session;


// Re-export commonly used types
pub use config::AppConfig;
pub use models::{AppError, AppResult, JobRequest, UiEvent};
pub use session::Session;
