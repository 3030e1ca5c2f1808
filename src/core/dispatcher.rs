//! Job dispatch.
//!
//! Each user action (one URL, or one batch from a links file) runs on its own
//! worker thread. The worker never touches the UI directly: everything it has
//! to say goes through one mpsc [`UiEvent`] channel, and the interactive side
//! drains that channel in order. Batches run their items sequentially on the
//! same worker; an item failure is reported and the batch moves on.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use tracing::{error, info};

use crate::core::engine::MediaEngine;
use crate::core::models::{
    BatchPosition, CompletionEvent, JobRequest, MediaKind, UiEvent,
};
use crate::core::progress;

/// Hands jobs to worker threads and owns the UI-bound event sender.
#[derive(Clone)]
pub struct JobDispatcher {
    engine: Arc<dyn MediaEngine>,
    events: Sender<UiEvent>,
}

impl JobDispatcher {
    pub fn new(engine: Arc<dyn MediaEngine>, events: Sender<UiEvent>) -> Self {
        Self { engine, events }
    }

    /// Run a single job on a fresh worker thread.
    pub fn dispatch(&self, job: JobRequest) {
        let dispatcher = self.clone();
        thread::Builder::new()
            .name(format!("download-{}", job.id))
            .spawn(move || {
                dispatcher.run_job(&job, None);
            })
            .ok();
    }

    /// Run one job per URL, sequentially, on a single worker thread.
    ///
    /// `prototype` supplies every option except the URL. A `BatchFinished`
    /// event is emitted after the last item regardless of failures.
    pub fn dispatch_batch(&self, prototype: JobRequest, urls: Vec<String>) {
        let dispatcher = self.clone();
        thread::Builder::new()
            .name("download-batch".to_string())
            .spawn(move || {
                let total = urls.len();
                for (i, url) in urls.into_iter().enumerate() {
                    let job = prototype.with_url(url);
                    let position = BatchPosition { index: i + 1, total };
                    dispatcher.run_job(&job, Some(position));
                }
                dispatcher.send(UiEvent::BatchFinished { total });
            })
            .ok();
    }

    fn run_job(&self, job: &JobRequest, batch: Option<BatchPosition>) {
        let started = chrono::Local::now();
        let banner = match batch {
            Some(pos) => format!(
                "[{}] ({}/{}) Starting {} download: {}",
                started.format("%H:%M:%S"),
                pos.index,
                pos.total,
                job.kind.label(),
                job.url
            ),
            None => format!(
                "[{}] Starting {} download: {}",
                started.format("%H:%M:%S"),
                job.kind.label(),
                job.url
            ),
        };
        info!("{}", banner);
        self.send(UiEvent::Log(banner));

        if job.kind == MediaKind::Mp3 && !self.engine.supports_audio_extraction() {
            let message =
                "FFmpeg not found. MP3 conversion requires ffmpeg on PATH or next to the app."
                    .to_string();
            error!("{}", message);
            self.send(UiEvent::Log(message.clone()));
            self.send(UiEvent::Completed {
                event: CompletionEvent { message, succeeded: false },
                batch,
            });
            return;
        }

        let mut title = String::new();
        let events = self.events.clone();
        let verbose = job.verbose;
        let result = self.engine.download(job, &mut |line| {
            if let Some(found) = progress::destination_title(line) {
                title = found;
            }
            if let Some(event) = progress::parse_line(line, &title) {
                let _ = events.send(UiEvent::Progress { event, batch });
            } else if verbose || !progress::is_progress_line(line) {
                let _ = events.send(UiEvent::Log(line.to_string()));
            }
        });

        let completion = match result {
            Ok(()) => {
                let what = if title.is_empty() { job.url.clone() } else { title.clone() };
                CompletionEvent {
                    message: format!("Finished: {}", what),
                    succeeded: true,
                }
            }
            Err(e) => {
                error!("Download failed for {}: {}", job.url, e);
                CompletionEvent {
                    message: format!("Download failed: {}", e),
                    succeeded: false,
                }
            }
        };

        self.send(UiEvent::Log(completion.message.clone()));
        self.send(UiEvent::Completed { event: completion, batch });
    }

    // Receiver gone means the UI shut down; drop the event.
    fn send(&self, event: UiEvent) {
        let _ = self.events.send(event);
    }
}
