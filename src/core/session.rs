//! Interactive session state.
//!
//! One [`Session`] lives for the whole application run. It owns the
//! dispatcher and performs the precondition checks that must fail before any
//! worker thread starts: URL shape, destination presence, links-file
//! readability. Nothing here blocks; dispatched work reports back through
//! the shared event channel.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use tracing::info;

use crate::core::dispatcher::JobDispatcher;
use crate::core::engine::MediaEngine;
use crate::core::links_file;
use crate::core::models::{AppError, AppResult, JobRequest, UiEvent};
use crate::utils::validation;

pub struct Session {
    dispatcher: JobDispatcher,
}

impl Session {
    pub fn new(engine: Arc<dyn MediaEngine>, events: Sender<UiEvent>) -> Self {
        Self {
            dispatcher: JobDispatcher::new(engine, events),
        }
    }

    /// Validate and start a single download.
    pub fn start_download(&self, job: JobRequest) -> AppResult<()> {
        Self::check_job(&job)?;
        info!("Dispatching single {} job {}", job.kind.label(), job.id);
        self.dispatcher.dispatch(job);
        Ok(())
    }

    /// Validate a links file and start one job per usable line.
    ///
    /// Returns the number of dispatched items.
    pub fn start_batch(&self, prototype: JobRequest, links_path: &Path) -> AppResult<usize> {
        Self::check_destination(&prototype)?;

        let urls = links_file::read_links(links_path)?;
        if urls.is_empty() {
            return Err(AppError::Precondition(format!(
                "links file {} contains no URLs",
                links_path.display()
            )));
        }

        let total = urls.len();
        info!("Dispatching batch of {} from {}", total, links_path.display());
        self.dispatcher.dispatch_batch(prototype, urls);
        Ok(total)
    }

    fn check_job(job: &JobRequest) -> AppResult<()> {
        validation::validate_url(&job.url)?;
        Self::check_destination(job)
    }

    fn check_destination(job: &JobRequest) -> AppResult<()> {
        if job.destination.as_os_str().is_empty() {
            return Err(AppError::Precondition(
                "no destination folder selected".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    struct CountingEngine {
        calls: AtomicUsize,
    }

    impl MediaEngine for CountingEngine {
        fn supports_audio_extraction(&self) -> bool {
            true
        }

        fn download(&self, _job: &JobRequest, _on_line: &mut dyn FnMut(&str)) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn session() -> (Session, Arc<CountingEngine>, mpsc::Receiver<UiEvent>) {
        let engine = Arc::new(CountingEngine { calls: AtomicUsize::new(0) });
        let (tx, rx) = mpsc::channel();
        (Session::new(engine.clone(), tx), engine, rx)
    }

    #[test]
    fn test_empty_url_rejected_before_dispatch() {
        let (session, engine, _rx) = session();
        let job = JobRequest::new("", "/music");
        assert!(matches!(
            session.start_download(job),
            Err(AppError::Precondition(_))
        ));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_destination_rejected() {
        let (session, engine, _rx) = session();
        let job = JobRequest::new("https://youtu.be/abc", "");
        assert!(matches!(
            session.start_download(job),
            Err(AppError::Precondition(_))
        ));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_links_file_rejected() {
        let (session, engine, _rx) = session();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# only comments here").unwrap();

        let prototype = JobRequest::new("", "/music");
        assert!(matches!(
            session.start_batch(prototype, file.path()),
            Err(AppError::Precondition(_))
        ));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_batch_reports_item_count() {
        let (session, _engine, rx) = session();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "https://youtu.be/one").unwrap();
        writeln!(file, "https://youtu.be/two").unwrap();

        let prototype = JobRequest::new("", "/music");
        let total = session.start_batch(prototype, file.path()).unwrap();
        assert_eq!(total, 2);

        // Wait for the worker to finish so the channel has every event.
        let finished = rx
            .iter()
            .find(|e| matches!(e, UiEvent::BatchFinished { .. }));
        assert_eq!(finished, Some(UiEvent::BatchFinished { total: 2 }));
    }
}
