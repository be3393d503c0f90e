//! Background thread running one submission at a time.
//!
//! The owning event loop never blocks: it polls [`SubmissionWorker::take_event`]
//! once per tick and applies whatever progress or completion arrived.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::error::{NetError, Result};
use crate::progress::{AbortFlag, UploadProgress};
use crate::request::{MultipartRequest, ServerReply};
use crate::transport::Transport;

/// Event sent from the worker thread to its owner.
#[derive(Debug)]
pub enum WorkerEvent {
    /// Upload progress in percent, strictly increasing
    Progress(u8),
    /// Terminal event, sent exactly once
    Finished(Result<ServerReply>),
}

/// Handle to a submission running on its own thread.
pub struct SubmissionWorker {
    event_rx: Receiver<WorkerEvent>,
    abort: AbortFlag,
    thread_handle: Option<JoinHandle<()>>,
    finished: bool,
    cancelled: bool,
}

impl SubmissionWorker {
    /// Start submitting `request` through `transport`.
    pub fn spawn(transport: Arc<dyn Transport>, request: MultipartRequest) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel::<WorkerEvent>();
        let abort = AbortFlag::new();
        let thread_abort = abort.clone();

        let thread_handle = thread::Builder::new()
            .name("pixdesk-submit".to_string())
            .spawn(move || {
                log::debug!("Submission worker started for {}", request.path);
                let progress_tx = event_tx.clone();
                let progress = Arc::new(UploadProgress::new(
                    request.payload_len(),
                    thread_abort,
                    move |percent| {
                        // The owner may already be gone, nothing to report then
                        let _ = progress_tx.send(WorkerEvent::Progress(percent));
                    },
                ));

                let result = transport.submit(&request, progress);
                if event_tx.send(WorkerEvent::Finished(result)).is_err() {
                    log::debug!("Submission owner dropped before completion");
                }
                log::debug!("Submission worker exiting");
            })?;

        Ok(Self {
            event_rx,
            abort,
            thread_handle: Some(thread_handle),
            finished: false,
            cancelled: false,
        })
    }

    /// Take one pending event without blocking.
    pub fn take_event(&mut self) -> Option<WorkerEvent> {
        if self.finished {
            return None;
        }
        if self.cancelled {
            self.finished = true;
            return Some(WorkerEvent::Finished(Err(NetError::Cancelled)));
        }
        match self.event_rx.try_recv() {
            Ok(event) => {
                if matches!(event, WorkerEvent::Finished(_)) {
                    self.finished = true;
                    self.join();
                }
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Submission worker disconnected without a result");
                self.finished = true;
                self.join();
                Some(WorkerEvent::Finished(Err(NetError::WorkerLost)))
            }
        }
    }

    /// Stop the running submission.
    ///
    /// The thread is detached at once and the next [`take_event`] yields
    /// `Finished(Err(Cancelled))`, even if the transport is still waiting for
    /// the server. Whatever the thread reports afterwards is discarded.
    ///
    /// [`take_event`]: SubmissionWorker::take_event
    pub fn cancel(&mut self) {
        if self.finished || self.cancelled {
            return;
        }
        log::info!("Cancelling in-flight submission");
        self.abort.abort();
        self.cancelled = true;
        self.thread_handle.take();
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn join(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("Submission worker panicked: {:?}", e);
            }
        }
    }
}

impl Drop for SubmissionWorker {
    fn drop(&mut self) {
        if !self.finished {
            // Waiting for the server could block teardown, so the thread is
            // left to wind down on its own once the abort flag is seen.
            self.abort.abort();
            self.thread_handle.take();
            log::debug!("Submission worker detached on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct CannedTransport {
        status: u16,
        body: &'static str,
    }

    impl Transport for CannedTransport {
        fn submit(&self, request: &MultipartRequest, progress: Arc<UploadProgress>) -> Result<ServerReply> {
            for part in &request.files {
                progress.advance(part.len());
            }
            Ok(ServerReply::from_body(self.status, self.body))
        }
    }

    struct WaitForCancel;

    impl Transport for WaitForCancel {
        fn submit(&self, _request: &MultipartRequest, progress: Arc<UploadProgress>) -> Result<ServerReply> {
            let deadline = Instant::now() + Duration::from_secs(5);
            while Instant::now() < deadline {
                if progress.is_cancelled() {
                    return Err(NetError::Cancelled);
                }
                thread::sleep(Duration::from_millis(5));
            }
            Ok(ServerReply::from_body(200, "{}"))
        }
    }

    fn drain(worker: &mut SubmissionWorker) -> Vec<WorkerEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while !worker.is_finished() && Instant::now() < deadline {
            match worker.take_event() {
                Some(event) => events.push(event),
                None => thread::sleep(Duration::from_millis(2)),
            }
        }
        events
    }

    fn sample_request() -> MultipartRequest {
        MultipartRequest::new("/analyze").file(crate::FilePart::new(
            "images",
            "a.png",
            "image/png",
            Arc::from(vec![0u8; 64]),
        ))
    }

    #[test]
    fn test_worker_reports_progress_then_result() {
        let transport = Arc::new(CannedTransport {
            status: 200,
            body: r#"{"success": true}"#,
        });
        let mut worker = SubmissionWorker::spawn(transport, sample_request()).unwrap();
        let events = drain(&mut worker);

        assert!(matches!(events.first(), Some(WorkerEvent::Progress(100))));
        match events.last() {
            Some(WorkerEvent::Finished(Ok(reply))) => assert!(reply.success()),
            other => panic!("unexpected final event: {:?}", other),
        }
        assert!(worker.take_event().is_none());
    }

    /// Ignores the abort flag once the body is sent, like a server that is
    /// still working on its reply.
    struct SlowReply;

    impl Transport for SlowReply {
        fn submit(&self, request: &MultipartRequest, progress: Arc<UploadProgress>) -> Result<ServerReply> {
            for part in &request.files {
                progress.advance(part.len());
            }
            thread::sleep(Duration::from_millis(1500));
            Ok(ServerReply::from_body(200, r#"{"success": true}"#))
        }
    }

    #[test]
    fn test_cancel_after_body_sent_is_immediate() {
        let mut worker = SubmissionWorker::spawn(Arc::new(SlowReply), sample_request()).unwrap();
        thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        worker.cancel();
        let event = worker.take_event();

        assert!(started.elapsed() < Duration::from_millis(500));
        match event {
            Some(WorkerEvent::Finished(Err(e))) => assert!(e.is_cancelled()),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(worker.is_finished());
        assert!(worker.take_event().is_none());
    }

    #[test]
    fn test_cancel_after_finish_keeps_result() {
        let transport = Arc::new(CannedTransport {
            status: 200,
            body: r#"{"success": true}"#,
        });
        let mut worker = SubmissionWorker::spawn(transport, sample_request()).unwrap();
        let events = drain(&mut worker);
        worker.cancel();

        assert!(matches!(events.last(), Some(WorkerEvent::Finished(Ok(_)))));
        assert!(worker.take_event().is_none());
    }

    #[test]
    fn test_cancel_delivers_cancelled() {
        let mut worker = SubmissionWorker::spawn(Arc::new(WaitForCancel), sample_request()).unwrap();
        worker.cancel();
        let events = drain(&mut worker);

        match events.last() {
            Some(WorkerEvent::Finished(Err(e))) => assert!(e.is_cancelled()),
            other => panic!("unexpected final event: {:?}", other),
        }
    }
}
