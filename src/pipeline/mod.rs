//! Analysis and dataset-generation submissions.
//!
//! Both pipelines follow the same pattern: collect owned payload bytes, hand a
//! multipart request to a [`SubmissionWorker`], fold its progress events into
//! a [`SubmissionState`] on every poll and map the final reply to either the
//! server payload or a [`SubmissionError`]. Only one request per pipeline may
//! be in flight.

mod analyze;
mod generate;

pub use analyze::AnalyzePipeline;
pub use generate::{GenerateOutcome, GeneratePipeline};

use std::sync::Arc;

use pixdesk_net::{MultipartRequest, ServerReply, SubmissionWorker, Transport, WorkerEvent};

use crate::error::{ErrorInfo, Result, SubmissionError, WorkspaceError};
use crate::state::SubmissionState;

/// Worker management shared by the analyze and generate pipelines.
struct Submitter {
    name: &'static str,
    transport: Arc<dyn Transport>,
    worker: Option<SubmissionWorker>,
    state: SubmissionState,
    fallback: &'static str,
}

impl Submitter {
    fn new(name: &'static str, transport: Arc<dyn Transport>, fallback: &'static str) -> Self {
        Self {
            name,
            transport,
            worker: None,
            state: SubmissionState::new(),
            fallback,
        }
    }

    fn state(&self) -> &SubmissionState {
        &self.state
    }

    fn is_busy(&self) -> bool {
        self.worker.is_some()
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_busy() {
            log::warn!("{} submission already in flight", self.name);
            return Err(WorkspaceError::Busy);
        }
        Ok(())
    }

    /// Record a precondition failure without ever entering the in-flight state.
    fn reject(&mut self, message: impl Into<String>) -> WorkspaceError {
        let error = WorkspaceError::validation(message);
        log::debug!("{} rejected: {}", self.name, error);
        self.state.finish(Some(error.info()));
        error
    }

    fn start(&mut self, request: MultipartRequest) -> Result<()> {
        self.ensure_idle()?;
        self.state.begin();
        log::info!(
            "📤 Starting {} submission ({} bytes)",
            self.name,
            request.payload_len()
        );

        match SubmissionWorker::spawn(Arc::clone(&self.transport), request) {
            Ok(worker) => {
                self.worker = Some(worker);
                Ok(())
            }
            Err(e) => {
                let error = SubmissionError::transport(e, self.fallback);
                log::error!("{} submission could not start: {}", self.name, error);
                self.state.finish(Some(error.info().clone()));
                Err(error.into())
            }
        }
    }

    /// Apply pending worker events. Returns the outcome once the request ends.
    fn poll(&mut self) -> Option<std::result::Result<ServerReply, SubmissionError>> {
        let mut finished = None;
        if let Some(worker) = self.worker.as_mut() {
            while let Some(event) = worker.take_event() {
                match event {
                    WorkerEvent::Progress(percent) => self.state.set_progress(percent),
                    WorkerEvent::Finished(result) => {
                        finished = Some(result);
                        break;
                    }
                }
            }
        }

        let result = finished?;
        self.worker = None;

        let outcome = match result {
            Ok(reply) if reply.success() => Ok(reply),
            Ok(reply) => Err(SubmissionError::ServerReported {
                info: ErrorInfo::from_server(reply.message(), self.fallback),
                status: reply.status,
            }),
            Err(e) => Err(SubmissionError::transport(e, self.fallback)),
        };

        match &outcome {
            Ok(reply) => log::info!("✅ {} succeeded (status {})", self.name, reply.status),
            Err(e) if e.is_cancelled() => log::info!("{} cancelled", self.name),
            Err(e) => log::error!("{} failed: {}", self.name, e),
        }
        self.state.finish(outcome.as_ref().err().map(|e| e.info().clone()));
        Some(outcome)
    }

    /// Abort the in-flight request. The next poll reports it as cancelled.
    fn cancel(&mut self) {
        if let Some(worker) = self.worker.as_mut() {
            worker.cancel();
        }
    }
}
