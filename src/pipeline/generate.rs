//! Dataset generation from one source image.

use std::sync::Arc;

use pixdesk_net::{FilePart, MultipartRequest, Transport};

use super::Submitter;
use crate::config::{GenerateConfig, ServerConfig};
use crate::constants::{server, text};
use crate::error::{ErrorInfo, Result};
use crate::resource::ImageData;
use crate::state::SubmissionState;

/// Final result of a generate request.
///
/// Failures are reported for display only; they are not errors for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Server accepted the request; carries the message to show
    Succeeded(String),
    Failed(ErrorInfo),
}

/// Submits a source image plus an image count to the generate endpoint.
pub struct GeneratePipeline {
    submitter: Submitter,
    path: String,
    limits: GenerateConfig,
}

impl GeneratePipeline {
    pub fn new(transport: Arc<dyn Transport>, server: &ServerConfig, limits: GenerateConfig) -> Self {
        Self {
            submitter: Submitter::new("Generate", transport, text::GENERATE_FAILED),
            path: server.generate_path.clone(),
            limits,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        self.submitter.state()
    }

    pub fn is_in_progress(&self) -> bool {
        self.submitter.is_busy()
    }

    /// Start a generate request.
    ///
    /// The source must be present and `count` must lie within the configured
    /// bounds; out-of-range counts are rejected, never clamped.
    pub fn submit(&mut self, source: Option<&ImageData>, count: u32) -> Result<()> {
        self.submitter.ensure_idle()?;

        let Some(source) = source else {
            return Err(self.submitter.reject(text::NO_SOURCE_IMAGE));
        };
        if !self.limits.accepts(count) {
            log::warn!(
                "Generate count {} outside {}..={}",
                count,
                self.limits.min_count,
                self.limits.max_count
            );
            let message = text::count_out_of_range(self.limits.min_count, self.limits.max_count);
            return Err(self.submitter.reject(message));
        }

        let request = MultipartRequest::new(self.path.as_str())
            .file(FilePart::new(
                server::GENERATE_FILE_FIELD,
                source.name.as_str(),
                source.mime_type(),
                Arc::clone(&source.bytes),
            ))
            .text(server::GENERATE_COUNT_FIELD, count.to_string());

        self.submitter.start(request)
    }

    /// Apply pending progress and report the outcome once the request ends.
    pub fn poll(&mut self) -> Option<GenerateOutcome> {
        let outcome = self.submitter.poll()?;
        Some(match outcome {
            Ok(reply) => GenerateOutcome::Succeeded(
                reply.message().unwrap_or(text::GENERATE_DONE).to_string(),
            ),
            Err(e) => GenerateOutcome::Failed(e.info().clone()),
        })
    }

    pub fn cancel(&mut self) {
        self.submitter.cancel();
    }
}
