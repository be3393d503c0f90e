//! Upload every loaded image for analysis.

use std::sync::Arc;

use pixdesk_net::{FilePart, MultipartRequest, Transport};
use serde_json::Value;

use super::Submitter;
use crate::config::ServerConfig;
use crate::constants::{server, text};
use crate::error::{Result, SubmissionError};
use crate::state::{ImageCollection, SubmissionState};

/// Submits the image collection to the analyze endpoint.
pub struct AnalyzePipeline {
    submitter: Submitter,
    path: String,
}

impl AnalyzePipeline {
    pub fn new(transport: Arc<dyn Transport>, server: &ServerConfig) -> Self {
        Self {
            submitter: Submitter::new("Analyze", transport, text::ANALYZE_FAILED),
            path: server.analyze_path.clone(),
        }
    }

    pub fn state(&self) -> &SubmissionState {
        self.submitter.state()
    }

    pub fn is_in_progress(&self) -> bool {
        self.submitter.is_busy()
    }

    /// Start uploading every image in `images`, in collection order.
    ///
    /// Fails with a validation error before any network activity when the
    /// collection is empty. Returns the number of image parts sent.
    pub fn submit(&mut self, images: &ImageCollection) -> Result<usize> {
        self.submitter.ensure_idle()?;

        let payload = images.payload()?;
        if payload.is_empty() {
            return Err(self.submitter.reject(text::NO_IMAGES));
        }

        let count = payload.len();
        let request = payload.into_iter().fold(
            MultipartRequest::new(self.path.as_str()),
            |request, (image, bytes)| {
                request.file(FilePart::new(
                    server::ANALYZE_FIELD,
                    image.id.as_str(),
                    image.mime,
                    bytes,
                ))
            },
        );

        self.submitter.start(request)?;
        Ok(count)
    }

    /// Apply pending progress. Once the request ends, returns the server
    /// payload verbatim or the failure.
    pub fn poll(&mut self) -> Option<std::result::Result<Value, SubmissionError>> {
        self.submitter
            .poll()
            .map(|outcome| outcome.map(|reply| reply.body))
    }

    pub fn cancel(&mut self) {
        self.submitter.cancel();
    }
}
