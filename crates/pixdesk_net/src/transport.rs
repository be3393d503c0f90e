//! Transport seam between the submission pipeline and the network.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};

use crate::error::{NetError, Result};
use crate::progress::{ProgressReader, UploadProgress};
use crate::request::{MultipartRequest, ServerReply};

/// Something that can deliver a multipart request and return the reply.
///
/// Implementations run on the submission worker thread. They must report
/// streamed bytes through `progress` and give up once it is cancelled.
pub trait Transport: Send + Sync {
    fn submit(&self, request: &MultipartRequest, progress: Arc<UploadProgress>) -> Result<ServerReply>;
}

/// Blocking HTTP transport built on reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpTransport {
    /// Create a transport for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| NetError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("pixdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url,
            timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> Result<reqwest::Url> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        reqwest::Url::parse(&joined).map_err(|e| NetError::InvalidUrl(format!("{joined}: {e}")))
    }

    fn build_form(request: &MultipartRequest, progress: &Arc<UploadProgress>) -> Result<Form> {
        let mut form = Form::new();
        for part in &request.files {
            let reader = ProgressReader::new(Arc::clone(&part.bytes), Arc::clone(progress));
            let body = Part::reader_with_length(reader, part.len())
                .file_name(part.file_name.clone())
                .mime_str(&part.mime)?;
            form = form.part(part.field.clone(), body);
        }
        for (name, value) in &request.fields {
            form = form.text(name.clone(), value.clone());
        }
        Ok(form)
    }

    fn map_error(&self, error: reqwest::Error, progress: &UploadProgress) -> NetError {
        if progress.is_cancelled() {
            NetError::Cancelled
        } else if error.is_timeout() {
            NetError::Timeout(self.timeout_ms)
        } else {
            NetError::Request(error)
        }
    }
}

impl Transport for HttpTransport {
    fn submit(&self, request: &MultipartRequest, progress: Arc<UploadProgress>) -> Result<ServerReply> {
        if progress.is_cancelled() {
            return Err(NetError::Cancelled);
        }

        let url = self.endpoint(&request.path)?;
        let form = Self::build_form(request, &progress)?;
        log::info!(
            "POST {} ({} parts, {} bytes)",
            url,
            request.files.len() + request.fields.len(),
            request.payload_len()
        );

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .map_err(|e| self.map_error(e, &progress))?;

        let status = response.status().as_u16();
        let text = response.text().map_err(|e| self.map_error(e, &progress))?;
        log::debug!("Server replied with status {} ({} bytes)", status, text.len());

        Ok(ServerReply::from_body(status, &text))
    }
}
