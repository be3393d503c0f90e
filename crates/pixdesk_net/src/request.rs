//! Multipart request description and server replies.

use std::sync::Arc;

use serde_json::Value;

/// One binary part of a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name (e.g. `images` or `file`)
    pub field: String,
    /// File name reported to the server
    pub file_name: String,
    /// MIME type of the payload
    pub mime: String,
    /// Shared, immutable payload bytes
    pub bytes: Arc<[u8]>,
}

impl FilePart {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Arc<[u8]>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A multipart POST against a path relative to the server base URL.
#[derive(Debug, Clone, Default)]
pub struct MultipartRequest {
    /// Endpoint path, e.g. `/analyze`
    pub path: String,
    /// Binary parts in submission order
    pub files: Vec<FilePart>,
    /// Plain text fields
    pub fields: Vec<(String, String)>,
}

impl MultipartRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Append a binary part.
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Total number of payload bytes that drive progress reporting.
    pub fn payload_len(&self) -> u64 {
        self.files.iter().map(FilePart::len).sum()
    }
}

/// Response received from the server, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerReply {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body, `Value::Null` when the body was not JSON
    pub body: Value,
}

impl ServerReply {
    /// Build a reply from a raw response body.
    pub fn from_body(status: u16, text: &str) -> Self {
        let body = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                if !text.trim().is_empty() {
                    log::warn!("Server returned non-JSON body (status {}): {}", status, e);
                }
                Value::Null
            }
        };
        Self { status, body }
    }

    /// Success indicator: the body's `success` flag when present, otherwise
    /// whether the status is 2xx.
    pub fn success(&self) -> bool {
        let status_ok = (200..300).contains(&self.status);
        match self.body.get("success").and_then(Value::as_bool) {
            Some(flag) => status_ok && flag,
            None => status_ok,
        }
    }

    /// Server-provided message, if any.
    pub fn message(&self) -> Option<&str> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
    }
}
