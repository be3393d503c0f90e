//! Error taxonomy for workspace operations.
//!
//! Every failure ends up as an [`ErrorInfo`] the UI can render; the typed
//! variants exist so callers can tell validation problems from network ones.

use std::path::PathBuf;

use pixdesk_net::NetError;
use thiserror::Error;

use crate::constants::text;

/// Broad classification used when displaying an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input, detected before any network call
    Validation,
    /// Network failure or timeout
    Transport,
    /// The server answered with a failure flag
    ServerReported,
    /// A renderable image handle could not be created
    Resource,
}

/// User-facing description of a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Prefer the server's message, fall back to a generic one.
    pub fn from_server(message: Option<&str>, fallback: &str) -> Self {
        Self::new(
            ErrorKind::ServerReported,
            message.unwrap_or(fallback).to_string(),
        )
    }
}

/// Failure of a network submission.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The request never produced a usable response
    #[error("{info}: {source}")]
    Transport {
        info: ErrorInfo,
        #[source]
        source: NetError,
    },

    /// The server responded but reported failure
    #[error("Server reported failure (status {status}): {}", .info.message)]
    ServerReported { info: ErrorInfo, status: u16 },
}

impl SubmissionError {
    pub fn transport(source: NetError, fallback: &str) -> Self {
        Self::Transport {
            info: ErrorInfo::new(ErrorKind::Transport, fallback),
            source,
        }
    }

    pub fn info(&self) -> &ErrorInfo {
        match self {
            Self::Transport { info, .. } | Self::ServerReported { info, .. } => info,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_cancelled())
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors returned by workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Input rejected before doing any work
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Index outside the current collection
    #[error("Index {index} out of range for {len} images")]
    Range { index: usize, len: usize },

    /// An image file could not be turned into a renderable handle
    #[error("Cannot load image {name}: {reason}")]
    Input { name: String, reason: String },

    /// Reading an image file from disk failed
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A submission is in flight and the operation would interfere with it
    #[error("A submission is in progress")]
    Busy,

    /// No problem with the given id exists
    #[error("Unknown problem: {0}")]
    UnknownProblem(String),

    /// The submission worker could not be started or the request failed
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl WorkspaceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn input(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Input {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Display form of this error.
    pub fn info(&self) -> ErrorInfo {
        match self {
            Self::Validation(message) => ErrorInfo::new(ErrorKind::Validation, message.clone()),
            Self::Input { .. } | Self::Io { .. } => {
                ErrorInfo::new(ErrorKind::Resource, text::UNREADABLE_IMAGE)
            }
            Self::Busy => ErrorInfo::new(ErrorKind::Validation, text::SUBMISSION_BUSY),
            Self::Range { .. } => ErrorInfo::new(ErrorKind::Validation, text::IMAGE_NOT_FOUND),
            Self::UnknownProblem(_) => ErrorInfo::new(ErrorKind::Validation, text::UNKNOWN_PROBLEM),
            Self::Submission(e) => e.info().clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_preferred() {
        let info = ErrorInfo::from_server(Some("too blurry"), text::ANALYZE_FAILED);
        assert_eq!(info.kind, ErrorKind::ServerReported);
        assert_eq!(info.message, "too blurry");

        let info = ErrorInfo::from_server(None, text::ANALYZE_FAILED);
        assert_eq!(info.message, text::ANALYZE_FAILED);
    }

    #[test]
    fn test_transport_error_uses_fallback() {
        let err = SubmissionError::transport(NetError::Timeout(30_000), text::ANALYZE_FAILED);
        assert_eq!(err.info().kind, ErrorKind::Transport);
        assert_eq!(err.info().message, text::ANALYZE_FAILED);
        assert!(!err.is_cancelled());

        let cancelled = SubmissionError::transport(NetError::Cancelled, text::ANALYZE_FAILED);
        assert!(cancelled.is_cancelled());
    }

    #[test]
    fn test_workspace_errors_render_localized_text() {
        assert_eq!(WorkspaceError::Busy.info().message, text::SUBMISSION_BUSY);
        assert_eq!(
            WorkspaceError::Range { index: 3, len: 1 }.info().message,
            text::IMAGE_NOT_FOUND
        );
        let unknown = WorkspaceError::UnknownProblem("problem9".to_string()).info();
        assert_eq!(unknown.kind, ErrorKind::Validation);
        assert_eq!(unknown.message, text::UNKNOWN_PROBLEM);
    }

    #[test]
    fn test_input_errors_render_as_resource() {
        let err = WorkspaceError::input("notes.txt", "not an image");
        assert_eq!(err.info().kind, ErrorKind::Resource);
    }
}
