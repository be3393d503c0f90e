//! Multipart submission plumbing for pixdesk.
//!
//! Builds multipart requests from owned byte payloads, reports upload progress
//! as the body is streamed, honours an abort flag and runs each submission on a
//! background thread so the caller's event loop only ever polls.

pub mod error;
pub mod progress;
pub mod request;
pub mod transport;
pub mod worker;

pub use error::{NetError, Result};
pub use progress::{AbortFlag, UploadProgress};
pub use request::{FilePart, MultipartRequest, ServerReply};
pub use transport::{HttpTransport, Transport};
pub use worker::{SubmissionWorker, WorkerEvent};
