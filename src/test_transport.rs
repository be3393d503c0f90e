//! Scripted transport for exercising submissions without a server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use pixdesk_net::{MultipartRequest, NetError, ServerReply, Transport, UploadProgress};

enum Script {
    Reply { status: u16, body: &'static str },
    Timeout,
    WaitForCancel,
    SlowReply { delay: Duration },
}

/// Records every request and answers from a fixed script.
pub struct MockTransport {
    script: Script,
    requests: Mutex<Vec<MultipartRequest>>,
    saw_cancel: AtomicBool,
}

impl MockTransport {
    fn with(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            requests: Mutex::new(Vec::new()),
            saw_cancel: AtomicBool::new(false),
        })
    }

    pub fn replying(status: u16, body: &'static str) -> Arc<Self> {
        Self::with(Script::Reply { status, body })
    }

    pub fn timing_out() -> Arc<Self> {
        Self::with(Script::Timeout)
    }

    /// Blocks until the submission is cancelled.
    pub fn hanging() -> Arc<Self> {
        Self::with(Script::WaitForCancel)
    }

    /// Sends the whole body, then takes `delay` to answer with success.
    /// The abort flag is never consulted.
    pub fn slow_reply(delay: Duration) -> Arc<Self> {
        Self::with(Script::SlowReply { delay })
    }

    pub fn requests(&self) -> Vec<MultipartRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Whether a hanging submission observed the abort flag.
    pub fn saw_cancel(&self) -> bool {
        self.saw_cancel.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn submit(
        &self,
        request: &MultipartRequest,
        progress: Arc<UploadProgress>,
    ) -> pixdesk_net::Result<ServerReply> {
        self.requests.lock().unwrap().push(request.clone());

        match self.script {
            Script::Reply { status, body } => {
                // Two chunks per part so observers see intermediate progress
                for part in &request.files {
                    let half = part.len() / 2;
                    progress.advance(half);
                    progress.advance(part.len() - half);
                }
                Ok(ServerReply::from_body(status, body))
            }
            Script::Timeout => Err(NetError::Timeout(30_000)),
            Script::WaitForCancel => {
                let deadline = Instant::now() + Duration::from_secs(5);
                while Instant::now() < deadline {
                    if progress.is_cancelled() {
                        self.saw_cancel.store(true, Ordering::SeqCst);
                        return Err(NetError::Cancelled);
                    }
                    thread::sleep(Duration::from_millis(2));
                }
                Err(NetError::Timeout(5_000))
            }
            Script::SlowReply { delay } => {
                for part in &request.files {
                    progress.advance(part.len());
                }
                thread::sleep(delay);
                Ok(ServerReply::from_body(200, r#"{"success": true}"#))
            }
        }
    }
}

/// Call `poll` until it yields a value or five seconds pass.
pub fn wait_for<T>(mut poll: impl FnMut() -> Option<T>) -> T {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(value) = poll() {
            return value;
        }
        assert!(Instant::now() < deadline, "timed out waiting for submission");
        thread::sleep(Duration::from_millis(2));
    }
}
