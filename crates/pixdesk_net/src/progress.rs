//! Upload progress accounting and cancellation.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

/// Shared cancellation flag for one submission.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Percentage of `sent` over `total`, rounded half up and capped at 100.
pub fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let sent = sent.min(total);
    ((sent * 100 + total / 2) / total) as u8
}

/// Tracks bytes handed to the transport and forwards percentage changes.
///
/// Percentages are only forwarded when they grow, so observers always see a
/// non-decreasing sequence even if several readers report concurrently.
pub struct UploadProgress {
    total: u64,
    sent: AtomicU64,
    last_percent: AtomicU8,
    abort: AbortFlag,
    on_percent: Box<dyn Fn(u8) + Send + Sync>,
}

impl UploadProgress {
    pub fn new(total: u64, abort: AbortFlag, on_percent: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            total,
            sent: AtomicU64::new(0),
            last_percent: AtomicU8::new(0),
            abort,
            on_percent: Box::new(on_percent),
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }

    /// Record `bytes` more bytes as sent.
    pub fn advance(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::SeqCst) + bytes;
        let percent = percent_of(sent, self.total);
        let previous = self.last_percent.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            (self.on_percent)(percent);
        }
    }
}

impl std::fmt::Debug for UploadProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadProgress")
            .field("total", &self.total)
            .field("sent", &self.sent())
            .field("aborted", &self.is_cancelled())
            .finish()
    }
}

/// Streams one payload into the request body, counting bytes as they go.
///
/// Once the abort flag is raised every further read fails, which makes the
/// transport drop the request without touching the remaining bytes.
pub struct ProgressReader {
    bytes: Arc<[u8]>,
    pos: usize,
    progress: Arc<UploadProgress>,
}

impl ProgressReader {
    pub fn new(bytes: Arc<[u8]>, progress: Arc<UploadProgress>) -> Self {
        Self {
            bytes,
            pos: 0,
            progress,
        }
    }
}

impl Read for ProgressReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.progress.is_cancelled() {
            return Err(io::Error::other("upload cancelled"));
        }
        let remaining = &self.bytes[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        if n > 0 {
            self.progress.advance(n as u64);
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_progress(total: u64, abort: AbortFlag) -> (Arc<UploadProgress>, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = UploadProgress::new(total, abort, move |p| {
            sink.lock().unwrap().push(p);
        });
        (Arc::new(progress), seen)
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent_of(0, 200), 0);
        assert_eq!(percent_of(1, 200), 1); // 0.5% rounds up
        assert_eq!(percent_of(199, 200), 100);
        assert_eq!(percent_of(50, 200), 25);
        assert_eq!(percent_of(500, 200), 100);
        assert_eq!(percent_of(0, 0), 100);
    }

    #[test]
    fn test_progress_is_non_decreasing_and_deduplicated() {
        let (progress, seen) = recording_progress(1000, AbortFlag::new());
        progress.advance(1);
        progress.advance(1);
        progress.advance(498);
        progress.advance(500);

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec![50, 100]);
        assert_eq!(progress.sent(), 1000);
    }

    #[test]
    fn test_reader_streams_all_bytes() {
        let (progress, seen) = recording_progress(8, AbortFlag::new());
        let mut reader = ProgressReader::new(Arc::from(vec![7u8; 8]), Arc::clone(&progress));

        let mut out = Vec::new();
        let mut buf = [0u8; 3];
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }

        assert_eq!(out, vec![7u8; 8]);
        assert_eq!(seen.lock().unwrap().last(), Some(&100));
    }

    #[test]
    fn test_reader_stops_after_abort() {
        let abort = AbortFlag::new();
        let (progress, _) = recording_progress(8, abort.clone());
        let mut reader = ProgressReader::new(Arc::from(vec![1u8; 8]), progress);

        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf).unwrap(), 4);

        abort.abort();
        assert!(reader.read(&mut buf).is_err());
    }
}
