//! Observable state of one submission pipeline.

use crate::error::ErrorInfo;

/// Progress and outcome of the current (or last) submission.
///
/// `progress_percent` only grows while a submission runs and drops back to
/// zero when it ends, whatever the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    in_progress: bool,
    progress_percent: u8,
    last_error: Option<ErrorInfo>,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn last_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }

    /// Enter the in-flight state with fresh progress.
    pub fn begin(&mut self) {
        self.in_progress = true;
        self.progress_percent = 0;
        self.last_error = None;
    }

    /// Record upload progress. Ignored unless in flight; never decreases.
    pub fn set_progress(&mut self, percent: u8) {
        if !self.in_progress {
            return;
        }
        self.progress_percent = self.progress_percent.max(percent.min(100));
    }

    /// Leave the in-flight state, remembering the failure if there was one.
    pub fn finish(&mut self, error: Option<ErrorInfo>) {
        self.in_progress = false;
        self.progress_percent = 0;
        self.last_error = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_progress_is_monotonic() {
        let mut state = SubmissionState::new();
        state.begin();
        state.set_progress(40);
        state.set_progress(25);
        assert_eq!(state.progress_percent(), 40);
        state.set_progress(250);
        assert_eq!(state.progress_percent(), 100);
    }

    #[test]
    fn test_progress_ignored_when_idle() {
        let mut state = SubmissionState::new();
        state.set_progress(50);
        assert_eq!(state.progress_percent(), 0);
    }

    #[test]
    fn test_finish_resets_progress_and_keeps_error() {
        let mut state = SubmissionState::new();
        state.begin();
        state.set_progress(70);
        state.finish(Some(ErrorInfo::new(ErrorKind::Transport, "offline")));

        assert!(!state.in_progress());
        assert_eq!(state.progress_percent(), 0);
        assert_eq!(state.last_error().map(|e| e.message.as_str()), Some("offline"));

        // A new submission starts clean
        state.begin();
        assert!(state.last_error().is_none());
    }
}
