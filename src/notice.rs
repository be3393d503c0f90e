//! Auto-dismissing inline messages.
//!
//! There is one hide deadline, re-armed by every new notice, so a deadline
//! armed for an older notice never hides a newer one.

use web_time::{Duration, Instant};

use crate::error::ErrorInfo;

/// Severity of a notice, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl From<&ErrorInfo> for Notice {
    fn from(info: &ErrorInfo) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: info.message.clone(),
        }
    }
}

/// Single-slot notice area with a fixed display duration.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    shown: u64,
    hide_at: Option<Instant>,
    duration: Duration,
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: None,
            shown: 0,
            hide_at: None,
            duration,
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Show `notice`, replacing whatever is on screen.
    pub fn show(&mut self, notice: Notice, now: Instant) {
        self.shown += 1;
        log::debug!("💬 Notice #{}: {}", self.shown, notice.text);
        self.current = Some(notice);
        self.hide_at = Some(now + self.duration);
    }

    pub fn show_error(&mut self, info: &ErrorInfo, now: Instant) {
        self.show(Notice::from(info), now);
    }

    pub fn show_info(&mut self, text: impl Into<String>, now: Instant) {
        self.show(
            Notice {
                level: NoticeLevel::Info,
                text: text.into(),
            },
            now,
        );
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.hide_at = None;
    }

    /// Fire the hide timer if it is due. Returns whether a notice was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.hide_at = None;
                self.current.take().is_some()
            }
            _ => false,
        }
    }
}
