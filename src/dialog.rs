//! Dataset generation dialog.
//!
//! Escape and an overlay click close with an animation: the dialog stays
//! visible in the closing phase until the delay has passed on a later
//! [`DatasetDialog::tick`]. The close button and cancel close at once.
//! Reopening discards any pending animated close.

use web_time::{Duration, Instant};

use crate::constants::text;
use crate::error::Result;
use crate::resource::{ImageData, ImageSource, read_image};

/// Visibility of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    Closed,
    Open,
    /// Playing the slide-out animation
    Closing,
}

/// Element a pointer press or release landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTarget {
    /// The dimmed area around the dialog
    Overlay,
    /// Anything inside the dialog box
    Content,
}

/// Dialog visibility plus its form fields.
#[derive(Debug, Clone)]
pub struct DatasetDialog {
    phase: DialogPhase,
    /// Bumped on every open and close so a stale close cannot fire
    generation: u64,
    close_at: Option<(u64, Instant)>,
    close_delay: Duration,
    press_target: Option<OverlayTarget>,

    source: Option<ImageData>,
    count: u32,
    default_count: u32,
}

impl DatasetDialog {
    pub fn new(close_delay: Duration, default_count: u32) -> Self {
        Self {
            phase: DialogPhase::Closed,
            generation: 0,
            close_at: None,
            close_delay,
            press_target: None,
            source: None,
            count: default_count,
            default_count,
        }
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    /// Whether the dialog is on screen (open or animating out).
    pub fn is_visible(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    pub fn open(&mut self) {
        self.generation += 1;
        self.close_at = None;
        self.press_target = None;
        self.phase = DialogPhase::Open;
        log::debug!("Dataset dialog opened (#{})", self.generation);
    }

    /// Close without animation (× button, cancel, after a successful submit).
    pub fn close(&mut self) {
        if self.phase == DialogPhase::Closed {
            return;
        }
        self.generation += 1;
        self.close_at = None;
        self.press_target = None;
        self.phase = DialogPhase::Closed;
        log::debug!("Dataset dialog closed");
    }

    /// Start the animated close. No-op unless open.
    pub fn begin_close(&mut self, now: Instant) {
        if self.phase != DialogPhase::Open {
            return;
        }
        self.phase = DialogPhase::Closing;
        self.close_at = Some((self.generation, now + self.close_delay));
        log::debug!("Dataset dialog closing");
    }

    /// Escape key. Returns whether the key was consumed.
    pub fn escape(&mut self, now: Instant) -> bool {
        if self.phase == DialogPhase::Open {
            self.begin_close(now);
            true
        } else {
            false
        }
    }

    pub fn overlay_press(&mut self, target: OverlayTarget) {
        if self.is_visible() {
            self.press_target = Some(target);
        }
    }

    /// Pointer release; closes only when press and release both hit the
    /// overlay, so drags that leave the dialog box do not close it.
    pub fn overlay_release(&mut self, target: OverlayTarget, now: Instant) {
        let pressed = self.press_target.take();
        if pressed == Some(OverlayTarget::Overlay) && target == OverlayTarget::Overlay {
            self.begin_close(now);
        }
    }

    /// Finish a pending animated close once its delay has passed. Returns
    /// whether the dialog closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some((generation, deadline)) = self.close_at else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.close_at = None;
        if generation != self.generation || self.phase != DialogPhase::Closing {
            log::debug!("Ignoring stale dialog close #{}", generation);
            return false;
        }
        self.close();
        true
    }

    /// Pick the source image. On failure the previous choice stays.
    pub fn choose_file(&mut self, source: &ImageSource) -> Result<()> {
        let data = read_image(source)?;
        log::debug!("Dataset source: {} ({})", data.name, data.mime_type());
        self.source = Some(data);
        Ok(())
    }

    pub fn source(&self) -> Option<&ImageData> {
        self.source.as_ref()
    }

    pub fn file_label(&self) -> &str {
        self.source
            .as_ref()
            .map(|data| data.name.as_str())
            .unwrap_or(text::FILE_PLACEHOLDER)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Store the requested count as typed; range checks happen on submit.
    pub fn set_count(&mut self, count: u32) {
        self.count = count;
    }

    /// Clear the form without touching visibility.
    pub fn reset_form(&mut self) {
        self.source = None;
        self.count = self.default_count;
    }
}
