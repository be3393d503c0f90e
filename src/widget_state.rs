//! Transient pointer state for the image viewport.
//!
//! A pan drag holds a pointer capture (the equivalent of window-level
//! move/up listeners) for exactly as long as the drag lasts. The capture is a
//! guard value: ending the drag, starting another one or dropping the state all
//! release it, so a capture can never outlive its drag.

use std::cell::Cell;
use std::rc::Rc;

use crate::zoom_math::DragAnchor;

/// Counts live pointer captures. Lives on the UI thread with its owner.
#[derive(Debug, Clone, Default)]
pub struct CaptureTracker {
    active: Rc<Cell<usize>>,
}

impl CaptureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capture; it is released when the guard is dropped.
    pub fn acquire(&self) -> CaptureGuard {
        let now = self.active.get() + 1;
        self.active.set(now);
        log::debug!("Pointer capture acquired ({} active)", now);
        CaptureGuard {
            active: Rc::clone(&self.active),
        }
    }

    pub fn active(&self) -> usize {
        self.active.get()
    }
}

/// Live pointer capture. Dropping it releases the capture.
#[derive(Debug)]
pub struct CaptureGuard {
    active: Rc<Cell<usize>>,
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        let left = self.active.get().saturating_sub(1);
        self.active.set(left);
        log::debug!("Pointer capture released ({} active)", left);
    }
}

/// An in-progress pan drag.
#[derive(Debug)]
struct DragSession {
    anchor: DragAnchor,
    _capture: CaptureGuard,
}

/// Transient state for the image viewer/pan-zoom surface.
#[derive(Debug, Default)]
pub struct ImageViewState {
    tracker: CaptureTracker,
    drag: Option<DragSession>,
}

impl ImageViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag operation, replacing any drag that was never ended.
    pub fn start_drag(&mut self, anchor: DragAnchor) {
        if self.drag.take().is_some() {
            log::warn!("Starting new drag while previous drag still active - forcing end");
        }
        self.drag = Some(DragSession {
            anchor,
            _capture: self.tracker.acquire(),
        });
    }

    /// Anchor of the active drag, if any.
    pub fn anchor(&self) -> Option<&DragAnchor> {
        self.drag.as_ref().map(|session| &session.anchor)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// End the drag operation. Returns whether a drag was active.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Number of pointer captures currently held.
    pub fn active_captures(&self) -> usize {
        self.tracker.active()
    }
}
