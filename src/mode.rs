//! Interaction mode and pointer routing.
//!
//! In normal mode the wheel zooms and a primary press starts a pan. In
//! coordinate-capture mode the wheel is swallowed and a primary press picks a
//! point instead.

use std::fmt;

use crate::model::ProblemId;
use crate::zoom_math::{Point, ZoomDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Normal,
    CoordinateCapture,
}

impl InteractionMode {
    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::Normal => InteractionMode::CoordinateCapture,
            InteractionMode::CoordinateCapture => InteractionMode::Normal,
        }
    }

    pub fn is_capture(self) -> bool {
        self == InteractionMode::CoordinateCapture
    }

    /// Zoom step for a wheel event, or `None` when the wheel is suppressed.
    pub fn route_wheel(self, delta_y: f32) -> Option<ZoomDirection> {
        match self {
            InteractionMode::Normal => ZoomDirection::from_wheel_delta(delta_y),
            InteractionMode::CoordinateCapture => None,
        }
    }

    /// What a primary-button press means in this mode.
    pub fn route_press(self) -> PressIntent {
        match self {
            InteractionMode::Normal => PressIntent::BeginPan,
            InteractionMode::CoordinateCapture => PressIntent::Pick,
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionMode::Normal => f.write_str("normal"),
            InteractionMode::CoordinateCapture => f.write_str("coordinate capture"),
        }
    }
}

/// Interpretation of a primary-button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressIntent {
    BeginPan,
    Pick,
}

/// Which pointer button an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Result of feeding a pointer event to the workspace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Nothing changed
    Ignored,
    /// Zoom stepped to the given percentage
    Zoomed(u32),
    PanStarted,
    /// Image moved to a new position
    Panned(Point),
    PanEnded,
    /// A point was picked in image space; stored on `problem` when one is active
    PointPicked {
        point: Point,
        problem: Option<ProblemId>,
    },
}
