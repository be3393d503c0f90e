//! Viewport zoom and pan mathematics.
//!
//! Zoom is stepped: every wheel tick moves the scale by exactly one step
//! (10% by default) regardless of how far the wheel turned, and the result is
//! snapped to a multiple of the step and clamped to the configured range.
//! Pan follows the pointer relative to where the drag started.

use std::ops::{Add, Mul, Sub};

use crate::config::ViewportConfig;
use crate::constants::zoom;

/// A 2D position in screen or image space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Direction of one zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Map a wheel delta to a direction: scrolling down zooms out, up zooms in.
    /// A zero delta (pure horizontal scroll) does not zoom.
    pub fn from_wheel_delta(delta_y: f32) -> Option<Self> {
        if delta_y > 0.0 {
            Some(ZoomDirection::Out)
        } else if delta_y < 0.0 {
            Some(ZoomDirection::In)
        } else {
            None
        }
    }

    fn sign(self) -> i64 {
        match self {
            ZoomDirection::In => 1,
            ZoomDirection::Out => -1,
        }
    }
}

/// Allowed zoom range and step, all in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomLimits {
    pub min_percent: u32,
    pub max_percent: u32,
    pub step_percent: u32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_percent: zoom::MIN_PERCENT,
            max_percent: zoom::MAX_PERCENT,
            step_percent: zoom::STEP_PERCENT,
        }
    }
}

impl From<&ViewportConfig> for ZoomLimits {
    fn from(config: &ViewportConfig) -> Self {
        Self {
            min_percent: config.min_percent,
            max_percent: config.max_percent,
            step_percent: config.step_percent.max(1),
        }
    }
}

/// One zoom step from `current_percent`, snapped to the step grid and clamped.
pub fn step_zoom_percent(current_percent: u32, direction: ZoomDirection, limits: &ZoomLimits) -> u32 {
    let step = i64::from(limits.step_percent.max(1));
    let raw = i64::from(current_percent) + direction.sign() * step;
    let snapped = ((raw as f64 / step as f64).round() as i64) * step;
    snapped.clamp(i64::from(limits.min_percent), i64::from(limits.max_percent)) as u32
}

/// Scale and translation applied to the displayed image.
///
/// The renderer applies `scale(s) translate(x, y)`: the translation is in
/// unscaled image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scale: f32,
    pub position: Point,
}

impl ViewportState {
    pub fn new(scale: f32, position: Point) -> Self {
        Self { scale, position }
    }

    /// Scale 1, no translation.
    pub fn identity() -> Self {
        Self::new(1.0, Point::ORIGIN)
    }

    /// Zoom level as shown in the scale indicator ("110%").
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round().max(0.0) as u32
    }

    /// Apply one zoom step, keeping the translation.
    pub fn zoom(&self, direction: ZoomDirection, limits: &ZoomLimits) -> ViewportState {
        let percent = step_zoom_percent(self.zoom_percent(), direction, limits);
        ViewportState {
            scale: percent as f32 / 100.0,
            position: self.position,
        }
    }

    /// Capture the pointer offset at the start of a drag.
    pub fn begin_drag(&self, pointer: Point) -> DragAnchor {
        DragAnchor {
            offset: pointer - self.position,
            start_pointer: pointer,
            start_position: self.position,
        }
    }

    /// Convert a pointer position (relative to the viewport origin the
    /// renderer scales around) into image coordinates.
    pub fn screen_to_image(&self, pointer: Point) -> Point {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        Point::new(pointer.x / scale, pointer.y / scale) - self.position
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::identity()
    }
}

/// Where a drag started, relative to the image position at that moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    /// `pointer - position` at drag start
    pub offset: Point,
    start_pointer: Point,
    start_position: Point,
}

impl DragAnchor {
    /// New image position for the current pointer.
    ///
    /// With `damping == 1.0` the image stays locked to the pointer
    /// (`pointer - offset`); other factors scale the movement since drag start.
    pub fn continue_drag(&self, pointer: Point, damping: f32) -> Point {
        if (damping - 1.0).abs() < f32::EPSILON {
            pointer - self.offset
        } else {
            self.start_position + (pointer - self.start_pointer) * damping
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn is_step_multiple(scale: f32) -> bool {
        let tenths = scale * 10.0;
        (tenths - tenths.round()).abs() < 0.001
    }

    #[test]
    fn test_identity() {
        let v = ViewportState::identity();
        assert_eq!(v.scale, 1.0);
        assert_eq!(v.position, Point::ORIGIN);
        assert_eq!(v.zoom_percent(), 100);
        assert_eq!(ViewportState::default(), v);
    }

    #[test]
    fn test_single_step_in_and_out() {
        let limits = ZoomLimits::default();
        let v = ViewportState::identity();

        let zoomed_in = v.zoom(ZoomDirection::In, &limits);
        assert!(approx_eq(zoomed_in.scale, 1.1));
        assert_eq!(zoomed_in.zoom_percent(), 110);

        let zoomed_out = v.zoom(ZoomDirection::Out, &limits);
        assert!(approx_eq(zoomed_out.scale, 0.9));
    }

    #[test]
    fn test_round_trip_returns_to_original_scale() {
        let limits = ZoomLimits::default();
        for percent in (60..=390).step_by(10) {
            let v = ViewportState::new(percent as f32 / 100.0, Point::ORIGIN);
            let back = v.zoom(ZoomDirection::In, &limits).zoom(ZoomDirection::Out, &limits);
            assert_eq!(back.scale, v.scale, "round trip from {}%", percent);
        }
    }

    #[test]
    fn test_clamped_at_bounds() {
        let limits = ZoomLimits::default();
        let mut v = ViewportState::identity();
        for _ in 0..100 {
            v = v.zoom(ZoomDirection::In, &limits);
        }
        assert!(approx_eq(v.scale, 4.0));

        for _ in 0..100 {
            v = v.zoom(ZoomDirection::Out, &limits);
        }
        assert!(approx_eq(v.scale, 0.5));
    }

    #[test]
    fn test_scale_stays_on_grid_for_mixed_sequences() {
        let limits = ZoomLimits::default();
        let mut v = ViewportState::identity();
        // Deterministic pseudo-random walk
        let mut seed: u32 = 12345;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let direction = if (seed >> 16) % 3 == 0 {
                ZoomDirection::Out
            } else {
                ZoomDirection::In
            };
            v = v.zoom(direction, &limits);
            assert!(v.scale >= 0.5 - EPSILON && v.scale <= 4.0 + EPSILON);
            assert!(is_step_multiple(v.scale), "scale {} off grid", v.scale);
        }
    }

    #[test]
    fn test_off_grid_scale_snaps() {
        let limits = ZoomLimits::default();
        // 1.04 -> 104% + 10 = 114 -> snapped to 110
        let v = ViewportState::new(1.04, Point::ORIGIN).zoom(ZoomDirection::In, &limits);
        assert_eq!(v.zoom_percent(), 110);
    }

    #[test]
    fn test_zoom_preserves_position() {
        let limits = ZoomLimits::default();
        let v = ViewportState::new(1.0, Point::new(12.0, -4.0));
        assert_eq!(v.zoom(ZoomDirection::In, &limits).position, Point::new(12.0, -4.0));
    }

    #[test]
    fn test_wheel_direction() {
        assert_eq!(ZoomDirection::from_wheel_delta(120.0), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_wheel_delta(-3.0), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_wheel_delta(0.0), None);
    }

    #[test]
    fn test_custom_limits() {
        let limits = ZoomLimits {
            min_percent: 25,
            max_percent: 200,
            step_percent: 25,
        };
        assert_eq!(step_zoom_percent(100, ZoomDirection::In, &limits), 125);
        assert_eq!(step_zoom_percent(200, ZoomDirection::In, &limits), 200);
        assert_eq!(step_zoom_percent(25, ZoomDirection::Out, &limits), 25);
    }

    #[test]
    fn test_drag_is_relative_to_start() {
        let v = ViewportState::new(1.0, Point::new(10.0, 20.0));
        let anchor = v.begin_drag(Point::new(100.0, 100.0));
        assert_eq!(anchor.offset, Point::new(90.0, 80.0));

        // Pointer moves by (+5, -3): image follows 1:1
        let pos = anchor.continue_drag(Point::new(105.0, 97.0), 1.0);
        assert_eq!(pos, Point::new(15.0, 17.0));

        // Returning to the start restores the original position
        assert_eq!(anchor.continue_drag(Point::new(100.0, 100.0), 1.0), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_damped_drag() {
        let v = ViewportState::new(1.0, Point::new(0.0, 0.0));
        let anchor = v.begin_drag(Point::new(50.0, 50.0));
        let pos = anchor.continue_drag(Point::new(60.0, 40.0), 0.6);
        assert!(approx_eq(pos.x, 6.0));
        assert!(approx_eq(pos.y, -6.0));
    }

    #[test]
    fn test_screen_to_image() {
        let v = ViewportState::new(2.0, Point::new(10.0, -5.0));
        let p = v.screen_to_image(Point::new(40.0, 20.0));
        assert!(approx_eq(p.x, 10.0));
        assert!(approx_eq(p.y, 15.0));
    }
}
