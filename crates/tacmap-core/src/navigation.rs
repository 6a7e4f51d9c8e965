//! Wheel zoom and drag panning of the viewport.

use crate::input::MouseButton;
use crate::session::Action;
use crate::tools::{PointerTarget, ToolKind};
use crate::viewport::{Viewport, ViewportPatch, clamp_scale};
use kurbo::Point;

/// Scale change per wheel notch.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.05;

/// Viewport after one wheel step, keeping the world point under `pointer` fixed.
///
/// Positive `delta_y` (scrolling down) zooms out.
pub fn wheel_zoom(viewport: &Viewport, pointer: Point, delta_y: f64) -> Viewport {
    let old_scale = viewport.scale;
    let new_scale = clamp_scale(if delta_y > 0.0 {
        old_scale / WHEEL_ZOOM_FACTOR
    } else {
        old_scale * WHEEL_ZOOM_FACTOR
    });
    let anchor = (pointer.to_vec2() - viewport.pan) / old_scale;
    Viewport::new(pointer.to_vec2() - anchor * new_scale, new_scale)
}

/// Turns wheel and drag input into viewport actions.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    /// Last screen position of an active pan gesture.
    last: Option<Point>,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wheel(&self, viewport: &Viewport, pointer: Point, delta_y: f64) -> Action {
        Action::SetViewport(ViewportPatch::full(wheel_zoom(viewport, pointer, delta_y)))
    }

    /// Whether a pointer down starts a pan: middle button with any tool, or a
    /// background drag with the select tool.
    pub fn starts_pan(tool: ToolKind, button: MouseButton, target: PointerTarget) -> bool {
        button == MouseButton::Middle
            || (button == MouseButton::Left && tool == ToolKind::Select && target == PointerTarget::Background)
    }

    pub fn begin_pan(&mut self, screen: Point) {
        self.last = Some(screen);
    }

    pub fn is_panning(&self) -> bool {
        self.last.is_some()
    }

    /// Pan by the screen delta since the previous call.
    pub fn drag(&mut self, viewport: &Viewport, screen: Point) -> Option<Action> {
        let last = self.last.replace(screen)?;
        let delta = screen - last;
        if delta.hypot2() == 0.0 {
            return None;
        }
        Some(Action::SetViewport(ViewportPatch::pan(viewport.pan + delta)))
    }

    /// Returns whether a pan was in progress.
    pub fn end_pan(&mut self) -> bool {
        self.last.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{MAX_SCALE, MIN_SCALE};
    use kurbo::Vec2;

    #[test]
    fn test_wheel_direction() {
        let vp = Viewport::default();
        assert!((wheel_zoom(&vp, Point::ZERO, 1.0).scale - 1.0 / 1.05).abs() < 1e-12);
        assert!((wheel_zoom(&vp, Point::ZERO, -1.0).scale - 1.05).abs() < 1e-12);
        assert!((wheel_zoom(&vp, Point::ZERO, 0.0).scale - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_wheel_keeps_pointer_anchored() {
        let vp = Viewport::new(Vec2::new(30.0, -20.0), 2.0);
        let pointer = Point::new(400.0, 300.0);
        let world_before = vp.screen_to_world(pointer);
        let zoomed = wheel_zoom(&vp, pointer, -120.0);
        let world_after = zoomed.screen_to_world(pointer);
        assert!((world_before - world_after).hypot() < 1e-9);
    }

    #[test]
    fn test_wheel_clamps() {
        let mut vp = Viewport::default();
        for _ in 0..200 {
            vp = wheel_zoom(&vp, Point::new(10.0, 10.0), -1.0);
        }
        assert!((vp.scale - MAX_SCALE).abs() < f64::EPSILON);
        for _ in 0..400 {
            vp = wheel_zoom(&vp, Point::new(10.0, 10.0), 1.0);
        }
        assert!((vp.scale - MIN_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_gesture() {
        assert!(ViewportController::starts_pan(ToolKind::Draw, MouseButton::Middle, PointerTarget::Background));
        assert!(ViewportController::starts_pan(ToolKind::Select, MouseButton::Left, PointerTarget::Background));
        assert!(!ViewportController::starts_pan(ToolKind::Draw, MouseButton::Left, PointerTarget::Background));

        let mut vp = Viewport::new(Vec2::new(5.0, 5.0), 3.0);
        let mut nav = ViewportController::new();
        nav.begin_pan(Point::new(100.0, 100.0));
        let Some(Action::SetViewport(patch)) = nav.drag(&vp, Point::new(110.0, 90.0)) else {
            panic!("expected a viewport action");
        };
        vp.merge(patch);
        assert_eq!(vp.pan, Vec2::new(15.0, -5.0));
        assert!((vp.scale - 3.0).abs() < f64::EPSILON);

        assert!(nav.drag(&vp, Point::new(110.0, 90.0)).is_none());
        assert!(nav.end_pan());
        assert!(nav.drag(&vp, Point::new(0.0, 0.0)).is_none());
    }
}
