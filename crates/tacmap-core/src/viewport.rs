//! Viewport state and the screen/world coordinate transform.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 10.0;

/// Pan and uniform zoom of the stage.
///
/// Serializes as `{ "x": .., "y": .., "scale": .. }`, the `stageState` of an
/// exported document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Translation in screen pixels.
    #[serde(flatten)]
    pub pan: Vec2,
    /// Uniform scale, kept within [`MIN_SCALE`, `MAX_SCALE`].
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

/// Clamp a scale to the allowed zoom range.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Partial viewport update. Missing fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportPatch {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub scale: Option<f64>,
}

impl ViewportPatch {
    /// Patch that only moves the pan.
    pub fn pan(pan: Vec2) -> Self {
        Self {
            x: Some(pan.x),
            y: Some(pan.y),
            scale: None,
        }
    }

    /// Patch that replaces the whole viewport.
    pub fn full(viewport: Viewport) -> Self {
        Self {
            x: Some(viewport.pan.x),
            y: Some(viewport.pan.y),
            scale: Some(viewport.scale),
        }
    }
}

impl Viewport {
    /// Create a viewport with the given pan and scale (scale is clamped).
    pub fn new(pan: Vec2, scale: f64) -> Self {
        Self {
            pan,
            scale: clamp_scale(scale),
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.pan)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Size in world units that renders as `screen_size` pixels.
    pub fn compensate(&self, screen_size: f64) -> f64 {
        screen_size / self.scale
    }

    /// Merge a partial update into this viewport.
    pub fn merge(&mut self, patch: ViewportPatch) {
        if let Some(x) = patch.x {
            self.pan.x = x;
        }
        if let Some(y) = patch.y {
            self.pan.y = y;
        }
        if let Some(scale) = patch.scale {
            self.scale = clamp_scale(scale);
        }
    }

    /// Reset to the default `{0, 0, 1}`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.pan, Vec2::ZERO);
        assert!((viewport.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_identity() {
        let viewport = Viewport::default();
        let screen = Point::new(100.0, 200.0);
        let world = viewport.screen_to_world(screen);
        assert!((world.x - screen.x).abs() < f64::EPSILON);
        assert!((world.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_pan_and_scale() {
        let viewport = Viewport::new(Vec2::new(50.0, 100.0), 2.0);
        let world = viewport.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < 1e-12);
        assert!((world.y - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let pans = [Vec2::new(30.0, -20.0), Vec2::new(-812.5, 4.25), Vec2::ZERO];
        let scales = [MIN_SCALE, 0.37, 1.0, 1.5, 7.25, MAX_SCALE];
        let points = [
            Point::new(123.0, 456.0),
            Point::new(-3.5, 0.0),
            Point::new(1920.0, 1080.0),
        ];
        for pan in pans {
            for scale in scales {
                let viewport = Viewport::new(pan, scale);
                for original in points {
                    let back = viewport.world_to_screen(viewport.screen_to_world(original));
                    assert!((back.x - original.x).abs() < 1e-9);
                    assert!((back.y - original.y).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_merge_clamps_scale() {
        let mut viewport = Viewport::default();
        viewport.merge(ViewportPatch {
            scale: Some(50.0),
            ..Default::default()
        });
        assert!((viewport.scale - MAX_SCALE).abs() < f64::EPSILON);

        viewport.merge(ViewportPatch {
            x: Some(12.0),
            scale: Some(0.0),
            ..Default::default()
        });
        assert!((viewport.scale - MIN_SCALE).abs() < f64::EPSILON);
        assert!((viewport.pan.x - 12.0).abs() < f64::EPSILON);
        assert!((viewport.pan.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_as_stage_state() {
        let viewport = Viewport::new(Vec2::new(10.0, -4.0), 2.0);
        let json = serde_json::to_value(viewport).unwrap();
        assert_eq!(json, serde_json::json!({ "x": 10.0, "y": -4.0, "scale": 2.0 }));

        let back: Viewport = serde_json::from_value(json).unwrap();
        assert_eq!(back, viewport);
    }

    #[test]
    fn test_compensate() {
        let viewport = Viewport::new(Vec2::ZERO, 4.0);
        assert!((viewport.compensate(2.0) - 0.5).abs() < f64::EPSILON);
    }
}
