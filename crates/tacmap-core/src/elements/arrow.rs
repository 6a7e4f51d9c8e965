//! Arrow shape.

use super::{ElementId, ElementPatch, HexColor, point_to_segment_dist, points};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default shaft width in screen pixels.
pub const ARROW_STROKE_WIDTH: f64 = 3.0;
/// Default arrowhead length and width in screen pixels.
pub const ARROW_POINTER_SIZE: f64 = 10.0;
/// Arrows shorter than this (world units) are treated as accidental clicks.
pub const MIN_ARROW_LENGTH: f64 = 5.0;

/// A straight arrow from `points[0]` to `points[1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub id: ElementId,
    /// Start and end point, stored as `[x1, y1, x2, y2]`.
    #[serde(with = "points::pair")]
    pub points: [Point; 2],
    pub stroke: HexColor,
    pub fill: HexColor,
    pub stroke_width: f64,
    pub pointer_length: f64,
    pub pointer_width: f64,
}

impl Arrow {
    /// Create an arrow with the default shaft and head sizes, in a single color.
    pub fn new(start: Point, end: Point, color: HexColor) -> Self {
        Self {
            id: ElementId::new(),
            points: [start, end],
            stroke: color,
            fill: color,
            stroke_width: ARROW_STROKE_WIDTH,
            pointer_length: ARROW_POINTER_SIZE,
            pointer_width: ARROW_POINTER_SIZE,
        }
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    /// End point (where the arrowhead points).
    pub fn end(&self) -> Point {
        self.points[1]
    }

    /// Get the length of the arrow shaft.
    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }

    /// Get the direction vector (normalized).
    pub fn direction(&self) -> Vec2 {
        let delta = self.end() - self.start();
        let len = delta.hypot();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            delta / len
        }
    }

    /// Triangle of the arrowhead: tip, then the two base corners.
    ///
    /// `length` and `width` are in world units (already zoom-compensated).
    pub fn head(&self, length: f64, width: f64) -> [Point; 3] {
        let dir = self.direction();
        let normal = Vec2::new(-dir.y, dir.x);
        let tip = self.end();
        let base = tip - dir * length;
        [tip, base + normal * (width / 2.0), base - normal * (width / 2.0)]
    }

    pub fn hit_test(&self, point: Point, scale: f64, tolerance: f64) -> bool {
        let reach = (self.stroke_width / 2.0 + tolerance) / scale;
        point_to_segment_dist(point, self.start(), self.end()) <= reach
    }

    pub(crate) fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some([start, end]) = patch.points.as_deref() {
            self.points = [*start, *end];
        }
        if let Some(stroke) = patch.stroke {
            self.stroke = stroke;
        }
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
        if let Some(width) = patch.stroke_width {
            self.stroke_width = width;
        }
        if let Some(length) = patch.pointer_length {
            self.pointer_length = length;
        }
        if let Some(width) = patch.pointer_width {
            self.pointer_width = width;
        }
    }
}
