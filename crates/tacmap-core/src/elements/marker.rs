//! Permanent marker (filled dot).

use super::{ElementId, ElementPatch, HexColor};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default marker radius in screen pixels.
pub const MARKER_RADIUS: f64 = 5.0;

/// A filled circle pinned to a world position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermMarker {
    pub id: ElementId,
    #[serde(flatten)]
    pub position: Point,
    pub radius: f64,
    pub fill: HexColor,
}

impl PermMarker {
    pub fn new(position: Point, fill: HexColor) -> Self {
        Self {
            id: ElementId::new(),
            position,
            radius: MARKER_RADIUS,
            fill,
        }
    }

    /// Hit test with the radius compensated for the current scale.
    pub fn hit_test(&self, point: Point, scale: f64, tolerance: f64) -> bool {
        let radius = (self.radius + tolerance) / scale;
        self.position.distance(point) <= radius
    }

    pub(crate) fn apply_patch(&mut self, patch: &ElementPatch) {
        patch.merge_position(&mut self.position);
        if let Some(radius) = patch.radius {
            self.radius = radius;
        }
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
    }
}
