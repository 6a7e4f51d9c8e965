//! Operator icon.

use super::{ElementId, ElementPatch};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Default icon edge length in screen pixels.
pub const ICON_SIZE: f64 = 30.0;

/// An operator portrait placed on the map, centered on its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorIcon {
    pub id: ElementId,
    #[serde(flatten)]
    pub position: Point,
    /// Identifier into the operator catalog.
    pub operator_id: String,
    /// Icon image source (SVG markup, data URL or asset path).
    pub icon: String,
    #[serde(default = "default_icon_size")]
    pub width: f64,
    #[serde(default = "default_icon_size")]
    pub height: f64,
}

fn default_icon_size() -> f64 {
    ICON_SIZE
}

impl OperatorIcon {
    pub fn new(position: Point, operator_id: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            position,
            operator_id: operator_id.into(),
            icon: icon.into(),
            width: ICON_SIZE,
            height: ICON_SIZE,
        }
    }

    pub fn hit_test(&self, point: Point, scale: f64, tolerance: f64) -> bool {
        centered_box(self.position, self.width, self.height, scale, tolerance).contains(point)
    }

    pub(crate) fn apply_patch(&mut self, patch: &ElementPatch) {
        patch.merge_position(&mut self.position);
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
    }
}

/// Screen-constant box of `width` x `height` pixels centered on `center`.
pub(crate) fn centered_box(center: Point, width: f64, height: f64, scale: f64, tolerance: f64) -> Rect {
    let half_w = (width / 2.0 + tolerance) / scale;
    let half_h = (height / 2.0 + tolerance) / scale;
    Rect::new(center.x - half_w, center.y - half_h, center.x + half_w, center.y + half_h)
}
