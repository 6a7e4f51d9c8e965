//! Text label.

use super::{ElementId, ElementPatch, HexColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Default font size in screen pixels.
pub const TEXT_FONT_SIZE: f64 = 16.0;

/// Rough advance width of one glyph relative to the font size.
const GLYPH_ASPECT: f64 = 0.6;

/// A single-line text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub id: ElementId,
    #[serde(flatten)]
    pub position: Point,
    pub text: String,
    pub fill: HexColor,
    pub font_size: f64,
}

impl Text {
    pub fn new(position: Point, text: impl Into<String>, fill: HexColor) -> Self {
        Self {
            id: ElementId::new(),
            position,
            text: text.into(),
            fill,
            font_size: TEXT_FONT_SIZE,
        }
    }

    /// Approximate world-space box of the label at the given scale.
    pub fn bounds(&self, scale: f64) -> Rect {
        let size = self.font_size / scale;
        let chars = self.text.chars().count().max(1) as f64;
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + chars * size * GLYPH_ASPECT,
            self.position.y + size,
        )
    }

    pub fn hit_test(&self, point: Point, scale: f64, tolerance: f64) -> bool {
        let pad = tolerance / scale;
        self.bounds(scale).inflate(pad, pad).contains(point)
    }

    pub(crate) fn apply_patch(&mut self, patch: &ElementPatch) {
        patch.merge_position(&mut self.position);
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
        if let Some(size) = patch.font_size {
            self.font_size = size;
        }
    }
}
