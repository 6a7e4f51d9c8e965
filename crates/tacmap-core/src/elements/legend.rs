//! Legend icon (objective, camera, hatch, ...).

use super::operator::{ICON_SIZE, centered_box};
use super::{ElementId, ElementPatch, HexColor};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What a legend icon draws: a text glyph or an SVG image, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendGlyph {
    /// Short text or emoji, drawn in the item color.
    Symbol(String),
    /// SVG markup, data URL or asset path.
    SvgSource(String),
}

impl LegendGlyph {
    pub fn symbol(&self) -> Option<&str> {
        match self {
            LegendGlyph::Symbol(s) => Some(s),
            LegendGlyph::SvgSource(_) => None,
        }
    }

    pub fn svg_source(&self) -> Option<&str> {
        match self {
            LegendGlyph::SvgSource(s) => Some(s),
            LegendGlyph::Symbol(_) => None,
        }
    }
}

/// A legend item placed on the map, centered on its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "LegendIconRecord")]
pub struct LegendIcon {
    pub id: ElementId,
    #[serde(flatten)]
    pub position: Point,
    /// Identifier into the legend catalog.
    pub legend_id: String,
    pub color: HexColor,
    #[serde(default = "default_icon_size")]
    pub width: f64,
    #[serde(default = "default_icon_size")]
    pub height: f64,
    #[serde(flatten)]
    pub glyph: LegendGlyph,
}

fn default_icon_size() -> f64 {
    ICON_SIZE
}

/// Wire form, with both glyph keys optional so that "both" and "neither"
/// can be rejected explicitly.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegendIconRecord {
    id: ElementId,
    x: f64,
    y: f64,
    legend_id: String,
    color: HexColor,
    #[serde(default = "default_icon_size")]
    width: f64,
    #[serde(default = "default_icon_size")]
    height: f64,
    symbol: Option<String>,
    svg_source: Option<String>,
}

impl TryFrom<LegendIconRecord> for LegendIcon {
    type Error = String;

    fn try_from(record: LegendIconRecord) -> Result<Self, Self::Error> {
        let glyph = match (record.symbol, record.svg_source) {
            (Some(symbol), None) => LegendGlyph::Symbol(symbol),
            (None, Some(source)) => LegendGlyph::SvgSource(source),
            (Some(_), Some(_)) => {
                return Err(format!("legend icon {} has both a symbol and an svgSource", record.legend_id));
            }
            (None, None) => {
                return Err(format!("legend icon {} has neither a symbol nor an svgSource", record.legend_id));
            }
        };
        Ok(Self {
            id: record.id,
            position: Point::new(record.x, record.y),
            legend_id: record.legend_id,
            color: record.color,
            width: record.width,
            height: record.height,
            glyph,
        })
    }
}

impl LegendIcon {
    pub fn new(position: Point, legend_id: impl Into<String>, color: HexColor, glyph: LegendGlyph) -> Self {
        Self {
            id: ElementId::new(),
            position,
            legend_id: legend_id.into(),
            color,
            width: ICON_SIZE,
            height: ICON_SIZE,
            glyph,
        }
    }

    pub fn hit_test(&self, point: Point, scale: f64, tolerance: f64) -> bool {
        centered_box(self.position, self.width, self.height, scale, tolerance).contains(point)
    }

    pub(crate) fn apply_patch(&mut self, patch: &ElementPatch) {
        patch.merge_position(&mut self.position);
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
    }
}
