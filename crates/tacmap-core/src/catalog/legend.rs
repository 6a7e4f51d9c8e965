//! Legend items: symbols a user can stamp on a map.

use crate::elements::{HexColor, LegendGlyph, LegendIcon};
use kurbo::Point;
use serde::{Deserialize, Serialize};

const HATCH_CEILING_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect x="3" y="3" width="18" height="18" rx="2" fill="none" stroke="#a0aec0" stroke-width="2"/><path d="M12 17V7M8 11l4-4 4 4" fill="none" stroke="#a0aec0" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/></svg>"##;

const HATCH_FLOOR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect x="3" y="3" width="18" height="18" rx="2" fill="none" stroke="#a0aec0" stroke-width="2"/><path d="M12 7v10M8 13l4 4 4-4" fill="none" stroke="#a0aec0" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/></svg>"##;

/// A legend entry. Exactly one of symbol or SVG source, enforced by [`LegendGlyph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendItem {
    pub id: String,
    pub color: HexColor,
    pub name_key: String,
    #[serde(flatten)]
    pub glyph: LegendGlyph,
}

impl LegendItem {
    fn symbol(id: &str, symbol: &str, color: HexColor) -> Self {
        Self {
            id: id.to_string(),
            color,
            name_key: format!("legendItems.{id}"),
            glyph: LegendGlyph::Symbol(symbol.to_string()),
        }
    }

    fn svg(id: &str, source: &str, color: HexColor) -> Self {
        Self {
            id: id.to_string(),
            color,
            name_key: format!("legendItems.{id}"),
            glyph: LegendGlyph::SvgSource(source.to_string()),
        }
    }

    /// A default-sized icon of this item at `position`.
    pub fn place(&self, position: Point) -> LegendIcon {
        LegendIcon::new(position, self.id.clone(), self.color, self.glyph.clone())
    }
}

/// Lookup table of legend items.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendCatalog {
    items: Vec<LegendItem>,
}

impl Default for LegendCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LegendCatalog {
    pub fn new(items: Vec<LegendItem>) -> Self {
        Self { items }
    }

    /// The standard legend.
    pub fn builtin() -> Self {
        Self::new(vec![
            LegendItem::symbol("attackerSpawn", "A", HexColor::rgb(0x42, 0x99, 0xe1)),
            LegendItem::symbol("defenderSpawn", "D", HexColor::rgb(0xf6, 0xad, 0x55)),
            LegendItem::symbol("objective", "\u{1F3AF}", HexColor::rgb(0xf5, 0x65, 0x65)),
            LegendItem::symbol("camera", "\u{1F4F7}", HexColor::rgb(0xa0, 0xae, 0xc0)),
            LegendItem::symbol("reinforcement", "\u{1F9F1}", HexColor::rgb(0x71, 0x80, 0x96)),
            LegendItem::svg("hatchCeiling", HATCH_CEILING_SVG, HexColor::rgb(0xa0, 0xae, 0xc0)),
            LegendItem::svg("hatchFloor", HATCH_FLOOR_SVG, HexColor::rgb(0xa0, 0xae, 0xc0)),
            LegendItem::symbol("softWall", "SW", HexColor::rgb(0xfe, 0xd7, 0xd7)),
            LegendItem::symbol("breach", "\u{1F4A5}", HexColor::rgb(0xed, 0x89, 0x36)),
            LegendItem::symbol("droneHole", ">", HexColor::rgb(0xcb, 0xd5, 0xe0)),
            LegendItem::symbol("lineOfSight", "\u{1F441}\u{FE0F}", HexColor::rgb(0x63, 0xb3, 0xed)),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&LegendItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[LegendItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
