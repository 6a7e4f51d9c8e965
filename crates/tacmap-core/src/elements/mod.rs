//! Annotation elements placed on a floor.

mod arrow;
mod color;
mod drawing;
mod legend;
mod marker;
mod operator;
pub mod points;
mod text;

pub use arrow::{ARROW_POINTER_SIZE, ARROW_STROKE_WIDTH, Arrow, MIN_ARROW_LENGTH};
pub use color::{ColorParseError, HexColor};
pub use drawing::{CompositeMode, DEFAULT_TENSION, DRAW_STROKE_WIDTH, Drawing, ERASE_STROKE_WIDTH, LineCap, LineJoin};
pub use legend::{LegendGlyph, LegendIcon};
pub use marker::{MARKER_RADIUS, PermMarker};
pub use operator::{ICON_SIZE, OperatorIcon};
pub use text::{TEXT_FONT_SIZE, Text};

use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Extra reach, in screen pixels, granted to every hit test.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Unique identifier for elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(Uuid);

impl ElementId {
    /// A fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Deterministic identifier for a legacy numeric id.
    pub fn from_number(n: f64) -> Self {
        Self(Uuid::from_u64_pair(n.to_bits(), 0))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Uuid(Uuid),
            Number(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Uuid(uuid) => Self(uuid),
            RawId::Number(n) => Self::from_number(n),
        })
    }
}

/// Discriminant of an element, as written in its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    PermMarker,
    Operator,
    Arrow,
    Text,
    Drawing,
    LegendIcon,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::PermMarker => "permMarker",
            ElementKind::Operator => "operator",
            ElementKind::Arrow => "arrow",
            ElementKind::Text => "text",
            ElementKind::Drawing => "drawing",
            ElementKind::LegendIcon => "legendIcon",
        }
    }
}

/// Partial update merged into an element. Fields that do not apply to the
/// target kind are ignored, and so is any `type` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "points::option")]
    pub points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
}

impl ElementPatch {
    /// Patch that moves an element to `position`.
    pub fn position(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the coordinates this patch carries.
    pub(crate) fn merge_position(&self, position: &mut Point) {
        if let Some(x) = self.x {
            position.x = x;
        }
        if let Some(y) = self.y {
            position.y = y;
        }
    }
}

/// Enum wrapper for all element kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    PermMarker(PermMarker),
    Operator(OperatorIcon),
    Arrow(Arrow),
    Text(Text),
    Drawing(Drawing),
    LegendIcon(LegendIcon),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::PermMarker(e) => e.id,
            Element::Operator(e) => e.id,
            Element::Arrow(e) => e.id,
            Element::Text(e) => e.id,
            Element::Drawing(e) => e.id,
            Element::LegendIcon(e) => e.id,
        }
    }

    fn id_mut(&mut self) -> &mut ElementId {
        match self {
            Element::PermMarker(e) => &mut e.id,
            Element::Operator(e) => &mut e.id,
            Element::Arrow(e) => &mut e.id,
            Element::Text(e) => &mut e.id,
            Element::Drawing(e) => &mut e.id,
            Element::LegendIcon(e) => &mut e.id,
        }
    }

    /// Assign a fresh identifier.
    pub fn regenerate_id(&mut self) {
        *self.id_mut() = ElementId::new();
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::PermMarker(_) => ElementKind::PermMarker,
            Element::Operator(_) => ElementKind::Operator,
            Element::Arrow(_) => ElementKind::Arrow,
            Element::Text(_) => ElementKind::Text,
            Element::Drawing(_) => ElementKind::Drawing,
            Element::LegendIcon(_) => ElementKind::LegendIcon,
        }
    }

    /// Anchor position, for kinds that have one. Arrows and drawings are
    /// defined by their points only.
    pub fn position(&self) -> Option<Point> {
        match self {
            Element::PermMarker(e) => Some(e.position),
            Element::Operator(e) => Some(e.position),
            Element::Text(e) => Some(e.position),
            Element::LegendIcon(e) => Some(e.position),
            Element::Arrow(_) | Element::Drawing(_) => None,
        }
    }

    /// Check if a world point hits this element at the given zoom.
    pub fn hit_test(&self, point: Point, scale: f64) -> bool {
        let tolerance = HIT_TOLERANCE;
        match self {
            Element::PermMarker(e) => e.hit_test(point, scale, tolerance),
            Element::Operator(e) => e.hit_test(point, scale, tolerance),
            Element::Arrow(e) => e.hit_test(point, scale, tolerance),
            Element::Text(e) => e.hit_test(point, scale, tolerance),
            Element::Drawing(e) => e.hit_test(point, scale, tolerance),
            Element::LegendIcon(e) => e.hit_test(point, scale, tolerance),
        }
    }

    /// Merge a partial update. The kind never changes.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        match self {
            Element::PermMarker(e) => e.apply_patch(patch),
            Element::Operator(e) => e.apply_patch(patch),
            Element::Arrow(e) => e.apply_patch(patch),
            Element::Text(e) => e.apply_patch(patch),
            Element::Drawing(e) => e.apply_patch(patch),
            Element::LegendIcon(e) => e.apply_patch(patch),
        }
    }
}

/// Distance from a point to a line segment (a->b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Elements of every floor, keyed by signed floor number. Each sequence is
/// kept in insertion order, which is also paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorElements(BTreeMap<i32, Vec<Element>>);

impl FloorElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements on `floor`, empty if the floor has never been touched.
    pub fn floor(&self, floor: i32) -> &[Element] {
        self.0.get(&floor).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_floor(&self, floor: i32) -> bool {
        self.0.contains_key(&floor)
    }

    /// Floor numbers present, ascending.
    pub fn floors(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &[Element])> {
        self.0.iter().map(|(floor, elements)| (*floor, elements.as_slice()))
    }

    /// Total element count across floors.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, floor: i32, id: ElementId) -> Option<&Element> {
        self.floor(floor).iter().find(|e| e.id() == id)
    }

    /// Append to the end of `floor`, creating the floor if needed.
    pub fn push(&mut self, floor: i32, element: Element) {
        self.0.entry(floor).or_default().push(element);
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn remove(&mut self, floor: i32, id: ElementId) -> bool {
        let Some(elements) = self.0.get_mut(&floor) else {
            return false;
        };
        let before = elements.len();
        elements.retain(|e| e.id() != id);
        elements.len() != before
    }

    /// Merge `patch` into the element with `id`. Returns whether it was found.
    pub fn update(&mut self, floor: i32, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.0.get_mut(&floor).and_then(|els| els.iter_mut().find(|e| e.id() == id)) else {
            return false;
        };
        element.apply_patch(patch);
        true
    }

    /// Empty one floor. The floor is present (and empty) afterwards.
    pub fn clear_floor(&mut self, floor: i32) {
        self.0.entry(floor).or_default().clear();
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Topmost element under a world point on `floor`.
    pub fn hit_test(&self, floor: i32, point: Point, scale: f64) -> Option<ElementId> {
        self.floor(floor)
            .iter()
            .rev()
            .find(|e| e.hit_test(point, scale))
            .map(Element::id)
    }
}

impl From<BTreeMap<i32, Vec<Element>>> for FloorElements {
    fn from(map: BTreeMap<i32, Vec<Element>>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn marker_at(x: f64, y: f64) -> Element {
        Element::PermMarker(PermMarker::new(Point::new(x, y), HexColor::red()))
    }

    #[test]
    fn test_element_json_discriminant() {
        let json = serde_json::to_value(marker_at(1.0, 2.0)).unwrap();
        assert_eq!(json["type"], "permMarker");
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["radius"], 5.0);
        assert_eq!(json["fill"], "#ff0000");

        let legacy = json!({
            "type": "operator",
            "id": 1700000000000_u64,
            "x": 5, "y": 6,
            "operatorId": "ash",
            "icon": "<svg/>",
            "iconSVG": "<svg/>",
            "width": 30, "height": 30
        });
        let element: Element = serde_json::from_value(legacy).unwrap();
        assert_eq!(element.kind(), ElementKind::Operator);
        assert_eq!(element.id(), ElementId::from_number(1700000000000.0));
        assert_eq!(element.position(), Some(Point::new(5.0, 6.0)));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let bad = json!({"type": "rectangle", "id": 1, "x": 0, "y": 0});
        assert!(serde_json::from_value::<Element>(bad).is_err());
    }

    #[test]
    fn test_patch_keeps_kind() {
        let mut element = marker_at(0.0, 0.0);
        let patch: ElementPatch = serde_json::from_value(json!({"type": "text", "x": 9.0, "radius": 7.0})).unwrap();
        element.apply_patch(&patch);
        assert_eq!(element.kind(), ElementKind::PermMarker);
        let Element::PermMarker(marker) = &element else { unreachable!() };
        assert_eq!(marker.position, Point::new(9.0, 0.0));
        assert!((marker.radius - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_regenerate_id() {
        let mut element = marker_at(0.0, 0.0);
        let old = element.id();
        element.regenerate_id();
        assert_ne!(old, element.id());
    }

    #[test]
    fn test_floor_map_operations() {
        let mut floors = FloorElements::new();
        let a = marker_at(0.0, 0.0);
        let b = marker_at(50.0, 50.0);
        let (a_id, b_id) = (a.id(), b.id());
        floors.push(-1, a);
        floors.push(-1, b);
        floors.push(2, marker_at(1.0, 1.0));

        assert_eq!(floors.floors().collect::<Vec<_>>(), vec![-1, 2]);
        assert_eq!(floors.floor(-1).len(), 2);
        assert_eq!(floors.floor(0).len(), 0);
        assert_eq!(floors.len(), 3);

        assert!(floors.remove(-1, a_id));
        assert!(!floors.remove(-1, a_id));
        assert!(!floors.remove(7, b_id));
        assert!(floors.update(-1, b_id, &ElementPatch::position(Point::new(3.0, 4.0))));
        assert_eq!(floors.get(-1, b_id).and_then(Element::position), Some(Point::new(3.0, 4.0)));

        floors.clear_floor(-1);
        assert!(floors.has_floor(-1));
        assert_eq!(floors.len(), 1);
    }

    #[test]
    fn test_floor_keys_serialize_as_strings() {
        let mut floors = FloorElements::new();
        floors.push(-1, marker_at(0.0, 0.0));
        let json = serde_json::to_value(&floors).unwrap();
        assert!(json.get("-1").is_some());

        let back: FloorElements = serde_json::from_value(json).unwrap();
        assert_eq!(back, floors);
    }

    #[test]
    fn test_hit_test_topmost_first() {
        let mut floors = FloorElements::new();
        let below = marker_at(10.0, 10.0);
        let above = marker_at(11.0, 10.0);
        let above_id = above.id();
        floors.push(0, below);
        floors.push(0, above);

        assert_eq!(floors.hit_test(0, Point::new(10.5, 10.0), 1.0), Some(above_id));
        assert_eq!(floors.hit_test(0, Point::new(200.0, 200.0), 1.0), None);
        assert_eq!(floors.hit_test(1, Point::new(10.5, 10.0), 1.0), None);
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((point_to_segment_dist(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-12);
        assert!((point_to_segment_dist(Point::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < 1e-12);
    }
}
