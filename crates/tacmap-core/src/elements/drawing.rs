//! Freehand drawing and eraser strokes.

use super::{point_to_polyline_dist, points, ElementId, ElementPatch, HexColor};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default pen width in screen pixels.
pub const DRAW_STROKE_WIDTH: f64 = 2.0;
/// Default eraser width in screen pixels.
pub const ERASE_STROKE_WIDTH: f64 = 10.0;
/// Curve tension used when a stroke does not specify one.
pub const DEFAULT_TENSION: f64 = 0.5;

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

impl LineJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
            LineJoin::Miter => "miter",
        }
    }
}

/// How a stroke combines with what is already painted on the drawing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMode {
    /// Normal paint.
    #[default]
    SourceOver,
    /// Erase: subtracts the stroke from the layer below it.
    DestinationOut,
}

/// A polyline through the recorded pointer positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub id: ElementId,
    #[serde(with = "points")]
    pub points: Vec<Point>,
    pub stroke: HexColor,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_cap: Option<LineCap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_join: Option<LineJoin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_composite_operation: Option<CompositeMode>,
}

impl Drawing {
    /// A normal pen stroke.
    pub fn pen(points: Vec<Point>, stroke: HexColor) -> Self {
        Self {
            id: ElementId::new(),
            points,
            stroke,
            stroke_width: DRAW_STROKE_WIDTH,
            tension: None,
            line_cap: None,
            line_join: None,
            global_composite_operation: None,
        }
    }

    /// An eraser stroke that cuts through earlier paint.
    pub fn eraser(points: Vec<Point>) -> Self {
        Self {
            id: ElementId::new(),
            points,
            stroke: HexColor::white(),
            stroke_width: ERASE_STROKE_WIDTH,
            tension: None,
            line_cap: Some(LineCap::Round),
            line_join: Some(LineJoin::Round),
            global_composite_operation: Some(CompositeMode::DestinationOut),
        }
    }

    pub fn composite(&self) -> CompositeMode {
        self.global_composite_operation.unwrap_or_default()
    }

    pub fn is_eraser(&self) -> bool {
        self.composite() == CompositeMode::DestinationOut
    }

    pub fn tension(&self) -> f64 {
        self.tension.unwrap_or(DEFAULT_TENSION)
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap.unwrap_or_default()
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join.unwrap_or_default()
    }

    pub fn hit_test(&self, point: Point, scale: f64, tolerance: f64) -> bool {
        let reach = (self.stroke_width / 2.0 + tolerance) / scale;
        match self.points.as_slice() {
            [] => false,
            [only] => only.distance(point) <= reach,
            pts => point_to_polyline_dist(point, pts) <= reach,
        }
    }

    pub(crate) fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(points) = &patch.points {
            self.points = points.clone();
        }
        if let Some(stroke) = patch.stroke {
            self.stroke = stroke;
        }
        if let Some(width) = patch.stroke_width {
            self.stroke_width = width;
        }
        if let Some(tension) = patch.tension {
            self.tension = Some(tension);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eraser_semantics() {
        let pen = Drawing::pen(vec![Point::ZERO, Point::new(1.0, 1.0)], HexColor::red());
        assert!(!pen.is_eraser());
        assert_eq!(pen.composite(), CompositeMode::SourceOver);

        let eraser = Drawing::eraser(vec![Point::ZERO, Point::new(1.0, 1.0)]);
        assert!(eraser.is_eraser());
        assert!((eraser.stroke_width - ERASE_STROKE_WIDTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_eraser_json_shape() {
        let eraser = Drawing::eraser(vec![Point::new(0.0, 0.0), Point::new(4.0, 2.0)]);
        let json = serde_json::to_value(&eraser).unwrap();
        assert_eq!(json["points"], serde_json::json!([0.0, 0.0, 4.0, 2.0]));
        assert_eq!(json["globalCompositeOperation"], "destination-out");
        assert_eq!(json["lineCap"], "round");
        assert!(json.get("tension").is_none());
    }

    #[test]
    fn test_odd_point_list_rejected() {
        let json = serde_json::json!({
            "id": "5b0c2f44-5b11-4a4a-93a4-41f595e2bc53",
            "points": [0.0, 1.0, 2.0],
            "stroke": "#000000",
            "strokeWidth": 2.0
        });
        assert!(serde_json::from_value::<Drawing>(json).is_err());
    }

    #[test]
    fn test_hit_test_along_polyline() {
        let pen = Drawing::pen(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            HexColor::red(),
        );
        assert!(pen.hit_test(Point::new(10.5, 5.0), 1.0, 1.0));
        assert!(!pen.hit_test(Point::new(5.0, 5.0), 1.0, 1.0));
    }
}
