//! Smoothed polylines for freehand strokes.

use kurbo::{BezPath, Point, Vec2};

/// Control points around `p1` for a cardinal spline through `p0, p1, p2`.
fn control_points(p0: Point, p1: Point, p2: Point, tension: f64) -> (Point, Point) {
    let d01 = p0.distance(p1);
    let d12 = p1.distance(p2);
    let total = d01 + d12;
    if total <= f64::EPSILON {
        return (p1, p1);
    }
    let span: Vec2 = p2 - p0;
    let fa = tension * d01 / total;
    let fb = tension * d12 / total;
    (p1 - span * fa, p1 + span * fb)
}

/// Path through `points`; `tension` 0 gives straight segments.
///
/// With tension, interior points get cubic segments and the first and last
/// segments are quadratic, so the curve passes through every point.
pub fn stroke_path(points: &[Point], tension: f64) -> BezPath {
    let mut path = BezPath::new();
    let Some((&first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(first);

    if tension == 0.0 || points.len() < 3 {
        for &point in rest {
            path.line_to(point);
        }
        return path;
    }

    let controls: Vec<(Point, Point)> = points
        .windows(3)
        .map(|w| control_points(w[0], w[1], w[2], tension))
        .collect();

    path.quad_to(controls[0].0, points[1]);
    for i in 1..controls.len() {
        path.curve_to(controls[i - 1].1, controls[i].0, points[i + 1]);
    }
    if let (Some(last_control), Some(&last)) = (controls.last(), points.last()) {
        path.quad_to(last_control.1, last);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn test_straight_without_tension() {
        let pts = [Point::ZERO, Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
        let path = stroke_path(&pts, 0.0);
        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(pts[0]), PathEl::LineTo(pts[1]), PathEl::LineTo(pts[2])]
        );
    }

    #[test]
    fn test_smooth_passes_through_points() {
        let pts = [
            Point::ZERO,
            Point::new(10.0, 5.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 5.0),
        ];
        let path = stroke_path(&pts, 0.5);
        let ends: Vec<Point> = path.elements().iter().filter_map(|el| el.end_point()).collect();
        assert_eq!(ends, pts.to_vec());
        assert!(matches!(path.elements()[1], PathEl::QuadTo(..)));
        assert!(matches!(path.elements()[2], PathEl::CurveTo(..)));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(stroke_path(&[], 0.5).elements().is_empty());
        assert_eq!(stroke_path(&[Point::ZERO], 0.5).elements().len(), 1);
        let same = [Point::ZERO, Point::ZERO, Point::ZERO];
        assert_eq!(stroke_path(&same, 0.5).elements().len(), 3);
    }
}
