//! Serde helpers that store point lists as flat `[x1, y1, x2, y2, ...]` arrays.

use kurbo::Point;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Flatten points into `[x1, y1, x2, y2, ...]`.
pub fn flatten(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Rebuild points from a flat coordinate list. Returns `None` for odd lengths.
pub fn unflatten(coords: &[f64]) -> Option<Vec<Point>> {
    if coords.len() % 2 != 0 {
        return None;
    }
    Some(coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect())
}

pub fn serialize<S: Serializer>(points: &[Point], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(flatten(points))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Point>, D::Error> {
    let coords = Vec::<f64>::deserialize(deserializer)?;
    unflatten(&coords).ok_or_else(|| D::Error::custom("point list has an odd number of coordinates"))
}

/// Exactly two points, stored as `[x1, y1, x2, y2]`.
pub mod pair {
    use super::*;

    pub fn serialize<S: Serializer>(points: &[Point; 2], serializer: S) -> Result<S::Ok, S::Error> {
        super::serialize(points, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[Point; 2], D::Error> {
        let points = super::deserialize(deserializer)?;
        match points.as_slice() {
            [start, end] => Ok([*start, *end]),
            _ => Err(D::Error::custom("expected exactly two points")),
        }
    }
}

/// Optional point list (for partial updates).
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(points: &Option<Vec<Point>>, serializer: S) -> Result<S::Ok, S::Error> {
        match points {
            Some(points) => super::serialize(points, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<Point>>, D::Error> {
        let coords = Option::<Vec<f64>>::deserialize(deserializer)?;
        coords
            .map(|c| unflatten(&c).ok_or_else(|| D::Error::custom("point list has an odd number of coordinates")))
            .transpose()
    }
}
