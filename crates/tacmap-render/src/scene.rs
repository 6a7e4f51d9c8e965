//! Backend-independent drawing primitives.
//!
//! All geometry is in world coordinates; sizes are already divided by the
//! viewport scale so they render at a constant on-screen size once the
//! scene transform is applied.

use crate::icons::RasterIcon;
use kurbo::{Affine, Point, Rect, Size};
use std::sync::Arc;
use tacmap_core::HexColor;
use tacmap_core::elements::{LineCap, LineJoin};

/// How a polyline is stroked.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: HexColor,
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    /// Dash and gap length, when dashed.
    pub dash: Option<f64>,
}

impl StrokeStyle {
    pub fn solid(color: HexColor, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
            dash: None,
        }
    }

    pub fn dashed(mut self, dash: f64) -> Self {
        self.dash = Some(dash);
        self
    }
}

/// Vertical placement of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// Position is the top-left corner.
    TopLeft,
    /// Position is the center of the run.
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle {
        center: Point,
        radius: f64,
        fill: HexColor,
    },
    /// Smoothed polyline; `tension` 0 draws straight segments.
    Stroke {
        points: Vec<Point>,
        tension: f64,
        style: StrokeStyle,
    },
    /// Removes everything drawn before it in the same layer along the path.
    Erase {
        points: Vec<Point>,
        tension: f64,
        width: f64,
    },
    Arrow {
        start: Point,
        end: Point,
        /// Tip followed by the two base corners.
        head: [Point; 3],
        fill: HexColor,
        style: StrokeStyle,
    },
    Text {
        position: Point,
        text: String,
        fill: HexColor,
        font_size: f64,
        anchor: TextAnchor,
    },
    /// Label on a rounded translucent box, anchored at the box's top-left.
    Callout {
        position: Point,
        text: String,
        fill: HexColor,
        font_size: f64,
        padding: f64,
        corner_radius: f64,
        background: HexColor,
    },
    Image {
        rect: Rect,
        icon: Arc<RasterIcon>,
    },
}

/// Layers of a floor, bottom to top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layers {
    pub overlay: Vec<Primitive>,
    pub elements: Vec<Primitive>,
    pub preview: Vec<Primitive>,
}

impl Layers {
    pub fn iter(&self) -> impl Iterator<Item = &[Primitive]> {
        [self.overlay.as_slice(), self.elements.as_slice(), self.preview.as_slice()].into_iter()
    }

    pub fn len(&self) -> usize {
        self.overlay.len() + self.elements.len() + self.preview.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One frame ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: Size,
    pub background: HexColor,
    /// World to screen.
    pub transform: Affine,
    /// Viewport scale the sizes were compensated for.
    pub scale: f64,
    /// Site-absolute URL of the floor blueprint, drawn at the world origin.
    pub floor_image: Option<String>,
    pub layers: Layers,
}
