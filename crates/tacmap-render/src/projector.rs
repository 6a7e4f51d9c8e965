//! Projection of an editor session onto scene primitives.

use crate::icons::{IconCache, IconKey, IconRequest, IconState};
use crate::renderer::RenderContext;
use crate::scene::{Layers, Primitive, Scene, StrokeStyle, TextAnchor};
use kurbo::{Point, Rect, Size};
use std::sync::Arc;
use tacmap_core::catalog::{AdminOverlay, Callout, PresetIcon};
use tacmap_core::elements::{
    ARROW_POINTER_SIZE, ARROW_STROKE_WIDTH, Arrow, DEFAULT_TENSION, DRAW_STROKE_WIDTH, ERASE_STROKE_WIDTH,
    LegendGlyph,
};
use tacmap_core::tools::ToolPreview;
use tacmap_core::{Element, ElementPatch, HexColor};

/// Dash and gap of in-progress strokes, in screen pixels.
pub const PREVIEW_DASH: f64 = 5.0;
pub const CALLOUT_FONT_SIZE: f64 = 16.0;
pub const CALLOUT_PADDING: f64 = 8.0;
pub const CALLOUT_CORNER_RADIUS: f64 = 4.0;
/// Legend symbols are drawn at this fraction of the icon height.
pub const SYMBOL_SCALE: f64 = 0.8;

const CALLOUT_BACKGROUND: HexColor = HexColor::new(0, 0, 0, 179);
const CALLOUT_TEXT: HexColor = HexColor::new(255, 255, 255, 230);
const ERASER_PREVIEW: HexColor = HexColor::new(255, 0, 0, 128);
const PLACEHOLDER_LOADING: HexColor = HexColor::gray();
const PLACEHOLDER_ERROR: HexColor = HexColor::red();

/// Build the scene for the context's floor.
pub fn project(ctx: &RenderContext<'_>) -> Scene {
    let viewport = ctx.state.viewport;
    let projector = Projector {
        scale: viewport.scale,
        icons: ctx.icons,
    };

    let floor_image = ctx
        .map
        .filter(|map| map.has_floor(ctx.floor))
        .map(|map| map.image_url(ctx.floor));

    let mut layers = Layers::default();
    if let Some(overlay) = ctx.overlay {
        projector.overlay(ctx.floor, overlay, &mut layers.overlay);
    }

    let dragged = match ctx.preview {
        Some(ToolPreview::Drag { id, position }) => Some((id, position)),
        _ => None,
    };
    for element in ctx.state.elements.floor(ctx.floor) {
        match dragged {
            Some((id, position)) if element.id() == id => {
                let mut moved = element.clone();
                moved.apply_patch(&ElementPatch::position(position));
                layers.elements.push(projector.element(&moved));
            }
            _ => layers.elements.push(projector.element(element)),
        }
    }

    if let Some(preview) = &ctx.preview {
        if let Some(primitive) = projector.preview(preview, ctx.state.color) {
            layers.preview.push(primitive);
        }
    }

    Scene {
        size: ctx.viewport_size,
        background: ctx.background_color,
        transform: viewport.transform(),
        scale: viewport.scale,
        floor_image,
        layers,
    }
}

/// SVG icons visible on `floor`, sized in screen pixels.
///
/// Feed these to [`IconCache::sync`] before projecting so the cache tracks
/// exactly the instances on screen.
pub fn icon_requests(
    elements: &[Element],
    floor: i32,
    overlay: Option<&AdminOverlay>,
) -> Vec<IconRequest> {
    let mut requests = Vec::new();
    for element in elements {
        let (source, width, height) = match element {
            Element::Operator(op) => (op.icon.as_str(), op.width, op.height),
            Element::LegendIcon(icon) => match &icon.glyph {
                LegendGlyph::SvgSource(source) => (source.as_str(), icon.width, icon.height),
                LegendGlyph::Symbol(_) => continue,
            },
            _ => continue,
        };
        requests.push(IconRequest {
            key: IconKey::Element(element.id()),
            source: source.to_string(),
            width,
            height,
        });
    }
    for preset in overlay.map(|o| o.icons.as_slice()).unwrap_or_default() {
        if let LegendGlyph::SvgSource(source) = &preset.item.glyph {
            requests.push(IconRequest {
                key: IconKey::Preset {
                    floor,
                    index: preset.index,
                },
                source: source.clone(),
                width: preset.width,
                height: preset.height,
            });
        }
    }
    requests
}

struct Projector<'a> {
    scale: f64,
    icons: Option<&'a IconCache>,
}

impl Projector<'_> {
    /// World size that renders as `px` screen pixels.
    fn px(&self, px: f64) -> f64 {
        px / self.scale
    }

    fn overlay(&self, floor: i32, overlay: &AdminOverlay, out: &mut Vec<Primitive>) {
        out.extend(overlay.callouts.iter().map(|c| self.callout(c)));
        out.extend(overlay.icons.iter().map(|icon| self.preset(floor, icon)));
    }

    fn callout(&self, callout: &Callout) -> Primitive {
        Primitive::Callout {
            position: callout.position,
            text: callout.label.clone(),
            fill: CALLOUT_TEXT,
            font_size: self.px(CALLOUT_FONT_SIZE),
            padding: self.px(CALLOUT_PADDING),
            corner_radius: self.px(CALLOUT_CORNER_RADIUS),
            background: CALLOUT_BACKGROUND,
        }
    }

    fn preset(&self, floor: i32, preset: &PresetIcon) -> Primitive {
        let key = IconKey::Preset {
            floor,
            index: preset.index,
        };
        self.glyph(
            key,
            &preset.item.glyph,
            preset.item.color,
            preset.position,
            Size::new(preset.width, preset.height),
        )
    }

    fn element(&self, element: &Element) -> Primitive {
        match element {
            Element::PermMarker(marker) => Primitive::Circle {
                center: marker.position,
                radius: self.px(marker.radius),
                fill: marker.fill,
            },
            Element::Operator(op) => self.icon(
                IconKey::Element(op.id),
                op.position,
                Size::new(op.width, op.height),
            ),
            Element::Arrow(arrow) => self.arrow(
                arrow,
                arrow.fill,
                StrokeStyle::solid(arrow.stroke, self.px(arrow.stroke_width)),
                arrow.pointer_length,
                arrow.pointer_width,
            ),
            Element::Text(text) => Primitive::Text {
                position: text.position,
                text: text.text.clone(),
                fill: text.fill,
                font_size: self.px(text.font_size),
                anchor: TextAnchor::TopLeft,
            },
            Element::Drawing(drawing) if drawing.is_eraser() => Primitive::Erase {
                points: drawing.points.clone(),
                tension: drawing.tension(),
                width: self.px(drawing.stroke_width),
            },
            Element::Drawing(drawing) => Primitive::Stroke {
                points: drawing.points.clone(),
                tension: drawing.tension(),
                style: StrokeStyle {
                    color: drawing.stroke,
                    width: self.px(drawing.stroke_width),
                    cap: drawing.line_cap(),
                    join: drawing.line_join(),
                    dash: None,
                },
            },
            Element::LegendIcon(icon) => self.glyph(
                IconKey::Element(icon.id),
                &icon.glyph,
                icon.color,
                icon.position,
                Size::new(icon.width, icon.height),
            ),
        }
    }

    fn arrow(&self, arrow: &Arrow, fill: HexColor, style: StrokeStyle, length: f64, width: f64) -> Primitive {
        Primitive::Arrow {
            start: arrow.start(),
            end: arrow.end(),
            head: arrow.head(self.px(length), self.px(width)),
            fill,
            style,
        }
    }

    fn glyph(&self, key: IconKey, glyph: &LegendGlyph, color: HexColor, center: Point, size: Size) -> Primitive {
        match glyph {
            LegendGlyph::Symbol(symbol) => Primitive::Text {
                position: center,
                text: symbol.clone(),
                fill: color,
                font_size: self.px(size.height * SYMBOL_SCALE),
                anchor: TextAnchor::Center,
            },
            LegendGlyph::SvgSource(_) => self.icon(key, center, size),
        }
    }

    /// Decoded image, or a placeholder circle while loading or after failure.
    fn icon(&self, key: IconKey, center: Point, size: Size) -> Primitive {
        let world = Size::new(self.px(size.width), self.px(size.height));
        let placeholder = |fill| Primitive::Circle {
            center,
            radius: world.width / 2.0,
            fill,
        };
        match self.icons.and_then(|cache| cache.state(&key)) {
            Some(IconState::Ready(icon)) => Primitive::Image {
                rect: Rect::from_center_size(center, world),
                icon: Arc::clone(icon),
            },
            Some(IconState::Error(_)) => placeholder(PLACEHOLDER_ERROR),
            Some(IconState::Loading) | None => placeholder(PLACEHOLDER_LOADING),
        }
    }

    fn preview(&self, preview: &ToolPreview<'_>, color: HexColor) -> Option<Primitive> {
        let dash = self.px(PREVIEW_DASH);
        match *preview {
            ToolPreview::Stroke { eraser, points } => {
                let style = if eraser {
                    StrokeStyle::solid(ERASER_PREVIEW, self.px(ERASE_STROKE_WIDTH))
                } else {
                    StrokeStyle::solid(color, self.px(DRAW_STROKE_WIDTH))
                };
                Some(Primitive::Stroke {
                    points: points.to_vec(),
                    tension: DEFAULT_TENSION,
                    style: style.dashed(dash),
                })
            }
            ToolPreview::Arrow { start, end } => {
                let arrow = Arrow::new(start, end, color);
                let style = StrokeStyle::solid(color, self.px(ARROW_STROKE_WIDTH)).dashed(dash);
                Some(self.arrow(&arrow, color, style, ARROW_POINTER_SIZE, ARROW_POINTER_SIZE))
            }
            // Drags are shown by moving the element itself.
            ToolPreview::Drag { .. } => None,
        }
    }
}
