//! SVG serialization of a [`Scene`].
//!
//! Erase strokes become masks: each one wraps everything drawn before it in
//! the element layer, so later strokes are not affected.

use crate::path::stroke_path;
use crate::renderer::{RenderResult, Renderer};
use crate::scene::{Primitive, Scene, StrokeStyle, TextAnchor};
use kurbo::Point;
use std::fmt::Write;
use tacmap_core::HexColor;

/// Extent of eraser masks in world units; large enough to cover any floor.
const MASK_EXTENT: f64 = 1.0e6;

/// Writes scenes as standalone SVG documents.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    /// Embed decoded icons as PNG data URLs.
    pub embed_icons: bool,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self { embed_icons: true }
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene) -> RenderResult<String> {
        write_scene(scene, self.embed_icons)
    }
}

fn write_scene(scene: &Scene, embed_icons: bool) -> RenderResult<String> {
    let mut svg = String::new();
    let (w, h) = (scene.size.width, scene.size.height);
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.2} {h:.2}">"#
    )?;
    writeln!(svg, r#"  <rect width="100%" height="100%" {}/>"#, fill_attr(scene.background))?;

    let c = scene.transform.as_coeffs();
    writeln!(
        svg,
        r#"  <g transform="matrix({:.6} {:.6} {:.6} {:.6} {:.4} {:.4})">"#,
        c[0], c[1], c[2], c[3], c[4], c[5]
    )?;

    if let Some(url) = &scene.floor_image {
        // Relative href so it resolves against the rasterizer's resource dir.
        writeln!(svg, r#"    <image x="0" y="0" href="{}"/>"#, escape(url.trim_start_matches('/')))?;
    }

    let writer = PrimitiveWriter { embed_icons };

    let mut overlay = String::new();
    for primitive in &scene.layers.overlay {
        writer.write(&mut overlay, primitive)?;
    }
    writeln!(svg, r#"    <g class="overlay">{overlay}</g>"#)?;

    let mut defs = String::new();
    let mut elements = String::new();
    let mut masks = 0usize;
    for primitive in &scene.layers.elements {
        if let Primitive::Erase { points, tension, width } = primitive {
            let id = format!("erase{masks}");
            masks += 1;
            write_mask(&mut defs, &id, points, *tension, *width)?;
            elements = format!(r#"<g mask="url(#{id})">{elements}</g>"#);
        } else {
            writer.write(&mut elements, primitive)?;
        }
    }
    if !defs.is_empty() {
        writeln!(svg, "    <defs>{defs}</defs>")?;
    }
    writeln!(svg, r#"    <g class="elements">{elements}</g>"#)?;

    let mut preview = String::new();
    for primitive in &scene.layers.preview {
        writer.write(&mut preview, primitive)?;
    }
    writeln!(svg, r#"    <g class="preview">{preview}</g>"#)?;

    writeln!(svg, "  </g>")?;
    writeln!(svg, "</svg>")?;
    Ok(svg)
}

fn write_mask(out: &mut String, id: &str, points: &[Point], tension: f64, width: f64) -> std::fmt::Result {
    let e = MASK_EXTENT;
    write!(
        out,
        r#"<mask id="{id}" maskUnits="userSpaceOnUse" x="{}" y="{}" width="{}" height="{}"><rect x="{}" y="{}" width="{}" height="{}" fill="white"/><path d="{}" fill="none" stroke="black" stroke-width="{width:.4}" stroke-linecap="round" stroke-linejoin="round"/></mask>"#,
        -e,
        -e,
        2.0 * e,
        2.0 * e,
        -e,
        -e,
        2.0 * e,
        2.0 * e,
        stroke_path(points, tension).to_svg()
    )
}

struct PrimitiveWriter {
    embed_icons: bool,
}

impl PrimitiveWriter {
    fn write(&self, out: &mut String, primitive: &Primitive) -> std::fmt::Result {
        match primitive {
            Primitive::Circle { center, radius, fill } => write!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.4}" {}/>"#,
                center.x,
                center.y,
                radius,
                fill_attr(*fill)
            ),
            Primitive::Stroke { points, tension, style } => write!(
                out,
                r#"<path d="{}" fill="none" {}/>"#,
                stroke_path(points, *tension).to_svg(),
                stroke_attrs(style)
            ),
            // Erase strokes are turned into masks by the layer writer.
            Primitive::Erase { .. } => Ok(()),
            Primitive::Arrow {
                start,
                end,
                head,
                fill,
                style,
            } => {
                write!(
                    out,
                    r#"<path d="M{:.2},{:.2}L{:.2},{:.2}" fill="none" {}/>"#,
                    start.x,
                    start.y,
                    end.x,
                    end.y,
                    stroke_attrs(style)
                )?;
                write!(
                    out,
                    r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" {} {}/>"#,
                    head[0].x,
                    head[0].y,
                    head[1].x,
                    head[1].y,
                    head[2].x,
                    head[2].y,
                    fill_attr(*fill),
                    stroke_attrs(&StrokeStyle { dash: None, ..style.clone() })
                )
            }
            Primitive::Text {
                position,
                text,
                fill,
                font_size,
                anchor,
            } => {
                let (anchor_attr, baseline) = match anchor {
                    TextAnchor::TopLeft => ("start", "hanging"),
                    TextAnchor::Center => ("middle", "central"),
                };
                write!(
                    out,
                    r#"<text x="{:.2}" y="{:.2}" font-family="Arial, sans-serif" font-size="{:.4}" text-anchor="{anchor_attr}" dominant-baseline="{baseline}" {}>{}</text>"#,
                    position.x,
                    position.y,
                    font_size,
                    fill_attr(*fill),
                    escape(text)
                )
            }
            Primitive::Callout {
                position,
                text,
                fill,
                font_size,
                padding,
                corner_radius,
                background,
            } => {
                let width = text.chars().count() as f64 * font_size * 0.6 + 2.0 * padding;
                let height = font_size + 2.0 * padding;
                write!(
                    out,
                    r#"<g><rect x="{:.2}" y="{:.2}" width="{:.4}" height="{:.4}" rx="{:.4}" {}/><text x="{:.2}" y="{:.2}" font-family="Arial, sans-serif" font-size="{:.4}" dominant-baseline="hanging" {}>{}</text></g>"#,
                    position.x,
                    position.y,
                    width,
                    height,
                    corner_radius,
                    fill_attr(*background),
                    position.x + padding,
                    position.y + padding,
                    font_size,
                    fill_attr(*fill),
                    escape(text)
                )
            }
            Primitive::Image { rect, icon } => {
                if !self.embed_icons {
                    return Ok(());
                }
                match icon.to_data_url() {
                    Ok(url) => write!(
                        out,
                        r#"<image x="{:.2}" y="{:.2}" width="{:.4}" height="{:.4}" preserveAspectRatio="none" href="{url}"/>"#,
                        rect.x0,
                        rect.y0,
                        rect.width(),
                        rect.height()
                    ),
                    Err(e) => {
                        log::warn!("Skipping icon that failed to encode: {e}");
                        Ok(())
                    }
                }
            }
        }
    }
}

fn fill_attr(color: HexColor) -> String {
    if color.a == 255 {
        format!(r#"fill="{}""#, color.to_rgb_hex())
    } else {
        format!(r#"fill="{}" fill-opacity="{:.3}""#, color.to_rgb_hex(), color.opacity())
    }
}

fn stroke_attrs(style: &StrokeStyle) -> String {
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{:.4}" stroke-linecap="{}" stroke-linejoin="{}""#,
        style.color.to_rgb_hex(),
        style.width,
        style.cap.as_str(),
        style.join.as_str()
    );
    if style.color.a != 255 {
        attrs.push_str(&format!(r#" stroke-opacity="{:.3}""#, style.color.opacity()));
    }
    if let Some(dash) = style.dash {
        attrs.push_str(&format!(r#" stroke-dasharray="{dash:.4} {dash:.4}""#));
    }
    attrs
}

/// Escape text for use in XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Layers;
    use kurbo::{Affine, Size};

    fn scene(elements: Vec<Primitive>) -> Scene {
        Scene {
            size: Size::new(200.0, 100.0),
            background: HexColor::black(),
            transform: Affine::translate((10.0, 20.0)) * Affine::scale(2.0),
            scale: 2.0,
            floor_image: Some("/maps/bank/r6-maps-bank-blueprint-2.jpg".to_string()),
            layers: Layers {
                elements,
                ..Layers::default()
            },
        }
    }

    fn stroke(x: f64) -> Primitive {
        Primitive::Stroke {
            points: vec![Point::new(x, 0.0), Point::new(x, 10.0)],
            tension: 0.0,
            style: StrokeStyle::solid(HexColor::red(), 1.0),
        }
    }

    fn erase() -> Primitive {
        Primitive::Erase {
            points: vec![Point::ZERO, Point::new(10.0, 10.0)],
            tension: 0.5,
            width: 5.0,
        }
    }

    #[test]
    fn test_document_frame() {
        let svg = SvgRenderer::new().render(&scene(vec![])).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="200" height="100""#));
        assert!(svg.contains("matrix(2.000000 0.000000 0.000000 2.000000 10.0000 20.0000)"));
        assert!(svg.contains(r#"href="maps/bank/r6-maps-bank-blueprint-2.jpg""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_eraser_masks_only_earlier_content() {
        let svg = SvgRenderer::new()
            .render(&scene(vec![stroke(1.0), erase(), stroke(2.0), erase()]))
            .unwrap();
        assert!(svg.contains(r#"<mask id="erase0""#));
        assert!(svg.contains(r#"<mask id="erase1""#));

        let layer = &svg[svg.find(r#"class="elements""#).unwrap()..];
        let outer = layer.find(r#"mask="url(#erase1)""#).unwrap();
        let inner = layer.find(r#"mask="url(#erase0)""#).unwrap();
        let first = layer.find("M1,0").unwrap();
        let second = layer.find("M2,0").unwrap();
        // erase1 wraps both strokes, erase0 only the first.
        assert!(outer < inner && inner < first);
        let inner_close = layer[inner..].find("</g>").unwrap() + inner;
        assert!(first < inner_close && inner_close < second);
    }

    #[test]
    fn test_text_is_escaped() {
        let svg = SvgRenderer::new()
            .render(&scene(vec![Primitive::Text {
                position: Point::ZERO,
                text: "A<B & \"C\"".to_string(),
                fill: HexColor::white(),
                font_size: 8.0,
                anchor: TextAnchor::Center,
            }]))
            .unwrap();
        assert!(svg.contains("A&lt;B &amp; &quot;C&quot;"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_translucent_dashed_stroke() {
        let style = StrokeStyle::solid(HexColor::new(255, 0, 0, 128), 5.0).dashed(2.5);
        let attrs = stroke_attrs(&style);
        assert!(attrs.contains(r##"stroke="#ff0000""##));
        assert!(attrs.contains("stroke-opacity=\"0.502\""));
        assert!(attrs.contains(r#"stroke-dasharray="2.5000 2.5000""#));
    }
}
