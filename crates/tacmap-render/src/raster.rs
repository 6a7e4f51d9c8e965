//! PNG output through resvg.

use crate::icons::RasterIcon;
use crate::renderer::{RenderResult, Renderer};
use crate::scene::Scene;
use crate::svg::SvgRenderer;
use resvg::{tiny_skia, usvg};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Rasterization errors.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid SVG: {0}")]
    Svg(String),
    #[error("Invalid output size {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// System fonts, loaded once per process.
pub fn system_fonts() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("Loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Encode straight (non-premultiplied) RGBA8 pixels as PNG.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, png::EncodingError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(png_data)
}

/// Rasterize SVG markup to pixels of the given size.
pub fn rasterize_svg(svg: &str, resources_dir: Option<PathBuf>, width: u32, height: u32) -> Result<RasterIcon, RasterError> {
    let mut options = usvg::Options::default();
    options.fontdb = system_fonts();
    options.resources_dir = resources_dir;
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| RasterError::Svg(e.to_string()))?;
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(RasterError::InvalidSize(width, height))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(RasterIcon::from_pixmap(&pixmap))
}

/// Renders scenes to PNG files via their SVG form.
#[derive(Debug, Clone, Default)]
pub struct PngRenderer {
    /// Directory the floor image URL is resolved against.
    pub asset_root: Option<PathBuf>,
}

impl PngRenderer {
    pub fn new(asset_root: Option<PathBuf>) -> Self {
        Self { asset_root }
    }
}

impl Renderer for PngRenderer {
    type Output = Vec<u8>;

    fn render(&mut self, scene: &Scene) -> RenderResult<Vec<u8>> {
        let svg = SvgRenderer::new().render(scene)?;
        let width = scene.size.width.round().max(0.0) as u32;
        let height = scene.size.height.round().max(0.0) as u32;
        let image = rasterize_svg(&svg, self.asset_root.clone(), width, height)?;
        log::debug!("Rasterized {}x{} scene", image.width, image.height);
        Ok(encode_png(image.width, image.height, &image.rgba).map_err(RasterError::from)?)
    }
}
