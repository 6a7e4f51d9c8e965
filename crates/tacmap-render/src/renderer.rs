//! Renderer trait abstraction.

use crate::icons::IconCache;
use crate::scene::Scene;
use kurbo::Size;
use tacmap_core::catalog::AdminOverlay;
use tacmap_core::tools::ToolPreview;
use tacmap_core::{EditorState, HexColor, MapConfig};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("SVG formatting failed")]
    Format(#[from] std::fmt::Error),
    #[error(transparent)]
    Raster(#[from] crate::raster::RasterError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The session to render.
    pub state: &'a EditorState,
    /// Floor number shown.
    pub floor: i32,
    /// Stage size in pixels.
    pub viewport_size: Size,
    /// Active map, for the floor image.
    pub map: Option<&'a MapConfig>,
    /// Resolved admin entries of the shown floor.
    pub overlay: Option<&'a AdminOverlay>,
    /// In-progress gesture drawn on top.
    pub preview: Option<ToolPreview<'a>>,
    /// Decoded icons; icons without a cache render as loading.
    pub icons: Option<&'a IconCache>,
    /// Background color.
    pub background_color: HexColor,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(state: &'a EditorState, floor: i32, viewport_size: Size) -> Self {
        Self {
            state,
            floor,
            viewport_size,
            map: None,
            overlay: None,
            preview: None,
            icons: None,
            background_color: HexColor::rgb(26, 32, 44),
        }
    }

    pub fn with_map(mut self, map: &'a MapConfig) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_overlay(mut self, overlay: &'a AdminOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn with_preview(mut self, preview: Option<ToolPreview<'a>>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_icons(mut self, icons: &'a IconCache) -> Self {
        self.icons = Some(icons);
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: HexColor) -> Self {
        self.background_color = color;
        self
    }
}

/// Turns a projected [`Scene`] into an output format.
pub trait Renderer {
    type Output;

    fn render(&mut self, scene: &Scene) -> RenderResult<Self::Output>;
}
