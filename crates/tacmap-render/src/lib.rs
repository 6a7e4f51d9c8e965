//! TacMap rendering: projection of a session onto scene primitives, icon
//! rasterization, and SVG/PNG backends.

pub mod icons;
pub mod path;
pub mod projector;
pub mod raster;
mod renderer;
pub mod scene;
pub mod svg;

pub use icons::{DecodeMode, IconCache, IconDecoder, IconError, IconKey, IconRequest, IconState, RasterIcon, SvgDecoder};
pub use projector::{icon_requests, project};
pub use raster::{PngRenderer, RasterError};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{Layers, Primitive, Scene, StrokeStyle, TextAnchor};
pub use svg::SvgRenderer;
