//! Static and asset-backed lookup data: maps, admin overlays, operators, legend.

mod admin;
mod legend;
mod maps;
mod operators;

pub use admin::{AdminFloorConfig, AdminMapConfig, AdminOverlay, Callout, CalloutConfig, MapIconConfig, PresetIcon};
pub use legend::{LegendCatalog, LegendItem};
pub use maps::{FloorConfig, MapCatalog, MapConfig, image_url};
pub use operators::{OperatorCatalog, OperatorConfig, Side};

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Turns a label key into display text.
pub trait LabelResolver {
    fn resolve(&self, key: &str) -> String;
}

/// Displays keys as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLabels;

impl LabelResolver for IdentityLabels {
    fn resolve(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Table lookup, falling back to the key itself.
impl LabelResolver for HashMap<String, String> {
    fn resolve(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}
