//! Application configuration.

use crate::error::AppResult;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tacmap_core::HexColor;

/// Application configuration, optionally read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub width: u32,
    pub height: u32,
    /// Root of the static assets (`maps/index.json`, floor images, icons).
    pub asset_root: PathBuf,
    pub background_color: HexColor,
    /// Where exports are written; defaults to the user's download folder.
    pub export_dir: Option<PathBuf>,
    /// Decode icons on the calling thread.
    pub inline_icon_decode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            asset_root: PathBuf::from("public"),
            background_color: HexColor::rgb(26, 32, 44),
            export_dir: None,
            inline_icon_decode: false,
        }
    }
}

impl AppConfig {
    /// Read a config file; missing keys take their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn viewport_size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
