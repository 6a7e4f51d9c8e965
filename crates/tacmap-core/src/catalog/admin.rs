//! Per-map admin overlay: fixed callouts and preset legend icons.

use super::legend::{LegendCatalog, LegendItem};
use super::maps::MapConfig;
use super::{CatalogError, CatalogResult, LabelResolver};
use crate::elements::ICON_SIZE;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalloutConfig {
    pub name_key: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapIconConfig {
    pub legend_id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminFloorConfig {
    #[serde(default)]
    pub callouts: Vec<CalloutConfig>,
    #[serde(default)]
    pub icons: Vec<MapIconConfig>,
}

/// Contents of `<assets>/maps/<id>/config.json`. Floors are listed in the
/// same order as the map's floor list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminMapConfig {
    #[serde(default)]
    pub floors: Vec<AdminFloorConfig>,
}

impl AdminMapConfig {
    pub fn path(assets: &Path, map_id: &str) -> std::path::PathBuf {
        assets.join("maps").join(map_id).join("config.json")
    }

    pub fn read(assets: &Path, map_id: &str) -> CatalogResult<Self> {
        let path = Self::path(assets, map_id);
        if !path.exists() {
            return Err(CatalogError::NotFound(path));
        }
        let json = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Read the config, treating every failure as "no overlay".
    pub fn load(assets: &Path, map_id: &str) -> Option<Self> {
        match Self::read(assets, map_id) {
            Ok(config) => Some(config),
            Err(CatalogError::NotFound(_)) => {
                log::info!("No admin config found for map {map_id}, proceeding without it");
                None
            }
            Err(e) => {
                log::warn!("Failed to load admin config for map {map_id}: {e}");
                None
            }
        }
    }

    /// Overlay entries for one floor of `map`.
    pub fn overlay(
        &self,
        map: &MapConfig,
        floor_number: i32,
        legend: &LegendCatalog,
        labels: &dyn LabelResolver,
    ) -> AdminOverlay {
        let Some(floor) = map.floor_index(floor_number).and_then(|index| self.floors.get(index)) else {
            return AdminOverlay::default();
        };

        let callouts = floor
            .callouts
            .iter()
            .map(|c| Callout {
                label: labels.resolve(&format!("mapCallouts.{}.{}", map.id, c.name_key)),
                position: Point::new(c.x, c.y),
            })
            .collect();

        let icons = floor
            .icons
            .iter()
            .enumerate()
            .filter_map(|(index, icon)| match legend.get(&icon.legend_id) {
                Some(item) => Some(PresetIcon {
                    index,
                    item: item.clone(),
                    position: Point::new(icon.x, icon.y),
                    width: ICON_SIZE,
                    height: ICON_SIZE,
                }),
                None => {
                    log::debug!("Skipping preset icon with unknown legend item {}", icon.legend_id);
                    None
                }
            })
            .collect();

        AdminOverlay { callouts, icons }
    }
}

/// Text label with a translucent background box.
#[derive(Debug, Clone, PartialEq)]
pub struct Callout {
    pub label: String,
    pub position: Point,
}

/// A legend icon fixed by the map config; not selectable.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetIcon {
    /// Position in the floor's icon list, stable for a given config.
    pub index: usize,
    pub item: LegendItem,
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

/// Resolved overlay of one floor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminOverlay {
    pub callouts: Vec<Callout>,
    pub icons: Vec<PresetIcon>,
}

impl AdminOverlay {
    pub fn is_empty(&self) -> bool {
        self.callouts.is_empty() && self.icons.is_empty()
    }
}
