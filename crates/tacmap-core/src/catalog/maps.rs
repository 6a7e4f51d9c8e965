//! Map list and floor image naming.

use super::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

const FALLBACK_MENU_IMAGE: &str = "/maps/r6-maps-fallback.jpg";

/// One floor of a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorConfig {
    pub name_key: String,
    /// Signed floor number, `-1` for a basement.
    pub floor_number: i32,
}

/// A playable map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub id: String,
    pub name_key: String,
    pub floors: Vec<FloorConfig>,
    #[serde(default)]
    pub menu_image: Option<String>,
}

/// Image path of a floor blueprint, relative to the asset root.
///
/// Blueprints are numbered from 1, starting at the basement (`-1`).
pub fn image_url(map_id: &str, floor_number: i32) -> String {
    let index = floor_number + 2;
    format!("/maps/{map_id}/r6-maps-{map_id}-blueprint-{index}.jpg")
}

impl MapConfig {
    pub fn new(id: &str, floors: &[(&str, i32)]) -> Self {
        Self {
            id: id.to_string(),
            name_key: format!("maps.{id}"),
            floors: floors
                .iter()
                .map(|(name, number)| FloorConfig {
                    name_key: format!("maps.{id}.{name}"),
                    floor_number: *number,
                })
                .collect(),
            menu_image: Some(FALLBACK_MENU_IMAGE.to_string()),
        }
    }

    pub fn image_url(&self, floor_number: i32) -> String {
        image_url(&self.id, floor_number)
    }

    pub fn has_floor(&self, floor_number: i32) -> bool {
        self.floor_index(floor_number).is_some()
    }

    /// Position of a floor in this map's floor list.
    pub fn floor_index(&self, floor_number: i32) -> Option<usize> {
        self.floors.iter().position(|f| f.floor_number == floor_number)
    }

    /// Ground floor if the map has one, otherwise its first floor.
    pub fn default_floor(&self) -> Option<i32> {
        if self.has_floor(0) {
            Some(0)
        } else {
            self.floors.first().map(|f| f.floor_number)
        }
    }
}

#[derive(Deserialize)]
struct MapIndex {
    #[serde(default)]
    maps: Vec<MapConfig>,
}

/// All known maps.
#[derive(Debug, Clone, PartialEq)]
pub struct MapCatalog {
    maps: Vec<MapConfig>,
}

impl Default for MapCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MapCatalog {
    pub fn new(maps: Vec<MapConfig>) -> Self {
        Self { maps }
    }

    /// Read `<assets>/maps/index.json`.
    pub fn from_index(assets: &Path) -> CatalogResult<Self> {
        let path = assets.join("maps").join("index.json");
        if !path.exists() {
            return Err(CatalogError::NotFound(path));
        }
        let json = std::fs::read_to_string(&path)?;
        let index: MapIndex = serde_json::from_str(&json)?;
        Ok(Self::new(index.maps))
    }

    /// Read the asset index, falling back to the built-in list.
    pub fn load(assets: &Path) -> Self {
        match Self::from_index(assets) {
            Ok(catalog) => {
                log::info!("Loaded {} maps from {}", catalog.len(), assets.display());
                catalog
            }
            Err(e) => {
                log::warn!("Cannot load map index ({e}), using the built-in map list");
                Self::builtin()
            }
        }
    }

    pub fn builtin() -> Self {
        const B: &str = "basement";
        const G: &str = "ground";
        const F1: &str = "first";
        const F2: &str = "second";
        const F3: &str = "third";
        Self::new(vec![
            MapConfig::new("bank", &[(B, -1), (G, 0), (F1, 1), (F2, 2)]),
            MapConfig::new("border", &[(G, 0), (F1, 1)]),
            MapConfig::new("chalet", &[(B, -1), (G, 0), (F1, 1)]),
            MapConfig::new("clubhouse", &[(B, -1), (G, 0), (F1, 1)]),
            MapConfig::new("coastline", &[(G, 0), (F1, 1)]),
            MapConfig::new("consulate", &[(B, -1), (G, 0), (F1, 1)]),
            MapConfig::new("emerald_plains", &[(G, 0), (F1, 1)]),
            MapConfig::new("kafe_dostoyevsky", &[(G, 0), (F1, 1), (F2, 2)]),
            MapConfig::new("kanal", &[(B, -1), (G, 0), (F1, 1), (F2, 2)]),
            MapConfig::new("nighthaven_labs", &[(B, -1), (G, 0), (F1, 1)]),
            MapConfig::new("oregon", &[(B, -1), (G, 0), (F1, 1), (F2, 2), (F3, 3)]),
            MapConfig::new("outback", &[(G, 0), (F1, 1)]),
            MapConfig::new("skyscraper", &[(G, 0), (F1, 1)]),
            MapConfig::new("stadium_bravo", &[(G, 0), (F1, 1)]),
            MapConfig::new("theme_park", &[(G, 0), (F1, 1)]),
            MapConfig::new("villa", &[(B, -1), (G, 0), (F1, 1)]),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&MapConfig> {
        self.maps.iter().find(|m| m.id == id)
    }

    pub fn maps(&self) -> &[MapConfig] {
        &self.maps
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_image_url_offsets_floor() {
        assert_eq!(image_url("oregon", -1), "/maps/oregon/r6-maps-oregon-blueprint-1.jpg");
        assert_eq!(image_url("oregon", 3), "/maps/oregon/r6-maps-oregon-blueprint-5.jpg");
    }

    #[test]
    fn test_builtin_floors() {
        let catalog = MapCatalog::builtin();
        let bank = catalog.get("bank").unwrap();
        let numbers: Vec<i32> = bank.floors.iter().map(|f| f.floor_number).collect();
        assert_eq!(numbers, vec![-1, 0, 1, 2]);
        assert_eq!(bank.floors[0].name_key, "maps.bank.basement");
        assert_eq!(bank.floor_index(0), Some(1));
        assert_eq!(bank.default_floor(), Some(0));
        assert!(catalog.get("atlantis").is_none());
    }

    #[test]
    fn test_load_from_index() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("maps")).unwrap();
        std::fs::write(
            dir.path().join("maps/index.json"),
            r#"{"maps": [{"id": "tower", "nameKey": "maps.tower", "floors": [{"nameKey": "maps.tower.top", "floorNumber": 5}]}]}"#,
        )
        .unwrap();

        let catalog = MapCatalog::load(dir.path());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("tower").unwrap().default_floor(), Some(5));
    }

    #[test]
    fn test_missing_index_falls_back() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(MapCatalog::from_index(dir.path()), Err(CatalogError::NotFound(_))));
        assert_eq!(MapCatalog::load(dir.path()), MapCatalog::builtin());
    }
}
