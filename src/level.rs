//! Level import: tile grid + tilesets + spawn objects
//!
//! A level document is imported once into typed, immutable collections. Bad
//! content never aborts an import: short layers, unknown tile IDs and unknown
//! object types are skipped with a log line. Only unreadable files and
//! syntactically invalid JSON are errors.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TILE_SIZE;
use crate::sim::geometry::{Bounded, Rect};

/// Failure to obtain a level document at all
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid level document: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

/// Raw level document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelFile {
    pub width: u32,
    pub height: u32,
    /// Pixel edge of one tile
    #[serde(rename = "tilewidth", alias = "tile_size")]
    pub tile_size: Option<u32>,
    pub layers: Vec<LayerDef>,
    pub tilesets: Vec<TilesetDef>,
    pub objects: Vec<ObjectDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerDef {
    pub name: String,
    /// Row-major tile IDs, `width * height` long; 0 is empty
    pub data: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TilesetDef {
    pub firstgid: u32,
    pub tiles: Vec<TileDef>,
}

impl Default for TilesetDef {
    fn default() -> Self {
        Self {
            firstgid: 1,
            tiles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TileDef {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectDef {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub patrol_points: Vec<PointDef>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PointDef {
    pub x: f32,
    pub y: f32,
}

// ---------------------------------------------------------------------------
// Imported level
// ---------------------------------------------------------------------------

/// Semantic tile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    Door,
    Vent,
    Loot,
    Security,
    /// A known tileset entry with a type this game has no collection for
    Other,
}

impl TileKind {
    /// An entry that resolves but carries no type is a wall
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "wall" | "" => TileKind::Wall,
            "floor" => TileKind::Floor,
            "door" => TileKind::Door,
            "vent" => TileKind::Vent,
            "loot" => TileKind::Loot,
            "security" => TileKind::Security,
            _ => TileKind::Other,
        }
    }
}

/// One placed tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub name: String,
    pub rect: Rect,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// Impassable rectangle, fixed for the lifetime of the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
}

impl Bounded for Obstacle {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardSpawn {
    pub pos: Vec2,
    /// May be empty: the guard then holds its post
    pub route: Vec<Vec2>,
}

/// Imported level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    /// Wall tiles
    pub obstacles: Vec<Obstacle>,
    pub floors: Vec<Tile>,
    pub doors: Vec<Tile>,
    pub vents: Vec<Tile>,
    pub loot_tiles: Vec<Tile>,
    pub security: Vec<Tile>,
    pub other: Vec<Tile>,
    pub player_spawn: Vec2,
    pub guard_spawns: Vec<GuardSpawn>,
    pub extraction: Vec2,
}

impl Level {
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        let level = Self::from_json_str(&json)?;
        log::info!(
            "Loaded level {} ({}x{}, {} walls, {} guards)",
            path.display(),
            level.width,
            level.height,
            level.obstacles.len(),
            level.guard_spawns.len()
        );
        Ok(level)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        Ok(Self::import(&file))
    }

    /// Turn a level document into typed collections (one pass per layer)
    pub fn import(file: &LevelFile) -> Self {
        let tile_size = file.tile_size.filter(|&t| t > 0).unwrap_or(TILE_SIZE);
        let mut level = Level {
            width: file.width,
            height: file.height,
            tile_size,
            ..Default::default()
        };

        let expected = file.width as usize * file.height as usize;
        for layer in &file.layers {
            if layer.data.len() < expected {
                log::warn!(
                    "Layer '{}' has {} tiles, expected {}; missing cells are empty",
                    layer.name,
                    layer.data.len(),
                    expected
                );
            }
            level.import_layer(file, layer);
        }

        level.import_objects(&file.objects);
        level
    }

    fn import_layer(&mut self, file: &LevelFile, layer: &LayerDef) {
        let size = self.tile_size as f32;
        for y in 0..file.height {
            for x in 0..file.width {
                let idx = y as usize * file.width as usize + x as usize;
                let Some(&tile_id) = layer.data.get(idx) else {
                    continue;
                };
                if tile_id == 0 {
                    continue;
                }
                let Some(info) = tile_info(&file.tilesets, tile_id) else {
                    log::debug!("Layer '{}': unknown tile id {} at ({}, {})", layer.name, tile_id, x, y);
                    continue;
                };

                let kind = TileKind::from_str(&info.kind);
                let rect = Rect::new(x as f32 * size, y as f32 * size, size, size);
                let name = if info.name.is_empty() {
                    format!("tile_{tile_id}")
                } else {
                    info.name.clone()
                };
                let tile = Tile {
                    kind,
                    name,
                    rect,
                    properties: info.properties.clone(),
                };
                match kind {
                    TileKind::Wall => self.obstacles.push(Obstacle { rect }),
                    TileKind::Floor => self.floors.push(tile),
                    TileKind::Door => self.doors.push(tile),
                    TileKind::Vent => self.vents.push(tile),
                    TileKind::Loot => self.loot_tiles.push(tile),
                    TileKind::Security => self.security.push(tile),
                    TileKind::Other => self.other.push(tile),
                }
            }
        }
    }

    fn import_objects(&mut self, objects: &[ObjectDef]) {
        let mut player_spawn = None;
        let mut extraction = None;
        for obj in objects {
            let pos = self.snap_to_grid(Vec2::new(obj.x, obj.y));
            match obj.kind.as_str() {
                "player_spawn" => {
                    player_spawn.get_or_insert(pos);
                }
                "extraction" => {
                    extraction.get_or_insert(pos);
                }
                "guard_spawn" => self.guard_spawns.push(GuardSpawn {
                    pos,
                    route: obj
                        .patrol_points
                        .iter()
                        .map(|p| Vec2::new(p.x, p.y))
                        .collect(),
                }),
                other => log::warn!("Ignoring unknown object type '{other}'"),
            }
        }
        self.player_spawn = player_spawn.unwrap_or(Vec2::ZERO);
        self.extraction = extraction.unwrap_or(Vec2::ZERO);
    }

    /// Round down to the containing tile's corner
    fn snap_to_grid(&self, p: Vec2) -> Vec2 {
        let size = self.tile_size as f32;
        (p / size).floor() * size
    }

    /// Pixel size of the whole map
    pub fn pixel_size(&self) -> Vec2 {
        let size = self.tile_size as f32;
        Vec2::new(self.width as f32 * size, self.height as f32 * size)
    }

    /// Whether `p` is inside a vent tile
    pub fn in_vent(&self, p: Vec2) -> bool {
        self.vents.iter().any(|v| v.rect.contains_point(p))
    }
}

/// Resolve a tile ID through the tileset ranges `[firstgid, firstgid + len)`
pub fn tile_info(tilesets: &[TilesetDef], tile_id: u32) -> Option<&TileDef> {
    tilesets.iter().find_map(|ts| {
        let offset = tile_id.checked_sub(ts.firstgid)?;
        ts.tiles.get(offset as usize)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: &str = include_str!("../levels/vault.json");

    fn tileset(firstgid: u32, kinds: &[&str]) -> TilesetDef {
        TilesetDef {
            firstgid,
            tiles: kinds
                .iter()
                .map(|k| TileDef {
                    kind: (*k).to_string(),
                    name: format!("{k}_tile"),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_tile_info_ranges() {
        let sets = [tileset(1, &["wall", "floor"]), tileset(10, &["vent"])];
        assert_eq!(tile_info(&sets, 1).map(|t| t.kind.as_str()), Some("wall"));
        assert_eq!(tile_info(&sets, 2).map(|t| t.kind.as_str()), Some("floor"));
        assert!(tile_info(&sets, 3).is_none());
        assert_eq!(tile_info(&sets, 10).map(|t| t.kind.as_str()), Some("vent"));
        assert!(tile_info(&sets, 11).is_none());
        assert!(tile_info(&sets, 0).is_none());
    }

    #[test]
    fn test_import_grid() {
        let file = LevelFile {
            width: 3,
            height: 2,
            tile_size: Some(16),
            layers: vec![LayerDef {
                name: "main".into(),
                data: vec![1, 0, 2, 0, 3, 99],
            }],
            tilesets: vec![tileset(1, &["wall", "floor", "mystery"])],
            objects: Vec::new(),
        };
        let level = Level::import(&file);
        assert_eq!(level.obstacles.len(), 1);
        assert_eq!(level.obstacles[0].rect, Rect::new(0.0, 0.0, 16.0, 16.0));
        assert_eq!(level.floors.len(), 1);
        assert_eq!(level.floors[0].rect.x, 32.0);
        assert_eq!(level.floors[0].name, "floor_tile");
        // Known entry, unsupported type
        assert_eq!(level.other.len(), 1);
        assert_eq!(level.other[0].rect.y, 16.0);
        // Tile 0 and unresolvable 99 create nothing
        let total = level.obstacles.len()
            + level.floors.len()
            + level.doors.len()
            + level.vents.len()
            + level.loot_tiles.len()
            + level.security.len()
            + level.other.len();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_untyped_tile_is_wall() {
        let json = r#"{
            "width": 2, "height": 1, "tilewidth": 16,
            "layers": [ { "name": "main", "data": [1, 1] } ],
            "tilesets": [ { "firstgid": 1, "tiles": [ { "name": "brick" } ] } ]
        }"#;
        let level = Level::from_json_str(json).unwrap();
        assert_eq!(level.obstacles.len(), 2);
        assert!(level.other.is_empty());
        assert_eq!(level.obstacles[1].rect, Rect::new(16.0, 0.0, 16.0, 16.0));
        // Unresolvable IDs stay skipped
        assert!(tile_info(&[tileset(1, &[""])], 2).is_none());
    }

    #[test]
    fn test_pixel_size_of_huge_level() {
        let level = Level {
            width: 400_000_000,
            height: 3,
            tile_size: 16,
            ..Default::default()
        };
        assert_eq!(level.pixel_size(), Vec2::new(6.4e9, 48.0));
    }

    #[test]
    fn test_short_layer_is_skipped_not_fatal() {
        let file = LevelFile {
            width: 4,
            height: 4,
            layers: vec![
                LayerDef {
                    name: "short".into(),
                    data: vec![1, 1],
                },
                LayerDef {
                    name: "empty".into(),
                    data: Vec::new(),
                },
            ],
            tilesets: vec![tileset(1, &["wall"])],
            ..Default::default()
        };
        let level = Level::import(&file);
        assert_eq!(level.obstacles.len(), 2);
        assert_eq!(level.tile_size, TILE_SIZE);
    }

    #[test]
    fn test_objects() {
        let json = r#"{
            "width": 2, "height": 2,
            "objects": [
                { "type": "player_spawn", "x": 37, "y": 20 },
                { "type": "guard_spawn", "x": 64, "y": 64,
                  "patrol_points": [ { "x": 64, "y": 64 }, { "x": 128, "y": 64 } ] },
                { "type": "guard_spawn", "x": 10, "y": 10 },
                { "type": "extraction", "x": 200, "y": 8 },
                { "type": "camera", "x": 1, "y": 1 }
            ]
        }"#;
        let level = Level::from_json_str(json).unwrap();
        assert_eq!(level.player_spawn, Vec2::new(32.0, 16.0));
        assert_eq!(level.extraction, Vec2::new(192.0, 0.0));
        assert_eq!(level.guard_spawns.len(), 2);
        assert_eq!(
            level.guard_spawns[0].route,
            vec![Vec2::new(64.0, 64.0), Vec2::new(128.0, 64.0)]
        );
        assert!(level.guard_spawns[1].route.is_empty());
        assert_eq!(level.guard_spawns[1].pos, Vec2::ZERO);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(Level::from_json_str("[1, 2"), Err(LevelError::Parse(_))));
        assert!(matches!(
            Level::load(Path::new("/nonexistent/level.json")),
            Err(LevelError::Io(_))
        ));
    }

    #[test]
    fn test_vault_level() {
        let level = Level::from_json_str(VAULT).unwrap();
        assert_eq!(level.width, 40);
        assert_eq!(level.height, 30);
        assert!(!level.obstacles.is_empty());
        assert!(!level.vents.is_empty());
        assert!(!level.loot_tiles.is_empty());
        assert_eq!(level.guard_spawns.len(), 2);
        assert!(level.guard_spawns.iter().all(|g| g.route.len() >= 2));
        // Spawns are on open floor
        let spawn_rect = Rect::from_center(level.player_spawn + Vec2::splat(8.0), Vec2::splat(12.0));
        assert!(level.obstacles.iter().all(|o| !o.rect.intersects(&spawn_rect)));
        assert!(level.in_vent(level.vents[0].rect.center()));
        assert_eq!(level.pixel_size(), Vec2::new(640.0, 480.0));
    }
}
