//! Block map export
//!
//! Converts a tile grid into the game's JSON map description: one floor block
//! per cell, each carrying six face texture ids. Tile types map to texture ids
//! through a [`TextureTable`].

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::city::{TileGrid, TileType};

/// Face order used by [`MapBlock::face_textures`].
pub const FACE_TOP: usize = 0;
pub const FACE_SIDE_X: usize = 2;
pub const FACE_SIDE_Z: usize = 4;

/// Tile type to texture id mapping (0 = untextured)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureTable {
    pub grass: i32,
    pub sidewalk: i32,
    pub road: i32,
    pub concrete: i32,
}

impl Default for TextureTable {
    fn default() -> Self {
        Self {
            grass: 1,
            sidewalk: 3,
            road: 2,
            concrete: 4,
        }
    }
}

impl TextureTable {
    pub fn texture(&self, tile: TileType) -> i32 {
        match tile {
            TileType::Grass => self.grass,
            TileType::Sidewalk => self.sidewalk,
            TileType::Road => self.road,
            TileType::Concrete => self.concrete,
        }
    }
}

/// A single map block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapBlock {
    pub position: [i32; 3],
    pub face_textures: [i32; 6],
}

/// The game's map description
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameMap {
    pub name: String,
    pub size: [i32; 3],
    pub blocks: Vec<MapBlock>,
}

/// Build a block map from tiles. Grid `(x, y)` becomes block position
/// `(x, 0, y)`; blocks on the map boundary also texture their outer side faces.
pub fn build_game_map(tiles: &TileGrid, textures: &TextureTable, name: &str, layers: i32) -> GameMap {
    let mut blocks = Vec::with_capacity(tiles.len());

    for (x, y, &tile) in tiles.iter() {
        let texture = textures.texture(tile);
        let mut faces = [0; 6];
        faces[FACE_TOP] = texture;

        if x == 0 || x == tiles.width - 1 {
            faces[FACE_SIDE_X] = texture;
        }
        if y == 0 || y == tiles.height - 1 {
            faces[FACE_SIDE_Z] = texture;
        }

        blocks.push(MapBlock {
            position: [x as i32, 0, y as i32],
            face_textures: faces,
        });
    }

    GameMap {
        name: name.to_string(),
        size: [tiles.width as i32, layers, tiles.height as i32],
        blocks,
    }
}

/// Write a block map as indented JSON.
pub fn export_game_map(map: &GameMap, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(map)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::Tilemap;

    #[test]
    fn test_blocks_follow_tiles() {
        let mut tiles: TileGrid = Tilemap::new(3, 3);
        tiles.set(1, 1, TileType::Road);
        let textures = TextureTable::default();

        let map = build_game_map(&tiles, &textures, "Test", 32);
        assert_eq!(map.blocks.len(), 9);
        assert_eq!(map.size, [3, 32, 3]);

        let centre = &map.blocks[4];
        assert_eq!(centre.position, [1, 0, 1]);
        assert_eq!(centre.face_textures, [2, 0, 0, 0, 0, 0]);

        let corner = &map.blocks[0];
        assert_eq!(corner.face_textures, [1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_json_uses_game_field_names() {
        let tiles: TileGrid = Tilemap::new(1, 1);
        let map = build_game_map(&tiles, &TextureTable::default(), "Tiny", 1);

        let json = serde_json::to_value(&map).expect("serializable");
        assert_eq!(json["Name"], "Tiny");
        assert_eq!(json["Blocks"][0]["FaceTextures"][0], 1);
        assert_eq!(json["Size"][1], 1);
    }
}
