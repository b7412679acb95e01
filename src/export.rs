//! Raster export of generated city maps.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::city::{TileGrid, TileType, ZoneId};
use crate::tilemap::Tilemap;

/// Tile type to RGB color mapping used for raster output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilePalette {
    pub grass: [u8; 3],
    pub sidewalk: [u8; 3],
    pub road: [u8; 3],
    pub concrete: [u8; 3],
}

impl Default for TilePalette {
    fn default() -> Self {
        Self {
            grass: [0, 128, 0],        // Green
            sidewalk: [192, 192, 192], // Light gray
            road: [47, 79, 79],        // Dark slate gray
            concrete: [128, 128, 128], // Gray
        }
    }
}

impl TilePalette {
    pub fn color(&self, tile: TileType) -> [u8; 3] {
        match tile {
            TileType::Grass => self.grass,
            TileType::Sidewalk => self.sidewalk,
            TileType::Road => self.road,
            TileType::Concrete => self.concrete,
        }
    }
}

/// Render tiles one pixel per cell.
pub fn render_tile_image(tiles: &TileGrid, palette: &TilePalette) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(tiles.width as u32, tiles.height as u32);

    for (x, y, &tile) in tiles.iter() {
        img.put_pixel(x as u32, y as u32, Rgb(palette.color(tile)));
    }

    img
}

/// Export tiles as a PNG, one pixel per cell.
pub fn export_tile_map(tiles: &TileGrid, palette: &TilePalette, path: &Path) -> Result<(), image::ImageError> {
    render_tile_image(tiles, palette).save(path)
}

/// Export a zone map as a PNG. Each zone gets its own hue; cells outside any
/// zone are drawn with `background`.
pub fn export_zone_map(
    zone_map: &Tilemap<ZoneId>,
    background: [u8; 3],
    path: &Path,
) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(zone_map.width as u32, zone_map.height as u32);

    for (x, y, &id) in zone_map.iter() {
        let color = if id.is_none() { background } else { zone_color(id) };
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }

    img.save(path)
}

/// Distinct color per zone, stepping hue by the golden angle.
pub fn zone_color(id: ZoneId) -> [u8; 3] {
    let hue = (id.0 as f32 * 137.508) % 360.0;
    let value = if id.0 % 2 == 0 { 0.75 } else { 0.9 };
    let (r, g, b) = hsv_to_rgb(hue, 0.55, value);
    [r, g, b]
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let h = h % 360.0;
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}
