//! ASCII rendering and export module for city maps
//!
//! Renders one character per cell and one row per line, for visual inspection
//! of a generated map.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::city::{GenerationData, TileGrid, TileType, ZoneId};
use crate::tilemap::Tilemap;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AsciiMode {
    /// Show tile characters
    Tiles,
    /// Show one symbol per zone, roads as `#`
    Zones,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Tiles => "Tiles",
            AsciiMode::Zones => "Zones",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Tiles, AsciiMode::Zones]
    }
}

/// Get ASCII character for a tile
pub fn tile_char(tile: TileType) -> char {
    match tile {
        TileType::Grass => '_',
        TileType::Sidewalk => '-',
        TileType::Road => 'x',
        TileType::Concrete => 'O',
    }
}

const ZONE_SYMBOLS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Get ASCII character for a zone. Symbols repeat after 62 zones.
pub fn zone_char(id: ZoneId) -> char {
    match id.index() {
        Some(i) => ZONE_SYMBOLS[i % ZONE_SYMBOLS.len()] as char,
        None => '#',
    }
}

/// Render the tile grid, one row per line.
pub fn render_tiles(tiles: &TileGrid) -> String {
    let mut out = String::with_capacity((tiles.width + 1) * tiles.height);
    for y in 0..tiles.height {
        for x in 0..tiles.width {
            out.push(tile_char(*tiles.get(x, y)));
        }
        out.push('\n');
    }
    out
}

/// Render zone membership, one row per line.
pub fn render_zones(zone_map: &Tilemap<ZoneId>) -> String {
    let mut out = String::with_capacity((zone_map.width + 1) * zone_map.height);
    for y in 0..zone_map.height {
        for x in 0..zone_map.width {
            out.push(zone_char(*zone_map.get(x, y)));
        }
        out.push('\n');
    }
    out
}

pub fn render_ascii_map(data: &GenerationData, mode: AsciiMode) -> String {
    match mode {
        AsciiMode::Tiles => render_tiles(&data.tiles),
        AsciiMode::Zones => render_zones(&data.zone_map),
    }
}

/// Generate tile legend
pub fn tile_legend() -> String {
    let mut legend = String::from("=== TILE LEGEND ===\n");
    for &tile in TileType::all() {
        legend.push_str(&format!("  {} {}\n", tile_char(tile), tile.display_name()));
    }
    legend
}

/// Calculate tile statistics
pub fn calculate_tile_stats(tiles: &TileGrid) -> HashMap<TileType, usize> {
    let mut stats = HashMap::new();
    for (_, _, &tile) in tiles.iter() {
        *stats.entry(tile).or_insert(0) += 1;
    }
    stats
}

/// Export a generated map to a text report
pub fn export_map_file(data: &GenerationData, name: &str, seed: u64, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    let width = data.tiles.width;
    let height = data.tiles.height;
    let total = width * height;

    // Header
    writeln!(file, "=== CITY GENERATOR MAP FILE ===")?;
    writeln!(file, "Name: {}", name)?;
    writeln!(file, "Seed: {}", seed)?;
    writeln!(file, "Size: {}x{}", width, height)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for &mode in AsciiMode::all() {
        writeln!(file, "=== MAP ({} View) ===", mode.name())?;
        write!(file, "{}", render_ascii_map(data, mode))?;
        writeln!(file)?;
    }

    write!(file, "{}", tile_legend())?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Total tiles: {}", total)?;
    let stats = calculate_tile_stats(&data.tiles);
    for &tile in TileType::all() {
        let count = stats.get(&tile).copied().unwrap_or(0);
        let pct = 100.0 * count as f64 / total.max(1) as f64;
        writeln!(file, "  {:10} {} {:>8} ({:>5.1}%)", tile.display_name(), tile_char(tile), count, pct)?;
    }
    writeln!(file, "Road segments: {}", data.main_road_segments.len())?;
    writeln!(file, "Zones: {}", data.zones.len())?;
    if let Some(largest) = data.zones.iter().max_by_key(|z| z.tile_count()) {
        writeln!(
            file,
            "  Largest: {} cells ({}x{} bounds)",
            largest.tile_count(),
            largest.width(),
            largest.height()
        )?;
    }

    Ok(())
}
