//! Configuration for city generation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::export::TilePalette;
use crate::map_export::TextureTable;

use super::sampler::SamplerConfig;
use super::types::TileType;
use super::zones::ZoneConfig;

/// Largest width, height or road width accepted. Grid coordinates are `i32`.
pub const MAX_DIMENSION: usize = i32::MAX as usize;

/// Immutable per-run configuration for city generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Base name for exported files.
    pub map_name: String,

    /// Directory exported files are written to.
    pub output_dir: PathBuf,

    /// Map width in cells.
    pub width: usize,

    /// Map height in cells.
    pub height: usize,

    /// Tile every cell starts as. Zones are grown over this type.
    pub default_tile: TileType,

    /// Tile written under road footprints.
    pub road_tile: TileType,

    /// Number of seed points requested for main roads.
    pub num_main_road_points: usize,

    /// Width in cells of every main road.
    pub main_road_width: usize,

    /// Constraints for main road seed points.
    pub main_roads_sampler: SamplerConfig,

    /// Zone partitioning parameters.
    pub zones: ZoneConfig,

    /// Tile colors for raster export.
    pub palette: TilePalette,

    /// Tile texture ids for block map export.
    pub textures: TextureTable,

    /// Vertical extent recorded in exported block maps.
    pub map_layers: i32,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            map_name: "city".to_string(),
            output_dir: PathBuf::from("."),
            width: 128,
            height: 128,
            default_tile: TileType::Grass,
            road_tile: TileType::Road,
            num_main_road_points: 6,
            main_road_width: 4,
            main_roads_sampler: SamplerConfig {
                min_distance_from_edge: Some(12),
                min_distance_from_others_axis: Some(24.0),
                ..SamplerConfig::default()
            },
            zones: ZoneConfig::default(),
            palette: TilePalette::default(),
            textures: TextureTable::default(),
            map_layers: 32,
        }
    }
}

impl CityConfig {
    /// Check every parameter a run depends on.
    ///
    /// A config that passes can be allocated as a grid and addressed with `i32`
    /// coordinates without overflow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dimensions_ok = (1..=MAX_DIMENSION).contains(&self.width)
            && (1..=MAX_DIMENSION).contains(&self.height)
            && self.width.checked_mul(self.height).is_some();
        if !dimensions_ok {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(1..=MAX_DIMENSION).contains(&self.main_road_width) {
            return Err(ConfigError::InvalidRoadWidth {
                width: self.main_road_width,
                max: MAX_DIMENSION,
            });
        }
        if self.main_roads_sampler.batch_sample_count == 0 {
            return Err(ConfigError::EmptySamplerBatch);
        }

        let distances = [
            ("min_distance_from_others", self.main_roads_sampler.min_distance_from_others),
            ("min_distance_from_others_axis", self.main_roads_sampler.min_distance_from_others_axis),
        ];
        for (name, value) in distances {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidDistance { name, value });
                }
            }
        }

        if self.road_tile == self.default_tile {
            return Err(ConfigError::RoadTileIsDefault(self.default_tile));
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Path for an exported artifact, e.g. `<output_dir>/<map_name>-output.png`.
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}-{}", self.map_name, suffix))
    }
}
