//! Generation pipeline
//!
//! A run owns one [`GenerationData`], created from the validated config, and
//! moves it through an ordered list of [`GenerationStep`]s. Every step takes the
//! data by value and hands it back, so nothing else can observe the grid while
//! the run is in progress.

use std::time::{Duration, Instant};

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::ConfigError;
use crate::tilemap::Tilemap;

use super::config::CityConfig;
use super::roads::{generate_main_roads, stamp_segments};
use super::types::{RoadSegment, TileGrid};
use super::zones::{partition_zones, Zone, ZoneId};

/// Mutable state threaded through the pipeline
#[derive(Clone, Debug)]
pub struct GenerationData {
    pub tiles: TileGrid,
    pub main_road_segments: Vec<RoadSegment>,
    pub zone_map: Tilemap<ZoneId>,
    pub zones: Vec<Zone>,
    /// Name and duration of every step applied so far, in order.
    pub step_timings: Vec<(&'static str, Duration)>,
}

impl GenerationData {
    /// Fresh state with every cell set to the config's default tile.
    pub fn new(config: &CityConfig) -> Self {
        Self {
            tiles: Tilemap::new_with(config.width, config.height, config.default_tile),
            main_road_segments: Vec::new(),
            zone_map: Tilemap::new_with(config.width, config.height, ZoneId::NONE),
            zones: Vec::new(),
            step_timings: Vec::new(),
        }
    }

    /// Zone containing a cell, if any.
    pub fn zone_at(&self, x: usize, y: usize) -> Option<&Zone> {
        self.zone_map.get(x, y).index().and_then(|i| self.zones.get(i))
    }
}

/// One stage of city generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationStep {
    /// Sample, split and grow the main roads, then stamp them into the grid.
    MainRoads,
    /// Flood-fill every remaining default-tile cell into zones.
    Zones,
}

impl GenerationStep {
    /// Roads first: zones are defined as whatever is not road.
    pub const DEFAULT_STEPS: [GenerationStep; 2] = [GenerationStep::MainRoads, GenerationStep::Zones];

    pub fn name(&self) -> &'static str {
        match self {
            GenerationStep::MainRoads => "Generate Main Roads",
            GenerationStep::Zones => "Partition Zones",
        }
    }

    pub fn process(
        &self,
        mut data: GenerationData,
        config: &CityConfig,
        rng: &mut ChaCha8Rng,
    ) -> GenerationData {
        match self {
            GenerationStep::MainRoads => {
                let segments = generate_main_roads(config, rng);
                let written = stamp_segments(&mut data.tiles, &segments, config.road_tile);
                info!("Placed {} road segments covering {} cells", segments.len(), written);
                data.main_road_segments = segments;
            }
            GenerationStep::Zones => {
                let (zone_map, zones) = partition_zones(&data.tiles, config.default_tile, &config.zones, rng);
                info!("Partitioned free space into {} zones", zones.len());
                data.zone_map = zone_map;
                data.zones = zones;
            }
        }
        data
    }
}

/// Runs generation steps over a validated config
#[derive(Clone, Debug)]
pub struct CityGenerator {
    config: CityConfig,
}

impl CityGenerator {
    /// Validate `config`. Fails before anything is allocated.
    pub fn new(config: CityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    /// Apply `steps` in order to a freshly initialised grid.
    ///
    /// All randomness comes from one `ChaCha8Rng` seeded with `seed`, so equal
    /// seeds and configs give identical output.
    pub fn generate(&self, steps: &[GenerationStep], seed: u64) -> GenerationData {
        let start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut data = GenerationData::new(&self.config);

        for step in steps {
            let step_start = Instant::now();
            data = step.process(data, &self.config, &mut rng);
            let elapsed = step_start.elapsed();
            info!("Step '{}' took {:.2?}", step.name(), elapsed);
            data.step_timings.push((step.name(), elapsed));
        }

        info!("City generation took {:.2?}", start.elapsed());
        data
    }

    /// Roads followed by zones.
    pub fn generate_default(&self, seed: u64) -> GenerationData {
        self.generate(&GenerationStep::DEFAULT_STEPS, seed)
    }
}

/// Validate `config` and run the default steps with `seed`.
pub fn generate_city(config: CityConfig, seed: u64) -> Result<GenerationData, ConfigError> {
    Ok(CityGenerator::new(config)?.generate_default(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::types::TileType;

    fn small_config() -> CityConfig {
        CityConfig {
            width: 80,
            height: 60,
            num_main_road_points: 4,
            main_road_width: 3,
            ..CityConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_fails_before_generation() {
        let config = CityConfig {
            height: 0,
            ..CityConfig::default()
        };
        assert!(matches!(
            generate_city(config, 1),
            Err(ConfigError::InvalidDimensions { height: 0, .. })
        ));
    }

    #[test]
    fn test_grid_has_every_cell() {
        let data = generate_city(small_config(), 3).expect("valid config");
        assert_eq!(data.tiles.width, 80);
        assert_eq!(data.tiles.height, 60);
        assert_eq!(data.tiles.len(), 80 * 60);
        assert_eq!(data.tiles.iter().count(), 80 * 60);
    }

    #[test]
    fn test_same_seed_gives_identical_grids() {
        let generator = CityGenerator::new(small_config()).expect("valid config");

        let a = generator.generate_default(1234);
        let b = generator.generate_default(1234);
        assert_eq!(a.tiles, b.tiles);
        assert_eq!(a.main_road_segments, b.main_road_segments);
        assert_eq!(a.zone_map, b.zone_map);
        assert_eq!(a.zones, b.zones);
    }

    #[test]
    fn test_roads_and_zones_partition_the_grid() {
        for seed in [1, 2, 3, 99] {
            let data = generate_city(small_config(), seed).expect("valid config");

            let road_cells = data.tiles.count_where(|&t| t == TileType::Road);
            let zone_cells: usize = data.zones.iter().map(Zone::tile_count).sum();
            assert_eq!(road_cells + zone_cells, data.tiles.len());

            for (x, y, &tile) in data.tiles.iter() {
                let zone = *data.zone_map.get(x, y);
                assert_eq!(tile == TileType::Road, zone.is_none(), "cell ({x}, {y})");
                if let Some(z) = data.zone_at(x, y) {
                    assert_eq!(z.id, zone);
                }
            }
        }
    }

    #[test]
    fn test_steps_run_in_order() {
        let generator = CityGenerator::new(small_config()).expect("valid config");

        let data = generator.generate_default(8);
        let names: Vec<&str> = data.step_timings.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["Generate Main Roads", "Partition Zones"]);

        // Without the road step the whole grid is one zone
        let zones_only = generator.generate(&[GenerationStep::Zones], 8);
        assert_eq!(zones_only.zones.len(), 1);
        assert_eq!(zones_only.zones[0].tile_count(), 80 * 60);
        assert!(zones_only.main_road_segments.is_empty());
    }

    #[test]
    fn test_empty_pipeline_leaves_default_grid() {
        let generator = CityGenerator::new(small_config()).expect("valid config");
        let data = generator.generate(&[], 5);

        assert_eq!(data.tiles.count_where(|&t| t == TileType::Grass), 80 * 60);
        assert!(data.step_timings.is_empty());
    }
}
