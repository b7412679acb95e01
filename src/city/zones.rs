//! Zone consolidation
//!
//! Partitions the cells left unclaimed after road placement into maximal
//! 4-connected zones using round-based breadth-first flood fill.

use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;

use super::types::{TileGrid, TileType};

/// Random draws allowed per requested zone before sampling gives up.
pub const DRAWS_PER_SAMPLE: usize = 32;

/// Zone identifier (0 = no zone, 1+ = zone index + 1)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

impl ZoneId {
    pub const NONE: ZoneId = ZoneId(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Position of this zone in the zone list.
    pub fn index(&self) -> Option<usize> {
        self.0.checked_sub(1).map(|i| i as usize)
    }

    pub fn from_index(index: usize) -> Self {
        ZoneId(index as u32 + 1)
    }
}

/// A fully grown zone
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    pub id: ZoneId,
    pub seed: (usize, usize),
    pub cells: Vec<(usize, usize)>,
    /// Bounding box (min_x, min_y, max_x, max_y), inclusive
    pub bounds: (usize, usize, usize, usize),
}

impl Zone {
    pub fn tile_count(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.bounds.2 - self.bounds.0 + 1
    }

    pub fn height(&self) -> usize {
        self.bounds.3 - self.bounds.1 + 1
    }
}

/// Zone-partitioning parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Zones to seed from random cells. Draws that land on a road or an
    /// existing zone do not count, up to `DRAWS_PER_SAMPLE` draws per zone.
    pub sample_count: usize,

    /// Seed a zone from every cell still unclaimed after the random draws.
    pub exhaustive: bool,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            sample_count: 64,
            exhaustive: true,
        }
    }
}

/// A zone being grown from a single seed cell.
///
/// Membership is recorded in a shared zone map, so a cell claimed by any zone is
/// never absorbed by another one.
#[derive(Clone, Debug)]
pub struct ZoneConsolidation {
    id: ZoneId,
    seed: (usize, usize),
    cells: Vec<(usize, usize)>,
    frontier: Vec<(usize, usize)>,
    unclaimed: TileType,
}

impl ZoneConsolidation {
    /// Start a zone at `seed`. Returns `None` when the seed cell is not the
    /// `unclaimed` tile type or already belongs to a zone.
    pub fn new(
        id: ZoneId,
        seed: (usize, usize),
        tiles: &TileGrid,
        zone_map: &mut Tilemap<ZoneId>,
        unclaimed: TileType,
    ) -> Option<Self> {
        let (x, y) = seed;
        if x >= tiles.width || y >= tiles.height {
            return None;
        }
        if *tiles.get(x, y) != unclaimed || !zone_map.get(x, y).is_none() {
            return None;
        }

        zone_map.set(x, y, id);
        Some(Self {
            id,
            seed,
            cells: vec![seed],
            frontier: vec![seed],
            unclaimed,
        })
    }

    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Absorb every unclaimed neighbor of the current frontier.
    ///
    /// The newly absorbed cells become the next frontier. Returns `true` while
    /// there is still something left to expand.
    pub fn expand_round(&mut self, tiles: &TileGrid, zone_map: &mut Tilemap<ZoneId>) -> bool {
        let mut next = Vec::new();

        for &(x, y) in &self.frontier {
            for (nx, ny) in tiles.neighbors(x, y) {
                if *tiles.get(nx, ny) != self.unclaimed || !zone_map.get(nx, ny).is_none() {
                    continue;
                }
                zone_map.set(nx, ny, self.id);
                self.cells.push((nx, ny));
                next.push((nx, ny));
            }
        }

        self.frontier = next;
        !self.frontier.is_empty()
    }

    /// Expand until the frontier is exhausted and return the finished zone.
    pub fn grow(mut self, tiles: &TileGrid, zone_map: &mut Tilemap<ZoneId>) -> Zone {
        let mut rounds = 0;
        while self.expand_round(tiles, zone_map) {
            rounds += 1;
        }

        let mut bounds = (usize::MAX, usize::MAX, 0, 0);
        for &(x, y) in &self.cells {
            bounds.0 = bounds.0.min(x);
            bounds.1 = bounds.1.min(y);
            bounds.2 = bounds.2.max(x);
            bounds.3 = bounds.3.max(y);
        }

        debug!(
            "Zone {} grew to {} cells in {} rounds",
            self.id.0,
            self.cells.len(),
            rounds
        );

        Zone {
            id: self.id,
            seed: self.seed,
            cells: self.cells,
            bounds,
        }
    }
}

/// Discover zones over every cell of type `unclaimed`.
///
/// Draws random cells until `config.sample_count` of them have seeded a zone.
/// A draw seeds and fully grows a new zone when it lands on an unclaimed cell
/// outside every known zone. Sampling also stops once every unclaimed cell is
/// zoned or the draw budget runs out. With `config.exhaustive`, a row-major
/// sweep then seeds zones from whatever unclaimed cells remain.
pub fn partition_zones(
    tiles: &TileGrid,
    unclaimed: TileType,
    config: &ZoneConfig,
    rng: &mut ChaCha8Rng,
) -> (Tilemap<ZoneId>, Vec<Zone>) {
    let mut zone_map = Tilemap::new_with(tiles.width, tiles.height, ZoneId::NONE);
    let mut zones = Vec::new();

    if tiles.is_empty() {
        return (zone_map, zones);
    }

    let max_draws = config.sample_count.saturating_mul(DRAWS_PER_SAMPLE);
    let mut remaining = tiles.count_where(|&t| t == unclaimed);
    let mut draws = 0;
    let mut rejected = 0;
    while zones.len() < config.sample_count && remaining > 0 && draws < max_draws {
        draws += 1;
        let seed = (rng.gen_range(0..tiles.width), rng.gen_range(0..tiles.height));
        let id = ZoneId::from_index(zones.len());
        match ZoneConsolidation::new(id, seed, tiles, &mut zone_map, unclaimed) {
            Some(zone) => {
                let zone = zone.grow(tiles, &mut zone_map);
                remaining -= zone.tile_count();
                zones.push(zone);
            }
            None => rejected += 1,
        }
    }
    debug!(
        "Zone sampling found {} zones ({} draws rejected)",
        zones.len(),
        rejected
    );

    if config.exhaustive {
        for y in 0..tiles.height {
            for x in 0..tiles.width {
                let id = ZoneId::from_index(zones.len());
                if let Some(zone) = ZoneConsolidation::new(id, (x, y), tiles, &mut zone_map, unclaimed) {
                    zones.push(zone.grow(tiles, &mut zone_map));
                }
            }
        }
    }

    (zone_map, zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    /// 10x10 grass with a full-height road column at x = 5.
    fn split_grid() -> TileGrid {
        let mut tiles: TileGrid = Tilemap::new(10, 10);
        for y in 0..10 {
            tiles.set(5, y, TileType::Road);
        }
        tiles
    }

    #[test]
    fn test_road_column_splits_grid_into_two_zones() {
        let tiles = split_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (zone_map, zones) = partition_zones(&tiles, TileType::Grass, &ZoneConfig::default(), &mut rng);

        let mut sizes: Vec<usize> = zones.iter().map(Zone::tile_count).collect();
        sizes.sort();
        assert_eq!(sizes, vec![40, 50]);

        // No wrap-around between x = 0 and x = 9
        assert_ne!(zone_map.get(0, 3), zone_map.get(9, 3));
        assert!(zone_map.get(5, 3).is_none());
    }

    #[test]
    fn test_seed_on_claimed_cell_is_rejected() {
        let tiles = split_grid();
        let mut zone_map = Tilemap::new_with(10, 10, ZoneId::NONE);

        assert!(ZoneConsolidation::new(ZoneId(1), (5, 2), &tiles, &mut zone_map, TileType::Grass).is_none());
        assert!(ZoneConsolidation::new(ZoneId(1), (10, 2), &tiles, &mut zone_map, TileType::Grass).is_none());

        let zone = ZoneConsolidation::new(ZoneId(1), (1, 1), &tiles, &mut zone_map, TileType::Grass)
            .map(|z| z.grow(&tiles, &mut zone_map));
        assert!(zone.is_some());
        assert!(ZoneConsolidation::new(ZoneId(2), (3, 3), &tiles, &mut zone_map, TileType::Grass).is_none());
    }

    #[test]
    fn test_expand_round_grows_one_ring_at_a_time() {
        let tiles: TileGrid = Tilemap::new(7, 7);
        let mut zone_map = Tilemap::new_with(7, 7, ZoneId::NONE);
        let mut zone = ZoneConsolidation::new(ZoneId(1), (3, 3), &tiles, &mut zone_map, TileType::Grass)
            .expect("seed is grass");

        assert!(zone.expand_round(&tiles, &mut zone_map));
        assert_eq!(zone.cells().len(), 5);
        assert!(zone.expand_round(&tiles, &mut zone_map));
        assert_eq!(zone.cells().len(), 13);

        let zone = zone.grow(&tiles, &mut zone_map);
        assert_eq!(zone.tile_count(), 49);
        assert_eq!(zone.bounds, (0, 0, 6, 6));
        assert_eq!((zone.width(), zone.height()), (7, 7));
    }

    #[test]
    fn test_zones_are_connected() {
        let mut tiles: TileGrid = Tilemap::new(16, 16);
        for i in 0..16 {
            tiles.set(i, 8, TileType::Road);
            tiles.set(8, i, TileType::Road);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let (zone_map, zones) = partition_zones(&tiles, TileType::Grass, &ZoneConfig::default(), &mut rng);

        assert_eq!(zones.len(), 4);
        for zone in &zones {
            let members: HashSet<(usize, usize)> = zone.cells.iter().copied().collect();
            let mut seen = HashSet::from([zone.seed]);
            let mut queue = VecDeque::from([zone.seed]);
            while let Some((x, y)) = queue.pop_front() {
                for n in tiles.neighbors(x, y) {
                    if members.contains(&n) && seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
            assert_eq!(seen.len(), members.len());
            assert!(zone.cells.iter().all(|&(x, y)| *zone_map.get(x, y) == zone.id));
        }
    }

    #[test]
    fn test_without_sweep_only_sampled_zones_exist() {
        let tiles = split_grid();
        let config = ZoneConfig {
            sample_count: 0,
            exhaustive: false,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let (zone_map, zones) = partition_zones(&tiles, TileType::Grass, &config, &mut rng);

        assert!(zones.is_empty());
        assert_eq!(zone_map.count_where(|id| !id.is_none()), 0);
    }

    #[test]
    fn test_rejected_draws_do_not_count_as_samples() {
        let tiles = split_grid();
        let config = ZoneConfig {
            sample_count: 2,
            exhaustive: false,
        };

        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (_, zones) = partition_zones(&tiles, TileType::Grass, &config, &mut rng);

            let mut sizes: Vec<usize> = zones.iter().map(Zone::tile_count).collect();
            sizes.sort();
            assert_eq!(sizes, vec![40, 50], "seed {seed}");
        }
    }

    #[test]
    fn test_sampling_stops_when_no_cells_remain() {
        let tiles = split_grid();
        let config = ZoneConfig {
            sample_count: 1000,
            exhaustive: false,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let (zone_map, zones) = partition_zones(&tiles, TileType::Grass, &config, &mut rng);

        assert_eq!(zones.len(), 2);
        assert_eq!(zone_map.count_where(|id| !id.is_none()), 90);

        let all_road: TileGrid = Tilemap::new_with(4, 4, TileType::Road);
        let (_, zones) = partition_zones(&all_road, TileType::Grass, &config, &mut rng);
        assert!(zones.is_empty());
    }
}
