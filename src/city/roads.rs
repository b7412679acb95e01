//! Main road generation
//!
//! Seeds square road segments at sampled points, branches each seed into a
//! T junction, grows every segment until it meets the map edge or an earlier
//! road, and stamps the final footprints into the tile grid.

use log::{debug, warn};
use rand_chacha::ChaCha8Rng;

use super::config::CityConfig;
use super::sampler::RandomSampler;
use super::types::{Direction, MapArea, Point, RoadSegment, TileGrid, TileType};

/// Sample, branch and grow the main road network.
pub fn generate_main_roads(config: &CityConfig, rng: &mut ChaCha8Rng) -> Vec<RoadSegment> {
    // Validated configs fit in i32; saturate rather than wrap otherwise
    let width = i32::try_from(config.width).unwrap_or(i32::MAX);
    let height = i32::try_from(config.height).unwrap_or(i32::MAX);
    let road_width = i32::try_from(config.main_road_width).unwrap_or(i32::MAX);

    let sampler = RandomSampler::new(
        width as u32,
        height as u32,
        config.main_roads_sampler.clone(),
    );
    let points = sampler.random_points(config.num_main_road_points, rng);
    let directions = sampler.random_directions(config.num_main_road_points, rng);
    let seeds: Vec<(Point, Direction)> = points.into_iter().zip(directions).collect();

    grow_segments(&seeds, road_width, Point::new(width, height), rng)
}

/// Branch and grow a road from every seed, in order.
///
/// Segments are grown in creation order (seed, then its two branches, then the
/// next seed) and every already grown segment is an obstacle for the ones after it.
/// A segment with no room to grow keeps its square footprint.
pub fn grow_segments(
    seeds: &[(Point, Direction)],
    road_width: i32,
    map_size: Point,
    rng: &mut ChaCha8Rng,
) -> Vec<RoadSegment> {
    let mut grown: Vec<RoadSegment> = Vec::with_capacity(seeds.len() * 3);

    for &(point, direction) in seeds {
        let seed = RoadSegment::new(
            MapArea::from_corners(point, point + Point::new(road_width, road_width)),
            direction,
        );
        let [left, right] = seed.split_in_two(rng);

        for mut segment in [seed, left, right] {
            let length = segment.max_grow_length(&grown, map_size);
            if length > 0 {
                segment.resize(length);
            } else {
                warn!(
                    "Road segment at ({}, {}) facing {:?} cannot grow",
                    segment.area.top_left.x, segment.area.top_left.y, segment.direction
                );
            }
            grown.push(segment);
        }
    }

    debug!("Grew {} main road segments", grown.len());
    grown
}

/// Write every in-bounds cell covered by `segments` as `tile`.
///
/// Returns the number of cells written, counting overlaps once per segment.
pub fn stamp_segments(tiles: &mut TileGrid, segments: &[RoadSegment], tile: TileType) -> usize {
    let mut written = 0;
    for segment in segments {
        for cell in segment.area.all_positions() {
            if tiles.set_signed(cell.x, cell.y, tile) {
                written += 1;
            }
        }
    }
    written
}
