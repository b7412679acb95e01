//! Constrained random point sampling
//!
//! Draws a batch of uniformly distributed candidates inside a region (shrunk by
//! an optional edge margin) and accepts them in draw order while they keep their
//! distance from every point accepted so far.

use log::{debug, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::types::{Direction, Point};

/// Default number of candidates drawn per sampling call.
pub const DEFAULT_BATCH_SAMPLE_COUNT: usize = 1600;

/// Constraints for a [`RandomSampler`]. Every distance constraint is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// How many candidate points are drawn per call.
    pub batch_sample_count: usize,

    /// Minimum distance from the region edge on every side.
    pub min_distance_from_edge: Option<u32>,

    /// Minimum Euclidean distance from every accepted point.
    pub min_distance_from_others: Option<f32>,

    /// Minimum distance on *each* axis from every accepted point.
    pub min_distance_from_others_axis: Option<f32>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            batch_sample_count: DEFAULT_BATCH_SAMPLE_COUNT,
            min_distance_from_edge: None,
            min_distance_from_others: None,
            min_distance_from_others_axis: None,
        }
    }
}

/// Samples points and directions inside a `width x height` region
#[derive(Clone, Debug)]
pub struct RandomSampler {
    pub width: u32,
    pub height: u32,
    pub config: SamplerConfig,
}

impl RandomSampler {
    pub fn new(width: u32, height: u32, config: SamplerConfig) -> Self {
        Self {
            width,
            height,
            config,
        }
    }

    /// `count` independent, uniformly drawn cardinal directions.
    pub fn random_directions(&self, count: usize, rng: &mut ChaCha8Rng) -> Vec<Direction> {
        (0..count)
            .map(|_| Direction::from_index(rng.gen_range(0..4)))
            .collect()
    }

    /// Up to `count` points satisfying every configured constraint.
    ///
    /// Returns fewer points (and logs a warning) when the batch runs out first.
    pub fn random_points(&self, count: usize, rng: &mut ChaCha8Rng) -> Vec<Point> {
        let candidates = self.batch_candidates(rng);
        let mut accepted: Vec<Point> = Vec::with_capacity(count);

        if count == 0 {
            return accepted;
        }

        for candidate in candidates {
            if self.is_valid(candidate, &accepted) {
                accepted.push(candidate);
                if accepted.len() >= count {
                    return accepted;
                }
            }
        }

        warn!(
            "Only found {} of {} random points satisfying the sampler constraints",
            accepted.len(),
            count
        );
        accepted
    }

    /// Draw the unconstrained candidate batch inside the margin-shrunk region.
    fn batch_candidates(&self, rng: &mut ChaCha8Rng) -> Vec<Point> {
        let margin = self.config.min_distance_from_edge.unwrap_or(0) as i64;
        let range_x = self.width as i64 - margin * 2;
        let range_y = self.height as i64 - margin * 2;

        if range_x <= 0 || range_y <= 0 {
            debug!(
                "Sampler region {}x{} leaves no room inside edge margin {}",
                self.width, self.height, margin
            );
            return Vec::new();
        }

        let mut candidates = Vec::with_capacity(self.config.batch_sample_count);
        for _ in 0..self.config.batch_sample_count {
            let x = rng.gen_range(0..range_x) + margin;
            let y = rng.gen_range(0..range_y) + margin;
            candidates.push(Point::new(x as i32, y as i32));
        }

        candidates
    }

    fn is_valid(&self, candidate: Point, accepted: &[Point]) -> bool {
        if let Some(margin) = self.config.min_distance_from_edge {
            let (x, y, margin) = (candidate.x as i64, candidate.y as i64, margin as i64);
            if x < margin || y < margin {
                return false;
            }
            if x > self.width as i64 - margin || y > self.height as i64 - margin {
                return false;
            }
        }

        let min_distance = self.config.min_distance_from_others;
        let min_axis = self.config.min_distance_from_others_axis;

        accepted.iter().all(|&other| {
            if let Some(min) = min_distance {
                if candidate.distance(other) < min {
                    return false;
                }
            }
            if let Some(min) = min_axis {
                let dx = (candidate.x - other.x).abs() as f32;
                let dy = (candidate.y - other.y).abs() as f32;
                if dx < min || dy < min {
                    return false;
                }
            }
            true
        })
    }
}
