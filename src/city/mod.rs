//! Procedural city map generation
//!
//! Turns a map size and a [`CityConfig`] into a grid of typed tiles:
//!
//! 1. **Main roads**: seed points are sampled under distance constraints, each
//!    seed is split into a T junction and every segment grows until it reaches
//!    the map edge or an earlier road.
//! 2. **Zones**: the cells left over are flood-filled into contiguous zones.

pub mod config;
pub mod pipeline;
pub mod roads;
pub mod sampler;
pub mod types;
pub mod zones;

pub use config::CityConfig;
pub use pipeline::{generate_city, CityGenerator, GenerationData, GenerationStep};
pub use sampler::{RandomSampler, SamplerConfig};
pub use types::{Direction, MapArea, Point, RoadSegment, TileGrid, TileType};
pub use zones::{Zone, ZoneConfig, ZoneConsolidation, ZoneId};
