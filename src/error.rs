//! Error types for city generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable generation configuration. These are the only errors
/// that stop a run, and they are raised before any grid is allocated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("map dimensions must be positive and fit in i32 coordinates, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("main road width must be between 1 and {max}, got {width}")]
    InvalidRoadWidth { width: usize, max: usize },
    #[error("sampler batch sample count must be at least 1")]
    EmptySamplerBatch,
    #[error("sampler constraint `{name}` must be a finite, non-negative distance, got {value}")]
    InvalidDistance { name: &'static str, value: f32 },
    #[error("road tile type must differ from the default tile type ({0:?})")]
    RoadTileIsDefault(crate::city::TileType),
    #[error("failed to parse city config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read city config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
