//! City map generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod city;
pub mod error;
pub mod export;
pub mod map_export;
pub mod tilemap;
