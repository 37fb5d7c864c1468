#![doc = include_str!("../../README.md")]
//! Crate-specific API surface for `geoboundary-core`.

pub mod config;
pub mod error;
pub mod functions;
pub mod types;

pub use config::EngineConfig;
pub use error::{GeoBoundaryError, Result};
pub use types::{
    BoundingBox, Coordinate, CoordinateRing, PolygonCoordinates, RawRegionRecord, RegionGeometry,
    RegionRecord,
};
