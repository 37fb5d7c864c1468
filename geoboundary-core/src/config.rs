//! Tunable thresholds for validation and zoom-adaptive simplification.
//!
//! Defaults reproduce the UK deployment. A JSON document may override any
//! subset of fields:
//!
//! ```
//! use geoboundary_core::config::EngineConfig;
//!
//! let cfg = EngineConfig::from_json_str(r#"{"validation": {"envelope": null}}"#).unwrap();
//! assert!(cfg.validation.envelope.is_none());
//! assert_eq!(cfg.validation.large_coordinate_count, 10_000);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GeoBoundaryError, Result};
use crate::functions::processing::check_tolerance;
use crate::types::Coordinate;

/// Rectangular deployment envelope. Coordinates outside it raise warnings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Envelope {
    /// Great Britain and Northern Ireland with a small margin.
    pub const UK: Envelope = Envelope {
        min_lon: -8.5,
        max_lon: 2.0,
        min_lat: 49.5,
        max_lat: 61.0,
    };

    pub fn contains(&self, c: &Coordinate) -> bool {
        (self.min_lon..=self.max_lon).contains(&c.lon)
            && (self.min_lat..=self.max_lat).contains(&c.lat)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// `None` disables the envelope warning.
    pub envelope: Option<Envelope>,
    /// Coordinate count above which a performance warning is raised.
    pub large_coordinate_count: usize,
    /// Polygon area (m²) below which a precision warning is raised.
    pub small_area_m2: f64,
    /// Warn when a hole ring is not enclosed by its exterior ring.
    pub check_hole_containment: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            envelope: Some(Envelope::UK),
            large_coordinate_count: 10_000,
            small_area_m2: 1_000.0,
            check_hole_containment: true,
        }
    }
}

/// Linear zoom → tolerance mapping:
/// `max(min_tolerance, (reference_zoom - zoom) * degrees_per_zoom)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomToleranceConfig {
    pub reference_zoom: f64,
    pub degrees_per_zoom: f64,
    pub min_tolerance: f64,
}

impl Default for ZoomToleranceConfig {
    fn default() -> Self {
        Self {
            reference_zoom: 15.0,
            degrees_per_zoom: 0.001,
            min_tolerance: 0.0001,
        }
    }
}

impl ZoomToleranceConfig {
    /// Every field must be finite and the degree quantities non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.reference_zoom.is_finite() {
            return Err(GeoBoundaryError::InvalidInput(format!(
                "reference_zoom must be finite, got {}",
                self.reference_zoom
            )));
        }
        check_tolerance("degrees_per_zoom", self.degrees_per_zoom)?;
        check_tolerance("min_tolerance", self.min_tolerance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub validation: ValidationConfig,
    pub zoom: ZoomToleranceConfig,
}

impl EngineConfig {
    /// Parse a JSON configuration document; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.zoom.validate()?;
        Ok(config)
    }
}
