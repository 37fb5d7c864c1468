//! Geometry processing: validation, metadata and simplification in one call,
//! plus batch variants over region collections.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{GeoBoundaryError, Result};
use crate::functions::measurement::{
    area, bounding_box, centroid, coordinate_count, ring_count,
};
use crate::functions::simplify::{simplify_geometry, tolerance_for_zoom_with_config};
use crate::functions::validation::{validate_geometry_with_config, ValidationReport};
use crate::types::{BoundingBox, Coordinate, RawRegionRecord, RegionGeometry, RegionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    pub simplify: bool,
    /// Simplification tolerance in degrees.
    pub tolerance: f64,
    pub calculate_metadata: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            simplify: false,
            tolerance: 0.001,
            calculate_metadata: true,
        }
    }
}

impl ProcessOptions {
    /// Options that simplify for rendering at `zoom_level`.
    pub fn for_zoom(zoom_level: u8, config: &EngineConfig) -> Self {
        Self {
            simplify: true,
            tolerance: tolerance_for_zoom_with_config(zoom_level, &config.zoom),
            calculate_metadata: true,
        }
    }

    /// Reject a tolerance that is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        check_tolerance("tolerance", self.tolerance)
    }
}

pub(crate) fn check_tolerance(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GeoBoundaryError::InvalidInput(format!(
            "{name} must be a finite, non-negative number of degrees, got {value}"
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryMetadata {
    /// Square metres.
    pub area: f64,
    pub centroid: Coordinate,
    pub coordinate_count: usize,
    pub ring_count: usize,
}

impl Default for GeometryMetadata {
    fn default() -> Self {
        Self {
            area: 0.0,
            centroid: Coordinate::ORIGIN,
            coordinate_count: 0,
            ring_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedGeometry {
    pub original: RegionGeometry,
    pub simplified: Option<RegionGeometry>,
    pub bounding_box: BoundingBox,
    pub metadata: GeometryMetadata,
    pub validation: ValidationReport,
}

/// Validate, measure and optionally simplify a geometry.
///
/// Metadata is zeroed when validation finds errors or when
/// `calculate_metadata` is off; warnings alone do not suppress it.
/// Simplification only runs on valid input. Options with a negative or
/// non-finite tolerance are rejected with [`GeoBoundaryError::InvalidInput`].
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::processing::{process, ProcessOptions};
///
/// let g = geometry_from_geojson(
///     r#"{"type":"Polygon","coordinates":[[[-1,52],[0,52],[0,53],[-1,53],[-1,52]]]}"#,
/// ).unwrap();
/// let processed = process(&g, &ProcessOptions { simplify: true, ..Default::default() }).unwrap();
/// assert!(processed.validation.is_valid);
/// assert!(processed.metadata.area > 0.0);
/// assert!(processed.simplified.is_some());
///
/// let nan = ProcessOptions { tolerance: f64::NAN, ..Default::default() };
/// assert!(process(&g, &nan).is_err());
/// ```
pub fn process(geometry: &RegionGeometry, options: &ProcessOptions) -> Result<ProcessedGeometry> {
    process_with_config(geometry, options, &EngineConfig::default())
}

pub fn process_with_config(
    geometry: &RegionGeometry,
    options: &ProcessOptions,
    config: &EngineConfig,
) -> Result<ProcessedGeometry> {
    options.validate()?;
    Ok(process_validated(geometry, options, config))
}

fn process_validated(
    geometry: &RegionGeometry,
    options: &ProcessOptions,
    config: &EngineConfig,
) -> ProcessedGeometry {
    let validation = validate_geometry_with_config(geometry, &config.validation);

    let metadata = if options.calculate_metadata && validation.is_valid {
        GeometryMetadata {
            area: area(geometry),
            centroid: centroid(geometry),
            coordinate_count: coordinate_count(geometry),
            ring_count: ring_count(geometry),
        }
    } else {
        GeometryMetadata::default()
    };

    let simplified = (options.simplify && validation.is_valid)
        .then(|| simplify_geometry(geometry, options.tolerance));

    ProcessedGeometry {
        original: geometry.clone(),
        simplified,
        bounding_box: bounding_box(geometry).unwrap_or_default(),
        metadata,
        validation,
    }
}

/// Per-region batch outcome. `processed` is `None` when the region has no
/// usable geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub id: i64,
    pub processed: Option<ProcessedGeometry>,
}

/// Process every region in parallel, preserving input order. Regions without
/// geometry yield `None`; invalid geometry yields a result whose validation
/// report carries the errors. Invalid options fail the whole batch up front.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::processing::{batch_process_geometries, ProcessOptions};
/// use geoboundary_core::RegionRecord;
///
/// let out = batch_process_geometries(&[RegionRecord::new(7, None)], &ProcessOptions::default())
///     .unwrap();
/// assert_eq!(out[0].id, 7);
/// assert!(out[0].processed.is_none());
/// ```
pub fn batch_process_geometries(
    regions: &[RegionRecord],
    options: &ProcessOptions,
) -> Result<Vec<BatchEntry>> {
    batch_process_geometries_with_config(regions, options, &EngineConfig::default())
}

pub fn batch_process_geometries_with_config(
    regions: &[RegionRecord],
    options: &ProcessOptions,
    config: &EngineConfig,
) -> Result<Vec<BatchEntry>> {
    options.validate()?;
    debug!(regions = regions.len(), "batch processing geometries");
    let entries = regions
        .par_iter()
        .map(|region| BatchEntry {
            id: region.id,
            processed: region.geometry.as_ref().map(|geometry| {
                let processed = process_validated(geometry, options, config);
                log_invalid(region.id, &processed.validation);
                processed
            }),
        })
        .collect();
    Ok(entries)
}

/// Like [`batch_process_geometries`] for rows whose geometry column is still
/// raw JSON. Unparseable geometry is dropped (`None`) and logged.
pub fn batch_process_raw_geometries(
    regions: &[RawRegionRecord],
    options: &ProcessOptions,
    config: &EngineConfig,
) -> Result<Vec<BatchEntry>> {
    options.validate()?;
    debug!(regions = regions.len(), "batch processing raw geometries");
    let entries = regions
        .par_iter()
        .map(|region| {
            let geometry = region.geometry.as_ref().and_then(|raw| {
                RegionGeometry::deserialize(raw)
                    .map_err(|e| {
                        warn!(region_id = region.id, error = %e, "dropping unparseable geometry");
                    })
                    .ok()
            });
            BatchEntry {
                id: region.id,
                processed: geometry.map(|geometry| {
                    let processed = process_validated(&geometry, options, config);
                    log_invalid(region.id, &processed.validation);
                    processed
                }),
            }
        })
        .collect();
    Ok(entries)
}

fn log_invalid(region_id: i64, report: &ValidationReport) {
    if !report.is_valid {
        warn!(
            region_id,
            errors = ?report.errors,
            "invalid geometry; treating region as boundary-less"
        );
    }
}
