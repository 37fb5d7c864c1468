//! Structural validation of boundary geometry.
//!
//! Validation is total: problems are returned as data in a
//! [`ValidationReport`] and never as an `Err`. Every check runs, so one call
//! reports everything wrong with the input. Errors make the geometry
//! unusable; warnings are data-quality notes for the caller to log.

use geo::Contains;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::functions::measurement::{
    area, bounding_box, centroid, coordinate_count, ring_count,
};
use crate::functions::primitives::{
    has_consecutive_duplicates, is_closed_ring, is_valid_latitude, is_valid_longitude,
    MIN_RING_COORDINATES,
};
use crate::types::{ring_to_geo, BoundingBox, Coordinate, CoordinateRing, RegionGeometry};

/// Message recorded when the input is not a Polygon or MultiPolygon.
pub const INVALID_STRUCTURE: &str = "Invalid GeoJSON structure";

/// Metrics computed for structurally sound geometry.
///
/// `area` and `centroid` are only filled in for single Polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetadata {
    pub area: Option<f64>,
    pub centroid: Option<Coordinate>,
    pub bounding_box: BoundingBox,
    pub coordinate_count: usize,
    pub ring_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub metadata: Option<ValidationMetadata>,
}

/// A single outcome of a check.
#[derive(Debug, Clone, PartialEq)]
enum Finding {
    Error(String),
    Warning(String),
}

impl ValidationReport {
    fn from_findings(findings: Vec<Finding>, metadata: Option<ValidationMetadata>) -> Self {
        let (errors, warnings) = findings.into_iter().fold(
            (Vec::new(), Vec::new()),
            |(mut errors, mut warnings), finding| {
                match finding {
                    Finding::Error(msg) => errors.push(msg),
                    Finding::Warning(msg) => warnings.push(msg),
                }
                (errors, warnings)
            },
        );
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            metadata,
        }
    }
}

/// Validate a raw GeoJSON geometry value with the default configuration.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::validation::validate;
/// use serde_json::json;
///
/// let report = validate(&json!({
///     "type": "Polygon",
///     "coordinates": [[[-2.0, 50.0], [1.0, 50.0]]]
/// }));
/// assert!(!report.is_valid);
/// assert!(report.errors.iter().any(|e| e.contains("insufficient points")));
/// assert!(report.errors.iter().any(|e| e.contains("not closed")));
/// ```
pub fn validate(raw: &Value) -> ValidationReport {
    validate_with_config(raw, &ValidationConfig::default())
}

pub fn validate_with_config(raw: &Value, config: &ValidationConfig) -> ValidationReport {
    match RegionGeometry::deserialize(raw) {
        Ok(geometry) => validate_geometry_with_config(&geometry, config),
        Err(e) => {
            debug!(error = %e, "rejecting geometry with unrecognised structure");
            ValidationReport::from_findings(
                vec![Finding::Error(INVALID_STRUCTURE.to_string())],
                None,
            )
        }
    }
}

/// Validate an already-typed geometry with the default configuration.
pub fn validate_geometry(geometry: &RegionGeometry) -> ValidationReport {
    validate_geometry_with_config(geometry, &ValidationConfig::default())
}

pub fn validate_geometry_with_config(
    geometry: &RegionGeometry,
    config: &ValidationConfig,
) -> ValidationReport {
    let mut findings = ring_presence_findings(geometry);
    for (label, ring) in labelled_rings(geometry) {
        findings.extend(ring_findings(&label, ring, config));
    }

    let structurally_sound = !findings.iter().any(|f| matches!(f, Finding::Error(_)));
    let metadata = if structurally_sound {
        if config.check_hole_containment {
            findings.extend(hole_containment_findings(geometry));
        }
        let metadata = compute_metadata(geometry);
        findings.extend(size_findings(&metadata, config));
        Some(metadata)
    } else {
        None
    };

    ValidationReport::from_findings(findings, metadata)
}

fn ring_presence_findings(geometry: &RegionGeometry) -> Vec<Finding> {
    match geometry {
        RegionGeometry::Polygon { coordinates } if coordinates.is_empty() => {
            vec![Finding::Error(
                "Polygon must contain at least one coordinate ring".to_string(),
            )]
        }
        RegionGeometry::Polygon { .. } => Vec::new(),
        RegionGeometry::MultiPolygon { coordinates } if coordinates.is_empty() => {
            vec![Finding::Error(
                "MultiPolygon must contain at least one polygon".to_string(),
            )]
        }
        RegionGeometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .enumerate()
            .filter(|(_, polygon)| polygon.is_empty())
            .map(|(p, _)| {
                Finding::Error(format!(
                    "Polygon {p} must contain at least one coordinate ring"
                ))
            })
            .collect(),
    }
}

/// Rings paired with a human-readable location ("Ring 1", "Polygon 0 ring 2").
fn labelled_rings(geometry: &RegionGeometry) -> Vec<(String, &CoordinateRing)> {
    match geometry {
        RegionGeometry::Polygon { coordinates } => coordinates
            .iter()
            .enumerate()
            .map(|(r, ring)| (format!("Ring {r}"), ring))
            .collect(),
        RegionGeometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .enumerate()
            .flat_map(|(p, polygon)| {
                polygon
                    .iter()
                    .enumerate()
                    .map(move |(r, ring)| (format!("Polygon {p} ring {r}"), ring))
            })
            .collect(),
    }
}

fn ring_findings(label: &str, ring: &CoordinateRing, config: &ValidationConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    if ring.len() < MIN_RING_COORDINATES {
        findings.push(Finding::Error(format!(
            "{label} has insufficient points: {} (minimum {MIN_RING_COORDINATES})",
            ring.len()
        )));
    }
    if !ring.is_empty() && !is_closed_ring(ring) {
        findings.push(Finding::Error(format!(
            "{label} is not closed: first and last coordinates differ"
        )));
    }

    for (i, c) in ring.iter().enumerate() {
        if !is_valid_longitude(c.lon) {
            findings.push(Finding::Error(format!(
                "{label} coordinate {i} has invalid longitude {}",
                c.lon
            )));
        }
        if !is_valid_latitude(c.lat) {
            findings.push(Finding::Error(format!(
                "{label} coordinate {i} has invalid latitude {}",
                c.lat
            )));
        }
        if let Some(envelope) = &config.envelope {
            if !envelope.contains(c) {
                findings.push(Finding::Warning(format!(
                    "{label} coordinate {i} ({}, {}) lies outside the expected region bounds",
                    c.lon, c.lat
                )));
            }
        }
    }

    if has_consecutive_duplicates(ring) {
        findings.push(Finding::Warning(format!(
            "{label} contains consecutive duplicate coordinates"
        )));
    }

    findings
}

fn hole_containment_findings(geometry: &RegionGeometry) -> Vec<Finding> {
    geometry
        .polygons()
        .enumerate()
        .flat_map(|(p, polygon)| {
            let mut rings = polygon.iter();
            let exterior = rings
                .next()
                .map(|ring| geo::Polygon::new(ring_to_geo(ring), vec![]));
            rings.enumerate().filter_map(move |(h, hole)| {
                let shell = exterior.as_ref()?;
                (!shell.contains(&ring_to_geo(hole))).then(|| {
                    Finding::Warning(format!(
                        "Polygon {p} hole {h} is not enclosed by its exterior ring",
                        h = h + 1
                    ))
                })
            })
        })
        .collect()
}

fn compute_metadata(geometry: &RegionGeometry) -> ValidationMetadata {
    let (area, centroid) = match geometry {
        RegionGeometry::Polygon { .. } => (Some(area(geometry)), Some(centroid(geometry))),
        RegionGeometry::MultiPolygon { .. } => (None, None),
    };
    ValidationMetadata {
        area,
        centroid,
        bounding_box: bounding_box(geometry).unwrap_or_default(),
        coordinate_count: coordinate_count(geometry),
        ring_count: ring_count(geometry),
    }
}

fn size_findings(metadata: &ValidationMetadata, config: &ValidationConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    if metadata.coordinate_count > config.large_coordinate_count {
        findings.push(Finding::Warning(format!(
            "Geometry has {} coordinates, which may impact rendering performance",
            metadata.coordinate_count
        )));
    }
    if let Some(area) = metadata.area {
        if area < config.small_area_m2 {
            findings.push(Finding::Warning(format!(
                "Geometry area {area:.1} m² is very small; coordinates may have lost precision"
            )));
        }
    }
    findings
}
