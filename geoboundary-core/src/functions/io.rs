//! GeoJSON text in and out.
//!
//! Parsing is strict: anything other than a Polygon or MultiPolygon with
//! correctly nested coordinates is an error. Use
//! [`validate_geojson`] to get a [`ValidationReport`] instead.

use serde_json::Value;

use crate::config::ValidationConfig;
use crate::error::Result;
use crate::functions::validation::{validate_with_config, ValidationReport, INVALID_STRUCTURE};
use crate::types::RegionGeometry;

/// Parse GeoJSON geometry text.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
///
/// let g = geometry_from_geojson(
///     r#"{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1],[0,0]]]]}"#,
/// ).unwrap();
/// assert_eq!(g.type_name(), "MultiPolygon");
/// assert!(geometry_from_geojson(r#"{"type":"Point","coordinates":[0,0]}"#).is_err());
/// ```
pub fn geometry_from_geojson(json: &str) -> Result<RegionGeometry> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize a geometry as GeoJSON text.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::{as_geojson, geometry_from_geojson};
///
/// let text = r#"{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]]}"#;
/// let g = geometry_from_geojson(text).unwrap();
/// assert_eq!(as_geojson(&g).unwrap(), text);
/// ```
pub fn as_geojson(geometry: &RegionGeometry) -> Result<String> {
    Ok(serde_json::to_string(geometry)?)
}

/// Validate GeoJSON text. Text that is not JSON at all is reported as an
/// invalid structure, like any other unrecognised input.
pub fn validate_geojson(json: &str, config: &ValidationConfig) -> ValidationReport {
    match serde_json::from_str::<Value>(json) {
        Ok(raw) => validate_with_config(&raw, config),
        Err(_) => ValidationReport {
            is_valid: false,
            errors: vec![INVALID_STRUCTURE.to_string()],
            warnings: Vec::new(),
            metadata: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoBoundaryError;

    #[test]
    fn invalid_json_returns_err() {
        assert!(matches!(
            geometry_from_geojson("{not json}"),
            Err(GeoBoundaryError::Json(_))
        ));
    }

    #[test]
    fn feature_wrapper_is_not_a_geometry() {
        let feature = r#"{"type":"Feature","geometry":{"type":"Polygon","coordinates":[]}}"#;
        assert!(geometry_from_geojson(feature).is_err());
    }

    #[test]
    fn extra_members_ignored() {
        let g = geometry_from_geojson(
            r#"{"type":"Polygon","bbox":[0,0,1,1],"coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#,
        )
        .unwrap();
        assert_eq!(g.type_name(), "Polygon");
    }

    #[test]
    fn validate_text_reports_garbage_as_structure_error() {
        let report = validate_geojson("not json", &ValidationConfig::default());
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![INVALID_STRUCTURE]);
    }

    #[test]
    fn validate_text_runs_full_checks() {
        let report = validate_geojson(
            r#"{"type":"Polygon","coordinates":[[[-1,52],[0,52],[0,53],[-1,52]]]}"#,
            &ValidationConfig::default(),
        );
        assert!(report.is_valid, "errors: {:?}", report.errors);
        assert!(report.metadata.is_some());
    }
}
