//! End-to-end scenarios over simplified UK boundary fixtures.

use geoboundary_core::functions::processing::{
    batch_process_geometries, process, BatchEntry, ProcessOptions,
};
use geoboundary_core::functions::query::{
    collection_bounding_box, execute_spatial_query, find_intersecting_regions,
    find_regions_containing_point, nearest_region, SpatialQuery,
};
use geoboundary_core::functions::simplify::simplify_for_zoom;
use geoboundary_core::functions::validation::validate;
use geoboundary_core::{Coordinate, RegionGeometry, RegionRecord};
use serde_json::{json, Value};

fn england_ring() -> Value {
    json!([[-5.7, 49.9], [1.8, 49.9], [1.8, 55.8], [-5.7, 55.8], [-5.7, 49.9]])
}

fn scotland_ring() -> Value {
    json!([[-7.5, 55.8], [-0.7, 55.8], [-0.7, 60.9], [-7.5, 60.9], [-7.5, 55.8]])
}

fn polygon(ring: Value) -> RegionGeometry {
    serde_json::from_value(json!({"type": "Polygon", "coordinates": [ring]})).unwrap()
}

fn great_britain() -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": [[england_ring()], [scotland_ring()]]
    })
}

fn regions() -> Vec<RegionRecord> {
    vec![
        RegionRecord::new(1, Some(polygon(england_ring()))),
        RegionRecord::new(2, Some(polygon(scotland_ring()))),
        RegionRecord::new(
            3,
            Some(polygon(json!([
                [-8.2, 54.0], [-5.4, 54.0], [-5.4, 55.3], [-8.2, 55.3], [-8.2, 54.0]
            ]))),
        ),
        RegionRecord::new(4, None),
    ]
}

const LONDON: Coordinate = Coordinate::new(-0.1278, 51.5074);

#[test]
fn great_britain_multipolygon_processes_cleanly() {
    let report = validate(&great_britain());
    assert!(report.is_valid, "errors: {:?}", report.errors);
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);

    let geometry: RegionGeometry = serde_json::from_value(great_britain()).unwrap();
    let processed = process(&geometry, &ProcessOptions::default()).unwrap();
    assert!(processed.validation.is_valid);
    assert!(processed.metadata.area > 0.0);
    assert_eq!(processed.metadata.ring_count, 2);
    assert_eq!(processed.metadata.coordinate_count, 10);

    let bbox = processed.bounding_box;
    assert_eq!((bbox.west, bbox.east), (-7.5, 1.8));
    assert_eq!((bbox.south, bbox.north), (49.9, 60.9));
    assert!(bbox.contains(&processed.metadata.centroid));
}

#[test]
fn london_resolves_to_england_only() {
    let found = find_regions_containing_point(&LONDON, &regions());
    assert_eq!(found.len(), 4);

    assert_eq!(found[0].id, 1);
    assert!(found[0].contained);
    assert!(found[0].distance.is_none());

    for other in &found[1..3] {
        assert!(!other.contained, "region {} should not contain London", other.id);
        assert!(other.distance.unwrap() > 100_000.0);
    }
    assert!(!found[3].contained);
    assert!(found[3].distance.is_none());
}

#[test]
fn point_in_the_channel_suggests_england() {
    let calais = Coordinate::new(1.85, 50.95);
    let nearest = nearest_region(&calais, &regions()).unwrap();
    assert_eq!(nearest.id, 1);
}

#[test]
fn continental_point_is_hundreds_of_km_away() {
    let d = geoboundary_core::functions::predicates::distance(
        &Coordinate::new(-0.5, 52.0),
        &Coordinate::new(5.0, 45.0),
    );
    assert!(d > 500_000.0 && d < 1_500_000.0, "got {d}");
}

#[test]
fn england_box_touches_neighbouring_boxes() {
    // Boxes share the 55.8° edge with Scotland, so the coarse check reports true.
    let out = find_intersecting_regions(&polygon(england_ring()), &regions());
    let flags: Vec<bool> = out.iter().map(|r| r.intersects).collect();
    assert_eq!(flags, vec![true, true, true, false]);
}

#[test]
fn dispatcher_agrees_with_lookup() {
    let england = polygon(england_ring());
    let result = execute_spatial_query(&england, &SpatialQuery::contains(LONDON)).unwrap();
    assert!(result.matches);
    let far = execute_spatial_query(&england, &SpatialQuery::distance(LONDON, Some(10.0))).unwrap();
    assert!(!far.matches);
}

#[test]
fn fit_bounds_over_collection() {
    let b = collection_bounding_box(&regions()).unwrap();
    assert_eq!((b.west, b.east, b.south, b.north), (-8.2, 1.8, 49.9, 60.9));
}

#[test]
fn batch_with_missing_and_malformed_geometry() {
    let malformed: RegionGeometry = serde_json::from_value(json!({
        "type": "Polygon",
        "coordinates": [[[-2.0, 50.0], [1.0, 50.0]]]
    }))
    .unwrap();
    let batch = vec![
        RegionRecord::new(1, Some(polygon(england_ring()))),
        RegionRecord::new(2, None),
        RegionRecord::new(3, Some(malformed)),
    ];
    let out: Vec<BatchEntry> = batch_process_geometries(&batch, &ProcessOptions::default()).unwrap();
    assert_eq!(out.len(), 3);
    assert!(out[0].processed.as_ref().unwrap().validation.is_valid);
    assert!(out[1].processed.is_none());
    let third = out[2].processed.as_ref().unwrap();
    assert!(!third.validation.is_valid);
    assert!(third.validation.errors.iter().any(|e| e.contains("insufficient points")));
    assert!(third.validation.errors.iter().any(|e| e.contains("not closed")));
}

#[test]
fn french_region_keeps_metadata_despite_envelope_warnings() {
    let normandy = polygon(json!([[-1.5, 48.5], [1.5, 48.5], [1.5, 50.0], [-1.5, 50.0], [-1.5, 48.5]]));
    let processed = process(&normandy, &ProcessOptions::default()).unwrap();
    assert!(processed.validation.is_valid);
    assert!(!processed.validation.warnings.is_empty());
    assert!(processed.metadata.area > 0.0);
    assert!(processed.metadata.coordinate_count > 0);
}

#[test]
fn zoomed_out_rendering_never_grows_geometry() {
    let geometry: RegionGeometry = serde_json::from_value(great_britain()).unwrap();
    for zoom in 5..=13 {
        let simplified = simplify_for_zoom(&geometry, zoom);
        assert!(simplified.coordinates().count() <= geometry.coordinates().count());
        assert!(validate(&serde_json::to_value(&simplified).unwrap()).is_valid);
    }
}
