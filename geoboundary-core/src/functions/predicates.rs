//! Spatial predicates.
//!
//! Point-in-polygon (ray casting, holes excluded), Haversine distance and
//! bounding-box intersection. All functions are total: degenerate input
//! yields `false` rather than an error.

use geo::{Distance, Point};

use crate::functions::measurement::{bounding_box, SPHERE};
use crate::types::{Coordinate, PolygonCoordinates, RegionGeometry};

/// Ray-casting point-in-ring test with the half-open edge convention, so a
/// vertex shared by two edges is counted once.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::predicates::point_in_ring;
/// use geoboundary_core::Coordinate;
///
/// let square: Vec<Coordinate> = vec![
///     [0.0, 0.0].into(), [1.0, 0.0].into(), [1.0, 1.0].into(),
///     [0.0, 1.0].into(), [0.0, 0.0].into(),
/// ];
/// assert!(point_in_ring(&Coordinate::new(0.5, 0.5), &square));
/// assert!(!point_in_ring(&Coordinate::new(1.5, 0.5), &square));
/// ```
pub fn point_in_ring(point: &Coordinate, ring: &[Coordinate]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let (x, y) = (point.lon, point.lat);
    let mut inside = false;
    let mut j = ring.len() - 1;
    for (i, vi) in ring.iter().enumerate() {
        let vj = &ring[j];
        let (xi, yi) = (vi.lon, vi.lat);
        let (xj, yj) = (vj.lon, vj.lat);
        if (yi > y) != (yj > y) && x < xi + (y - yi) / (yj - yi) * (xj - xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inside the exterior ring and outside every hole.
pub fn point_in_polygon(point: &Coordinate, polygon: &PolygonCoordinates) -> bool {
    let Some((exterior, holes)) = polygon.split_first() else {
        return false;
    };
    point_in_ring(point, exterior) && !holes.iter().any(|hole| point_in_ring(point, hole))
}

/// Point-in-polygon for either geometry shape; a MultiPolygon matches if any
/// constituent polygon does.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::predicates::point_in_geometry;
/// use geoboundary_core::Coordinate;
///
/// let donut = geometry_from_geojson(r#"{"type":"Polygon","coordinates":[
///     [[0,0],[1,0],[1,1],[0,1],[0,0]],
///     [[0.25,0.25],[0.75,0.25],[0.75,0.75],[0.25,0.75],[0.25,0.25]]
/// ]}"#).unwrap();
/// assert!(!point_in_geometry(&Coordinate::new(0.5, 0.5), &donut));
/// assert!(point_in_geometry(&Coordinate::new(0.1, 0.1), &donut));
/// ```
pub fn point_in_geometry(point: &Coordinate, geometry: &RegionGeometry) -> bool {
    geometry.polygons().any(|p| point_in_polygon(point, p))
}

/// Haversine great-circle distance in metres on a 6,371 km sphere.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::predicates::distance;
/// use geoboundary_core::Coordinate;
///
/// let london = Coordinate::new(-0.1278, 51.5074);
/// let paris = Coordinate::new(2.3522, 48.8566);
/// let d = distance(&london, &paris);
/// assert!(d > 300_000.0 && d < 400_000.0); // ~340 km
/// ```
pub fn distance(p1: &Coordinate, p2: &Coordinate) -> f64 {
    SPHERE.distance(Point::from(*p1), Point::from(*p2))
}

/// Bounding-box overlap. A conservative over-approximation of polygon
/// intersection: disjoint shapes with overlapping boxes still report `true`.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::predicates::intersects;
///
/// let a = geometry_from_geojson(r#"{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,2],[0,0]]]}"#).unwrap();
/// let b = geometry_from_geojson(r#"{"type":"Polygon","coordinates":[[[1,1],[3,1],[3,3],[1,3],[1,1]]]}"#).unwrap();
/// let c = geometry_from_geojson(r#"{"type":"Polygon","coordinates":[[[5,5],[6,5],[6,6],[5,6],[5,5]]]}"#).unwrap();
/// assert!(intersects(&a, &b));
/// assert!(!intersects(&a, &c));
/// ```
pub fn intersects(a: &RegionGeometry, b: &RegionGeometry) -> bool {
    match (bounding_box(a), bounding_box(b)) {
        (Some(ba), Some(bb)) => ba.intersects(&bb),
        _ => false,
    }
}
