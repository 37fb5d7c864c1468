//! Derived metadata: bounding box, area, centroid, perimeter and counts.
//!
//! Areas use an equirectangular projection to metres
//! (`x = R·λ·cos φ`, `y = R·φ`) followed by the shoelace formula. Centroids
//! are vertex centroids, not area-weighted.

use geo::{HaversineMeasure, Length};

use crate::functions::primitives::distinct_vertices;
use crate::types::{
    ring_to_geo, BoundingBox, Coordinate, CoordinateRing, PolygonCoordinates, RegionGeometry,
};

/// Mean Earth radius in metres used by every metric computation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle metric on a sphere of radius [`EARTH_RADIUS_M`].
pub(crate) const SPHERE: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_M);

/// Bounding box over every ring of every polygon.
///
/// Returns `None` for a geometry without any coordinates.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::measurement::bounding_box;
///
/// let g = geometry_from_geojson(
///     r#"{"type":"Polygon","coordinates":[[[1,2],[5,2],[5,8],[1,8],[1,2]]]}"#,
/// ).unwrap();
/// let b = bounding_box(&g).unwrap();
/// assert_eq!((b.west, b.south, b.east, b.north), (1.0, 2.0, 5.0, 8.0));
/// ```
pub fn bounding_box(geometry: &RegionGeometry) -> Option<BoundingBox> {
    BoundingBox::from_coordinates(geometry.coordinates())
}

/// Bounding box of a single ring.
pub fn ring_bounding_box(ring: &CoordinateRing) -> Option<BoundingBox> {
    BoundingBox::from_coordinates(ring)
}

/// Unsigned planar area of one ring in m².
pub fn ring_area(ring: &CoordinateRing) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let projected: Vec<(f64, f64)> = ring
        .iter()
        .map(|c| {
            let lambda = c.lon.to_radians();
            let phi = c.lat.to_radians();
            (EARTH_RADIUS_M * lambda * phi.cos(), EARTH_RADIUS_M * phi)
        })
        .collect();
    let twice_area: f64 = projected
        .iter()
        .zip(projected.iter().cycle().skip(1))
        .map(|((x1, y1), (x2, y2))| x1 * y2 - x2 * y1)
        .sum();
    (twice_area / 2.0).abs()
}

/// Area of one polygon in m²: `|exterior − Σ holes|`.
pub fn polygon_area(polygon: &PolygonCoordinates) -> f64 {
    let mut rings = polygon.iter();
    let Some(exterior) = rings.next() else {
        return 0.0;
    };
    let holes: f64 = rings.map(ring_area).sum();
    (ring_area(exterior) - holes).abs()
}

/// Total area in m²; a MultiPolygon sums its constituents.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::measurement::area;
///
/// // One degree square on the equator ≈ 111 km × 111 km
/// let g = geometry_from_geojson(
///     r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#,
/// ).unwrap();
/// let a = area(&g);
/// assert!(a > 1.2e10 && a < 1.25e10);
/// ```
pub fn area(geometry: &RegionGeometry) -> f64 {
    geometry.polygons().map(polygon_area).sum()
}

/// Vertex centroid of a polygon's exterior ring, closing position excluded.
/// A polygon without an exterior ring falls back to the origin.
pub fn polygon_centroid(polygon: &PolygonCoordinates) -> Coordinate {
    exterior_centroid(polygon).unwrap_or(Coordinate::ORIGIN)
}

fn exterior_centroid(polygon: &PolygonCoordinates) -> Option<Coordinate> {
    polygon
        .first()
        .and_then(|exterior| mean_coordinate(distinct_vertices(exterior).iter()))
}

/// Vertex centroid; a MultiPolygon averages its polygons' centroids unweighted.
///
/// Returns `None` when the geometry has no exterior vertices at all, so
/// callers can tell "no location" apart from a region centred on (0, 0).
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::measurement::vertex_centroid;
/// use geoboundary_core::{Coordinate, RegionGeometry};
///
/// let g = geometry_from_geojson(
///     r#"{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,2],[0,0]]]}"#,
/// ).unwrap();
/// assert_eq!(vertex_centroid(&g), Some(Coordinate::new(1.0, 1.0)));
///
/// let empty = RegionGeometry::MultiPolygon { coordinates: vec![] };
/// assert_eq!(vertex_centroid(&empty), None);
/// ```
pub fn vertex_centroid(geometry: &RegionGeometry) -> Option<Coordinate> {
    match geometry {
        RegionGeometry::Polygon { coordinates } => exterior_centroid(coordinates),
        RegionGeometry::MultiPolygon { coordinates } => {
            let centroids: Vec<Coordinate> =
                coordinates.iter().filter_map(exterior_centroid).collect();
            mean_coordinate(centroids.iter())
        }
    }
}

/// [`vertex_centroid`], with the origin standing in for empty geometry.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::measurement::centroid;
///
/// let g = geometry_from_geojson(
///     r#"{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,2],[0,0]]]}"#,
/// ).unwrap();
/// let c = centroid(&g);
/// assert_eq!((c.lon, c.lat), (1.0, 1.0));
/// ```
pub fn centroid(geometry: &RegionGeometry) -> Coordinate {
    vertex_centroid(geometry).unwrap_or(Coordinate::ORIGIN)
}

fn mean_coordinate<'a, I>(coords: I) -> Option<Coordinate>
where
    I: ExactSizeIterator<Item = &'a Coordinate>,
{
    let n = coords.len();
    if n == 0 {
        return None;
    }
    let (lon, lat) = coords.fold((0.0, 0.0), |(lon, lat), c| (lon + c.lon, lat + c.lat));
    Some(Coordinate::new(lon / n as f64, lat / n as f64))
}

/// Great-circle length of every ring, in metres.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::measurement::perimeter;
///
/// let g = geometry_from_geojson(
///     r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#,
/// ).unwrap();
/// let p = perimeter(&g);
/// assert!(p > 440_000.0 && p < 450_000.0); // ≈ 4 × 111 km
/// ```
pub fn perimeter(geometry: &RegionGeometry) -> f64 {
    geometry
        .rings()
        .map(|ring| SPHERE.length(&ring_to_geo(ring)))
        .sum()
}

/// Number of positions across all rings, closing positions included.
pub fn coordinate_count(geometry: &RegionGeometry) -> usize {
    geometry.rings().map(Vec::len).sum()
}

/// Number of rings, exteriors and holes alike.
pub fn ring_count(geometry: &RegionGeometry) -> usize {
    geometry.rings().count()
}
