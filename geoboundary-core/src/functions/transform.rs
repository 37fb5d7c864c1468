//! Web Mercator (EPSG:3857) ↔ longitude/latitude conversions for renderers.

use std::f64::consts::PI;

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::error::{GeoBoundaryError, Result};
use crate::types::{Coordinate, CoordinateRing, PolygonCoordinates, RegionGeometry};

/// Half the Web Mercator circumference in metres (EPSG:3857).
pub const WEB_MERCATOR_HALF_SIZE: f64 = 20037508.342789244;

/// Latitude limit of the square Web Mercator world.
pub const MAX_MERCATOR_LAT: f64 = 85.05112878;

/// Project a coordinate to Web Mercator metres. Latitude is clamped to
/// ±[`MAX_MERCATOR_LAT`].
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::transform::to_web_mercator;
/// use geoboundary_core::Coordinate;
///
/// let p = to_web_mercator(&Coordinate::new(180.0, 0.0));
/// assert!((p.x - 20037508.342789244).abs() < 1e-6);
/// assert!(p.y.abs() < 1e-6);
/// ```
pub fn to_web_mercator(c: &Coordinate) -> Coord<f64> {
    let lat = c.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let x = c.lon * WEB_MERCATOR_HALF_SIZE / 180.0;
    let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    Coord {
        x,
        y: y * WEB_MERCATOR_HALF_SIZE / 180.0,
    }
}

/// Inverse projection from Web Mercator metres.
///
/// Errors when the input lies outside the projected world square.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::transform::{from_web_mercator, to_web_mercator};
/// use geoboundary_core::Coordinate;
///
/// let london = Coordinate::new(-0.1278, 51.5074);
/// let back = from_web_mercator(to_web_mercator(&london)).unwrap();
/// assert!((back.lon - london.lon).abs() < 1e-9);
/// assert!((back.lat - london.lat).abs() < 1e-9);
/// ```
pub fn from_web_mercator(p: Coord<f64>) -> Result<Coordinate> {
    let limit = WEB_MERCATOR_HALF_SIZE * (1.0 + 1e-9);
    if !(p.x.abs() <= limit && p.y.abs() <= limit) {
        return Err(GeoBoundaryError::InvalidInput(format!(
            "({}, {}) lies outside the Web Mercator extent",
            p.x, p.y
        )));
    }
    let lon = p.x / WEB_MERCATOR_HALF_SIZE * 180.0;
    let y_deg = p.y / WEB_MERCATOR_HALF_SIZE * 180.0;
    let lat = 180.0 / PI * (2.0 * (y_deg * PI / 180.0).exp().atan() - PI / 2.0);
    Ok(Coordinate::new(lon, lat))
}

fn project_ring(ring: &CoordinateRing) -> LineString<f64> {
    LineString::new(ring.iter().map(to_web_mercator).collect())
}

fn project_polygon(polygon: &PolygonCoordinates) -> Polygon<f64> {
    let mut rings = polygon.iter().map(project_ring);
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

/// Project a whole geometry into Web Mercator metres for rendering.
pub fn project_geometry(geometry: &RegionGeometry) -> MultiPolygon<f64> {
    MultiPolygon::new(geometry.polygons().map(project_polygon).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_origin() {
        let p = to_web_mercator(&Coordinate::ORIGIN);
        assert!(p.x.abs() < 1e-9 && p.y.abs() < 1e-9);
    }

    #[test]
    fn max_latitude_maps_to_world_edge() {
        let p = to_web_mercator(&Coordinate::new(0.0, MAX_MERCATOR_LAT));
        assert!((p.y - WEB_MERCATOR_HALF_SIZE).abs() < 1.0, "got {}", p.y);
    }

    #[test]
    fn poles_are_clamped() {
        let pole = to_web_mercator(&Coordinate::new(0.0, 90.0));
        let edge = to_web_mercator(&Coordinate::new(0.0, MAX_MERCATOR_LAT));
        assert_eq!(pole, edge);
        assert!(pole.y.is_finite());
    }

    #[test]
    fn out_of_extent_rejected() {
        let err = from_web_mercator(Coord {
            x: 3.0e7,
            y: 0.0,
        });
        assert!(matches!(err, Err(GeoBoundaryError::InvalidInput(_))));
        assert!(from_web_mercator(Coord { x: f64::NAN, y: 0.0 }).is_err());
    }

    #[test]
    fn round_trip_southern_hemisphere() {
        let c = Coordinate::new(151.2093, -33.8688);
        let back = from_web_mercator(to_web_mercator(&c)).unwrap();
        assert!((back.lon - c.lon).abs() < 1e-9);
        assert!((back.lat - c.lat).abs() < 1e-9);
    }

    #[test]
    fn geometry_projection_keeps_structure() {
        let g = RegionGeometry::MultiPolygon {
            coordinates: vec![
                vec![vec![
                    [0.0, 0.0].into(),
                    [1.0, 0.0].into(),
                    [1.0, 1.0].into(),
                    [0.0, 0.0].into(),
                ]],
                vec![],
            ],
        };
        let projected = project_geometry(&g);
        assert_eq!(projected.0.len(), 2);
        assert_eq!(projected.0[0].exterior().0.len(), 4);
        assert!(projected.0[0].exterior().0[1].x > 100_000.0);
    }
}
