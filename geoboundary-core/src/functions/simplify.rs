//! Tolerance-based ring simplification and zoom-adaptive tolerances.
//!
//! The sweep is a single-pass approximation of Douglas-Peucker: each interior
//! vertex is tested against the segment from the last *kept* vertex to the
//! next *raw* vertex, and kept when its distance exceeds the tolerance. It
//! runs in linear time but does not pick the globally optimal subset.

use tracing::trace;

use crate::config::ZoomToleranceConfig;
use crate::functions::primitives::MIN_RING_COORDINATES;
use crate::types::{Coordinate, CoordinateRing, RegionGeometry};

/// Planar distance (degrees) from `p` to the segment `a`–`b`.
pub fn perpendicular_distance(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    let dx = b.lon - a.lon;
    let dy = b.lat - a.lat;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (p.lon - a.lon).hypot(p.lat - a.lat);
    }
    let t = (((p.lon - a.lon) * dx + (p.lat - a.lat) * dy) / len_sq).clamp(0.0, 1.0);
    let proj_lon = a.lon + t * dx;
    let proj_lat = a.lat + t * dy;
    (p.lon - proj_lon).hypot(p.lat - proj_lat)
}

/// Simplify one ring. The first and last positions are always kept and the
/// output never has more positions than the input.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::simplify::simplify_ring;
/// use geoboundary_core::Coordinate;
///
/// let ring: Vec<Coordinate> = vec![
///     [0.0, 0.0].into(), [0.5, 0.00001].into(), [1.0, 0.0].into(),
///     [1.0, 1.0].into(), [0.0, 1.0].into(), [0.0, 0.0].into(),
/// ];
/// let simplified = simplify_ring(&ring, 0.001);
/// assert_eq!(simplified.len(), 5);
/// assert_eq!(simplified.first(), ring.first());
/// assert_eq!(simplified.last(), ring.last());
/// ```
pub fn simplify_ring(ring: &[Coordinate], tolerance: f64) -> CoordinateRing {
    let (Some(first), Some(last)) = (ring.first(), ring.last()) else {
        return Vec::new();
    };
    if ring.len() <= 2 {
        return ring.to_vec();
    }
    let mut kept = Vec::with_capacity(ring.len());
    kept.push(*first);
    for window in ring[1..].windows(2) {
        let (current, next) = (&window[0], &window[1]);
        let anchor = kept.last().unwrap_or(first);
        if perpendicular_distance(current, anchor, next) > tolerance {
            kept.push(*current);
        }
    }
    kept.push(*last);
    kept
}

/// Simplify every ring of a geometry.
///
/// A ring whose simplified form would fall below four positions is kept at
/// full resolution so the output remains a set of valid closed rings.
pub fn simplify_geometry(geometry: &RegionGeometry, tolerance: f64) -> RegionGeometry {
    let simplify_polygon = |polygon: &Vec<CoordinateRing>| -> Vec<CoordinateRing> {
        polygon
            .iter()
            .map(|ring| {
                let simplified = simplify_ring(ring, tolerance);
                if simplified.len() < MIN_RING_COORDINATES && simplified.len() < ring.len() {
                    ring.clone()
                } else {
                    simplified
                }
            })
            .collect()
    };
    let out = match geometry {
        RegionGeometry::Polygon { coordinates } => RegionGeometry::Polygon {
            coordinates: simplify_polygon(coordinates),
        },
        RegionGeometry::MultiPolygon { coordinates } => RegionGeometry::MultiPolygon {
            coordinates: coordinates.iter().map(simplify_polygon).collect(),
        },
    };
    trace!(
        tolerance,
        before = geometry.coordinates().count(),
        after = out.coordinates().count(),
        "simplified geometry"
    );
    out
}

/// Tolerance in degrees for a map zoom level using the default mapping
/// `max(0.0001, (15 - zoom) * 0.001)`.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::simplify::tolerance_for_zoom;
///
/// assert!((tolerance_for_zoom(5) - 0.01).abs() < 1e-12);
/// assert_eq!(tolerance_for_zoom(15), 0.0001);
/// assert_eq!(tolerance_for_zoom(18), 0.0001);
/// ```
pub fn tolerance_for_zoom(zoom_level: u8) -> f64 {
    tolerance_for_zoom_with_config(zoom_level, &ZoomToleranceConfig::default())
}

pub fn tolerance_for_zoom_with_config(zoom_level: u8, config: &ZoomToleranceConfig) -> f64 {
    let scaled = (config.reference_zoom - f64::from(zoom_level)) * config.degrees_per_zoom;
    scaled.max(config.min_tolerance)
}

/// Simplify for rendering at `zoom_level`.
pub fn simplify_for_zoom(geometry: &RegionGeometry, zoom_level: u8) -> RegionGeometry {
    simplify_geometry(geometry, tolerance_for_zoom(zoom_level))
}

pub fn simplify_for_zoom_with_config(
    geometry: &RegionGeometry,
    zoom_level: u8,
    config: &ZoomToleranceConfig,
) -> RegionGeometry {
    simplify_geometry(geometry, tolerance_for_zoom_with_config(zoom_level, config))
}

/// Vertex counts before and after simplification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplificationStats {
    pub original_coordinates: usize,
    pub simplified_coordinates: usize,
}

impl SimplificationStats {
    /// Fraction of positions removed, in [0, 1].
    pub fn reduction_ratio(&self) -> f64 {
        if self.original_coordinates == 0 {
            return 0.0;
        }
        1.0 - self.simplified_coordinates as f64 / self.original_coordinates as f64
    }
}

pub fn simplification_stats(
    original: &RegionGeometry,
    simplified: &RegionGeometry,
) -> SimplificationStats {
    SimplificationStats {
        original_coordinates: original.coordinates().count(),
        simplified_coordinates: simplified.coordinates().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[[f64; 2]]) -> CoordinateRing {
        points.iter().copied().map(Coordinate::from).collect()
    }

    // ── Segment distance ───────────────────────────────────────────

    #[test]
    fn distance_to_degenerate_segment() {
        let a = Coordinate::new(0.0, 0.0);
        let p = Coordinate::new(3.0, 4.0);
        assert_eq!(perpendicular_distance(&p, &a, &a), 5.0);
    }

    #[test]
    fn distance_clamps_to_segment_end() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let p = Coordinate::new(4.0, 4.0);
        assert_eq!(perpendicular_distance(&p, &a, &b), 5.0);
    }

    // ── Ring sweep ─────────────────────────────────────────────────

    #[test]
    fn collinear_points_dropped() {
        let r = ring(&[[0.0, 0.0], [0.5, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]);
        let s = simplify_ring(&r, 0.0001);
        assert_eq!(s, ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]));
    }

    #[test]
    fn zero_tolerance_keeps_corners() {
        let r = ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]);
        assert_eq!(simplify_ring(&r, 0.0), r);
    }

    #[test]
    fn shallow_bump_dropped() {
        let r = ring(&[[0.0, 0.0], [1.0, 0.3], [2.0, 0.0], [3.0, 0.0]]);
        let s = simplify_ring(&r, 0.5);
        assert_eq!(s, ring(&[[0.0, 0.0], [3.0, 0.0]]));
    }

    #[test]
    fn tiny_rings_returned_unchanged() {
        assert!(simplify_ring(&[], 1.0).is_empty());
        let two = ring(&[[0.0, 0.0], [1.0, 1.0]]);
        assert_eq!(simplify_ring(&two, 1.0), two);
    }

    #[test]
    fn huge_tolerance_keeps_endpoints_only() {
        let r = ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]);
        let s = simplify_ring(&r, 10.0);
        assert_eq!(s, ring(&[[0.0, 0.0], [0.0, 0.0]]));
    }

    #[test]
    fn anchor_is_last_kept_point() {
        // (2, 0.8) is measured against the kept (0, 0), not the dropped (1, 0.4).
        let r = ring(&[[0.0, 0.0], [1.0, 0.4], [2.0, 0.8], [3.0, 0.0]]);
        let s = simplify_ring(&r, 0.5);
        assert_eq!(s, ring(&[[0.0, 0.0], [2.0, 0.8], [3.0, 0.0]]));
    }

    // ── Geometry level ─────────────────────────────────────────────

    #[test]
    fn geometry_keeps_rings_that_would_collapse() {
        let r = ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]);
        let g = RegionGeometry::Polygon {
            coordinates: vec![r],
        };
        let s = simplify_geometry(&g, 10.0);
        assert_eq!(s, g);
    }

    #[test]
    fn multipolygon_simplified_per_ring() {
        let noisy = ring(&[[0.0, 0.0], [0.5, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]);
        let g = RegionGeometry::MultiPolygon {
            coordinates: vec![vec![noisy.clone()], vec![noisy]],
        };
        let s = simplify_geometry(&g, 0.001);
        let stats = simplification_stats(&g, &s);
        assert_eq!(stats.original_coordinates, 12);
        assert_eq!(stats.simplified_coordinates, 10);
        assert!((stats.reduction_ratio() - 1.0 / 6.0).abs() < 1e-12);
    }

    // ── Zoom mapping ───────────────────────────────────────────────

    #[test]
    fn lower_zoom_is_coarser() {
        assert!(tolerance_for_zoom(5) > tolerance_for_zoom(10));
        assert!((tolerance_for_zoom(13) - 0.002).abs() < 1e-12);
    }

    #[test]
    fn custom_zoom_config() {
        let cfg = ZoomToleranceConfig {
            reference_zoom: 10.0,
            degrees_per_zoom: 0.01,
            min_tolerance: 0.005,
        };
        assert!((tolerance_for_zoom_with_config(5, &cfg) - 0.05).abs() < 1e-12);
        assert_eq!(tolerance_for_zoom_with_config(12, &cfg), 0.005);
    }

    #[test]
    fn empty_stats_ratio_is_zero() {
        let stats = SimplificationStats {
            original_coordinates: 0,
            simplified_coordinates: 0,
        };
        assert_eq!(stats.reduction_ratio(), 0.0);
    }
}
