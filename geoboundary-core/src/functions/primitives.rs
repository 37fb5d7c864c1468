//! Coordinate and ring predicates.
//!
//! Pure checks with no dependency on the rest of the engine; the validator
//! composes them into a report.

use crate::types::{Coordinate, CoordinateRing};

/// Minimum number of positions in a closed linear ring.
pub const MIN_RING_COORDINATES: usize = 4;

/// True if the longitude lies in [-180, 180].
pub fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

/// True if the latitude lies in [-90, 90].
pub fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

/// True if both ordinates are within WGS84 bounds.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::primitives::is_valid_coordinate;
/// use geoboundary_core::Coordinate;
///
/// assert!(is_valid_coordinate(&Coordinate::new(-0.12, 51.5)));
/// assert!(!is_valid_coordinate(&Coordinate::new(181.0, 0.0)));
/// ```
pub fn is_valid_coordinate(c: &Coordinate) -> bool {
    is_valid_longitude(c.lon) && is_valid_latitude(c.lat)
}

/// True if the first and last positions are exactly equal.
/// An empty ring is not closed.
pub fn is_closed_ring(ring: &[Coordinate]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// True if the ring has at least four positions and is closed.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::primitives::is_valid_ring;
/// use geoboundary_core::Coordinate;
///
/// let ring: Vec<Coordinate> = vec![
///     [0.0, 0.0].into(), [1.0, 0.0].into(), [1.0, 1.0].into(), [0.0, 0.0].into(),
/// ];
/// assert!(is_valid_ring(&ring));
/// assert!(!is_valid_ring(&ring[..3]));
/// ```
pub fn is_valid_ring(ring: &[Coordinate]) -> bool {
    ring.len() >= MIN_RING_COORDINATES && is_closed_ring(ring)
}

/// True if any two adjacent positions are identical.
pub fn has_consecutive_duplicates(ring: &[Coordinate]) -> bool {
    ring.windows(2).any(|w| w[0] == w[1])
}

/// Ring vertices without the repeated closing position.
pub(crate) fn distinct_vertices(ring: &CoordinateRing) -> &[Coordinate] {
    if ring.len() > 1 && is_closed_ring(ring) {
        &ring[..ring.len() - 1]
    } else {
        ring
    }
}
