//! Region lookup and the spatial query dispatcher.
//!
//! Every lookup is a linear scan over the caller's region set, fanned out
//! with rayon. There is no spatial index.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeoBoundaryError, Result};
use crate::functions::measurement::{area, bounding_box, ring_bounding_box, vertex_centroid};
use crate::functions::predicates::{distance, intersects, point_in_geometry};
use crate::types::{BoundingBox, Coordinate, RegionGeometry, RegionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialOperation {
    Contains,
    Intersects,
    Within,
    Distance,
}

impl fmt::Display for SpatialOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpatialOperation::Contains => "contains",
            SpatialOperation::Intersects => "intersects",
            SpatialOperation::Within => "within",
            SpatialOperation::Distance => "distance",
        };
        f.write_str(name)
    }
}

/// A one-shot query against a target geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialQuery {
    pub operation: SpatialOperation,
    pub point: Option<Coordinate>,
    pub geometry: Option<RegionGeometry>,
    /// Radius in metres turning a `Distance` query into a match test.
    pub buffer: Option<f64>,
}

impl SpatialQuery {
    pub fn contains(point: Coordinate) -> Self {
        Self {
            operation: SpatialOperation::Contains,
            point: Some(point),
            geometry: None,
            buffer: None,
        }
    }

    pub fn intersects(geometry: RegionGeometry) -> Self {
        Self {
            operation: SpatialOperation::Intersects,
            point: None,
            geometry: Some(geometry),
            buffer: None,
        }
    }

    pub fn within(point: Coordinate, geometry: RegionGeometry) -> Self {
        Self {
            operation: SpatialOperation::Within,
            point: Some(point),
            geometry: Some(geometry),
            buffer: None,
        }
    }

    pub fn distance(point: Coordinate, buffer: Option<f64>) -> Self {
        Self {
            operation: SpatialOperation::Distance,
            point: Some(point),
            geometry: None,
            buffer,
        }
    }

    fn require_point(&self) -> Result<&Coordinate> {
        self.point
            .as_ref()
            .ok_or(GeoBoundaryError::MissingQueryArgument {
                operation: self.operation,
                argument: "point",
            })
    }

    fn require_geometry(&self) -> Result<&RegionGeometry> {
        self.geometry
            .as_ref()
            .ok_or(GeoBoundaryError::MissingQueryArgument {
                operation: self.operation,
                argument: "geometry",
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub matches: bool,
    /// Metres from the query point to the target's vertex centroid; `None`
    /// when the target has no vertices.
    pub distance: Option<f64>,
    /// Target area in m², reported on matching containment and intersection queries.
    pub area: Option<f64>,
}

/// Route a [`SpatialQuery`] against `target`.
///
/// `Within` is the conjunction "point inside the query geometry and inside the
/// target", not geometry-in-geometry containment. A `Distance` query against
/// a target without vertices never matches. A query missing its required
/// argument is a [`GeoBoundaryError::MissingQueryArgument`].
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::query::{execute_spatial_query, SpatialOperation, SpatialQuery};
/// use geoboundary_core::Coordinate;
///
/// let square = geometry_from_geojson(
///     r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#,
/// ).unwrap();
/// let hit = execute_spatial_query(&square, &SpatialQuery::contains(Coordinate::new(0.5, 0.5))).unwrap();
/// assert!(hit.matches);
///
/// let incomplete = SpatialQuery { point: None, ..SpatialQuery::contains(Coordinate::new(0.0, 0.0)) };
/// assert!(execute_spatial_query(&square, &incomplete).is_err());
/// ```
pub fn execute_spatial_query(target: &RegionGeometry, query: &SpatialQuery) -> Result<QueryResult> {
    let result = match query.operation {
        SpatialOperation::Contains => {
            let point = query.require_point()?;
            matched_with_area(point_in_geometry(point, target), target)
        }
        SpatialOperation::Intersects => {
            let geometry = query.require_geometry()?;
            matched_with_area(intersects(target, geometry), target)
        }
        SpatialOperation::Within => {
            let point = query.require_point()?;
            let geometry = query.require_geometry()?;
            let matches = point_in_geometry(point, geometry) && point_in_geometry(point, target);
            matched_with_area(matches, target)
        }
        SpatialOperation::Distance => {
            let point = query.require_point()?;
            let d = vertex_centroid(target).map(|c| distance(point, &c));
            QueryResult {
                matches: d.is_some_and(|d| query.buffer.is_none_or(|radius| d <= radius)),
                distance: d,
                area: None,
            }
        }
    };
    Ok(result)
}

fn matched_with_area(matches: bool, target: &RegionGeometry) -> QueryResult {
    QueryResult {
        matches,
        distance: None,
        area: matches.then(|| area(target)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionContainment {
    pub id: i64,
    pub contained: bool,
    /// Metres to the region's vertex centroid; only set when not contained
    /// and the region has vertices to measure to.
    pub distance: Option<f64>,
}

/// Which regions contain `point`, with a centroid distance hint for the rest.
///
/// # Example
///
/// ```
/// use geoboundary_core::functions::io::geometry_from_geojson;
/// use geoboundary_core::functions::query::find_regions_containing_point;
/// use geoboundary_core::{Coordinate, RegionRecord};
///
/// let square = geometry_from_geojson(
///     r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#,
/// ).unwrap();
/// let regions = [RegionRecord::new(1, Some(square)), RegionRecord::new(2, None)];
/// let found = find_regions_containing_point(&Coordinate::new(0.5, 0.5), &regions);
/// assert!(found[0].contained && found[0].distance.is_none());
/// assert!(!found[1].contained && found[1].distance.is_none());
/// ```
pub fn find_regions_containing_point(
    point: &Coordinate,
    regions: &[RegionRecord],
) -> Vec<RegionContainment> {
    debug!(regions = regions.len(), "point containment lookup");
    regions
        .par_iter()
        .map(|region| match &region.geometry {
            None => RegionContainment {
                id: region.id,
                contained: false,
                distance: None,
            },
            Some(geometry) => {
                let contained = point_in_geometry(point, geometry);
                RegionContainment {
                    id: region.id,
                    contained,
                    distance: if contained {
                        None
                    } else {
                        vertex_centroid(geometry).map(|c| distance(point, &c))
                    },
                }
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionIntersection {
    pub id: i64,
    pub intersects: bool,
}

/// Box of the region used for the coarse intersection scan: the first
/// polygon's exterior ring for a MultiPolygon, the whole geometry otherwise.
fn representative_box(geometry: &RegionGeometry) -> Option<BoundingBox> {
    match geometry {
        RegionGeometry::Polygon { .. } => bounding_box(geometry),
        RegionGeometry::MultiPolygon { coordinates } => coordinates
            .first()
            .and_then(|polygon| polygon.first())
            .and_then(ring_bounding_box),
    }
}

/// Bounding-box intersection of `target` against each region.
pub fn find_intersecting_regions(
    target: &RegionGeometry,
    regions: &[RegionRecord],
) -> Vec<RegionIntersection> {
    let target_box = bounding_box(target);
    regions
        .par_iter()
        .map(|region| {
            let region_box = region.geometry.as_ref().and_then(representative_box);
            let intersects = match (&target_box, region_box) {
                (Some(a), Some(b)) => a.intersects(&b),
                _ => false,
            };
            RegionIntersection {
                id: region.id,
                intersects,
            }
        })
        .collect()
}

/// Closest region (by centroid distance) among those not containing `point`.
///
/// Returns `None` when the point is already inside a region or no region has
/// vertices to measure to.
pub fn nearest_region(point: &Coordinate, regions: &[RegionRecord]) -> Option<RegionContainment> {
    let results = find_regions_containing_point(point, regions);
    if results.iter().any(|r| r.contained) {
        return None;
    }
    results
        .into_iter()
        .filter_map(|r| r.distance.map(|d| (d, r)))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, r)| r)
}

/// Regions whose centroid lies within `radius_m` metres of `point`, plus any
/// region containing it. Results are sorted nearest first; containing
/// regions report a distance of zero.
pub fn regions_within_distance(
    point: &Coordinate,
    regions: &[RegionRecord],
    radius_m: f64,
) -> Vec<(i64, f64)> {
    let mut hits: Vec<(i64, f64)> = find_regions_containing_point(point, regions)
        .into_iter()
        .filter_map(|r| match (r.contained, r.distance) {
            (true, _) => Some((r.id, 0.0)),
            (false, Some(d)) if d <= radius_m => Some((r.id, d)),
            _ => None,
        })
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits
}

/// Union of every region's bounding box, for fitting a map view.
pub fn collection_bounding_box(regions: &[RegionRecord]) -> Option<BoundingBox> {
    regions
        .iter()
        .filter_map(|r| r.geometry.as_ref().and_then(bounding_box))
        .reduce(|acc, b| acc.union(&b))
}
