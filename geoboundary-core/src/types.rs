//! Boundary data model.
//!
//! Geometries arrive as GeoJSON `Polygon` / `MultiPolygon` objects and are
//! held as plain coordinate vectors so that unclosed or undersized rings can
//! still be represented (and reported) rather than silently repaired.

use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

/// A `(longitude, latitude)` pair in degrees.
///
/// Serializes as a GeoJSON position `[lon, lat]`. Positions carrying an
/// altitude are accepted and the extra ordinates dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { lon: 0.0, lat: 0.0 };

    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl TryFrom<Vec<f64>> for Coordinate {
    type Error = String;

    fn try_from(position: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        match position.as_slice() {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(format!(
                "position needs at least 2 ordinates, found {}",
                position.len()
            )),
        }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(c: Coordinate) -> Self {
        Coord { x: c.lon, y: c.lat }
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(c: Coordinate) -> Self {
        Point::new(c.lon, c.lat)
    }
}

/// Closed loop of coordinates; first == last once validated.
pub type CoordinateRing = Vec<Coordinate>;

/// Exterior ring followed by zero or more hole rings.
pub type PolygonCoordinates = Vec<CoordinateRing>;

/// A region outline: the unit of input and output for every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegionGeometry {
    Polygon {
        coordinates: PolygonCoordinates,
    },
    MultiPolygon {
        coordinates: Vec<PolygonCoordinates>,
    },
}

impl RegionGeometry {
    /// GeoJSON `type` name.
    pub fn type_name(&self) -> &'static str {
        match self {
            RegionGeometry::Polygon { .. } => "Polygon",
            RegionGeometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }

    /// Constituent polygons; a `Polygon` yields itself.
    pub fn polygons(&self) -> impl Iterator<Item = &PolygonCoordinates> {
        let polys: &[PolygonCoordinates] = match self {
            RegionGeometry::Polygon { coordinates } => std::slice::from_ref(coordinates),
            RegionGeometry::MultiPolygon { coordinates } => coordinates,
        };
        polys.iter()
    }

    /// Every ring of every polygon, exteriors and holes alike.
    pub fn rings(&self) -> impl Iterator<Item = &CoordinateRing> {
        self.polygons().flat_map(|p| p.iter())
    }

    /// Every coordinate of every ring.
    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> {
        self.rings().flat_map(|r| r.iter())
    }

    /// Convert into a `geo` multipolygon. `geo` closes rings implicitly, so
    /// only call this on geometry that has passed validation.
    pub fn to_geo(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons().map(polygon_to_geo).collect())
    }
}

pub(crate) fn ring_to_geo(ring: &CoordinateRing) -> LineString<f64> {
    LineString::new(ring.iter().copied().map(Coord::from).collect())
}

pub(crate) fn polygon_to_geo(polygon: &PolygonCoordinates) -> Polygon<f64> {
    let mut rings = polygon.iter().map(ring_to_geo);
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

fn polygon_from_geo(polygon: &Polygon<f64>) -> PolygonCoordinates {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ls| ls.coords().copied().map(Coordinate::from).collect())
        .collect()
}

impl From<Polygon<f64>> for RegionGeometry {
    fn from(polygon: Polygon<f64>) -> Self {
        RegionGeometry::Polygon {
            coordinates: polygon_from_geo(&polygon),
        }
    }
}

impl From<MultiPolygon<f64>> for RegionGeometry {
    fn from(mp: MultiPolygon<f64>) -> Self {
        RegionGeometry::MultiPolygon {
            coordinates: mp.0.iter().map(polygon_from_geo).collect(),
        }
    }
}

/// Axis-aligned extent in degrees. Always derived from a geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Smallest box covering `coords`, or `None` when there are none.
    pub(crate) fn from_coordinates<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        coords.into_iter().fold(None, |acc, c| {
            Some(match acc {
                None => BoundingBox {
                    north: c.lat,
                    south: c.lat,
                    east: c.lon,
                    west: c.lon,
                },
                Some(b) => BoundingBox {
                    north: b.north.max(c.lat),
                    south: b.south.min(c.lat),
                    east: b.east.max(c.lon),
                    west: b.west.min(c.lon),
                },
            })
        })
    }

    /// True unless one box lies entirely east, west, north or south of the other.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.west > other.east
            || self.east < other.west
            || self.south > other.north
            || self.north < other.south)
    }

    /// Inclusive point-in-box test.
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.west..=self.east).contains(&point.lon)
            && (self.south..=self.north).contains(&point.lat)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
        }
    }
}

/// A region row handed over by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: i64,
    pub geometry: Option<RegionGeometry>,
}

impl RegionRecord {
    pub fn new(id: i64, geometry: Option<RegionGeometry>) -> Self {
        Self { id, geometry }
    }
}

/// A region row whose geometry column has not been parsed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRegionRecord {
    pub id: i64,
    pub geometry: Option<serde_json::Value>,
}
