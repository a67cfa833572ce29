//! Typed geometry tree used by every sanitizer stage.
//!
//! Raw `GeoJSON` coordinates are read leniently: a position member that is
//! not a JSON number becomes `NaN` so the normalizer can count and discard
//! it instead of failing the whole file. Rings are a distinct type from
//! plain coordinate lines so ring-only repairs are addressed by type.

use geo::BoundingRect as _;
use ixstats_sanitize_models::LngLat;
use serde_json::Value;

use crate::SanitizeError;

/// One closed loop of a polygon boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring(pub Vec<LngLat>);

impl Ring {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Exterior ring followed by any holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon(pub Vec<Ring>);

impl Polygon {
    /// Visits every vertex of every ring.
    pub fn coords(&self) -> impl Iterator<Item = &LngLat> {
        self.0.iter().flat_map(|ring| ring.0.iter())
    }

    /// Minimum and maximum longitude over all rings.
    #[must_use]
    pub fn lng_range(&self) -> Option<(f64, f64)> {
        lng_range(self.coords())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Ring::is_empty)
    }
}

/// A `GeoJSON` geometry with explicit ring and polygon types.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// `None` once the only position has been discarded.
    Point(Option<LngLat>),
    MultiPoint(Vec<LngLat>),
    LineString(Vec<LngLat>),
    MultiLineString(Vec<Vec<LngLat>>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Self>),
}

impl Shape {
    /// The `GeoJSON` type name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::MultiPoint(_) => "MultiPoint",
            Self::LineString(_) => "LineString",
            Self::MultiLineString(_) => "MultiLineString",
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
            Self::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Calls `f` on every vertex in document order.
    pub fn for_each_coord(&self, f: &mut impl FnMut(&LngLat)) {
        match self {
            Self::Point(point) => point.iter().for_each(|c| f(c)),
            Self::MultiPoint(coords) | Self::LineString(coords) => coords.iter().for_each(|c| f(c)),
            Self::MultiLineString(lines) => lines.iter().flatten().for_each(|c| f(c)),
            Self::Polygon(polygon) => polygon.coords().for_each(|c| f(c)),
            Self::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(Polygon::coords)
                .for_each(|c| f(c)),
            Self::GeometryCollection(shapes) => {
                for shape in shapes {
                    shape.for_each_coord(f);
                }
            }
        }
    }

    /// Number of vertices in the whole tree.
    #[must_use]
    pub fn coord_count(&self) -> usize {
        let mut count = 0;
        self.for_each_coord(&mut |_| count += 1);
        count
    }

    /// Whether the geometry has no vertices left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coord_count() == 0
    }

    /// Parses a `GeoJSON` geometry object.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::Geometry`] if the object has no known `type`
    /// or its coordinate nesting does not match that type.
    pub fn from_json(value: &Value) -> Result<Self, SanitizeError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| geometry_error("geometry has no \"type\""))?;

        if kind == "GeometryCollection" {
            let members = value
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| geometry_error("GeometryCollection has no \"geometries\" array"))?;
            return members
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::GeometryCollection);
        }

        let coords = value
            .get("coordinates")
            .ok_or_else(|| geometry_error(&format!("{kind} has no \"coordinates\"")))?;

        Ok(match kind {
            "Point" => {
                let items = as_array(coords, kind)?;
                Self::Point((!items.is_empty()).then(|| parse_position(coords)))
            }
            "MultiPoint" => Self::MultiPoint(parse_line(coords, kind)?),
            "LineString" => Self::LineString(parse_line(coords, kind)?),
            "MultiLineString" => Self::MultiLineString(
                as_array(coords, kind)?
                    .iter()
                    .map(|line| parse_line(line, kind))
                    .collect::<Result<_, _>>()?,
            ),
            "Polygon" => Self::Polygon(parse_polygon(coords, kind)?),
            "MultiPolygon" => Self::MultiPolygon(
                as_array(coords, kind)?
                    .iter()
                    .map(|polygon| parse_polygon(polygon, kind))
                    .collect::<Result<_, _>>()?,
            ),
            other => return Err(geometry_error(&format!("unsupported geometry type {other}"))),
        })
    }

    /// Converts to the `geojson` crate's geometry value.
    #[must_use]
    pub fn to_geojson(&self) -> geojson::Value {
        match self {
            Self::Point(point) => geojson::Value::Point(point.map_or_else(Vec::new, position)),
            Self::MultiPoint(coords) => geojson::Value::MultiPoint(line(coords)),
            Self::LineString(coords) => geojson::Value::LineString(line(coords)),
            Self::MultiLineString(lines) => {
                geojson::Value::MultiLineString(lines.iter().map(|l| line(l)).collect())
            }
            Self::Polygon(polygon) => geojson::Value::Polygon(polygon_rings(polygon)),
            Self::MultiPolygon(polygons) => {
                geojson::Value::MultiPolygon(polygons.iter().map(polygon_rings).collect())
            }
            Self::GeometryCollection(shapes) => geojson::Value::GeometryCollection(
                shapes
                    .iter()
                    .map(|shape| geojson::Geometry::new(shape.to_geojson()))
                    .collect(),
            ),
        }
    }

    /// Converts to a `geo` geometry, or `None` when nothing is left.
    #[must_use]
    pub fn to_geo(&self) -> Option<geo::Geometry<f64>> {
        if self.is_empty() {
            return None;
        }
        Some(match self {
            Self::Point(point) => {
                let c = (*point)?;
                geo::Geometry::Point(geo::Point::new(c.lng, c.lat))
            }
            Self::MultiPoint(coords) => geo::Geometry::MultiPoint(
                coords
                    .iter()
                    .map(|c| geo::Point::new(c.lng, c.lat))
                    .collect(),
            ),
            Self::LineString(coords) => geo::Geometry::LineString(geo_line(coords)),
            Self::MultiLineString(lines) => geo::Geometry::MultiLineString(geo::MultiLineString(
                lines.iter().map(|l| geo_line(l)).collect(),
            )),
            Self::Polygon(polygon) => geo::Geometry::Polygon(geo_polygon(polygon)?),
            Self::MultiPolygon(polygons) => geo::Geometry::MultiPolygon(geo::MultiPolygon(
                polygons.iter().filter_map(geo_polygon).collect(),
            )),
            Self::GeometryCollection(shapes) => geo::Geometry::GeometryCollection(
                geo::GeometryCollection(shapes.iter().filter_map(Self::to_geo).collect()),
            ),
        })
    }

    /// `[min_lng, min_lat, max_lng, max_lat]`, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<[f64; 4]> {
        let rect = self.to_geo()?.bounding_rect()?;
        Some([rect.min().x, rect.min().y, rect.max().x, rect.max().y])
    }
}

/// Merges two `[min_lng, min_lat, max_lng, max_lat]` boxes.
#[must_use]
pub fn union_bounds(a: Option<[f64; 4]>, b: Option<[f64; 4]>) -> Option<[f64; 4]> {
    match (a, b) {
        (Some(a), Some(b)) => Some([
            a[0].min(b[0]),
            a[1].min(b[1]),
            a[2].max(b[2]),
            a[3].max(b[3]),
        ]),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Minimum and maximum longitude over a set of vertices.
pub fn lng_range<'a>(coords: impl IntoIterator<Item = &'a LngLat>) -> Option<(f64, f64)> {
    coords.into_iter().fold(None, |range, c| {
        Some(range.map_or((c.lng, c.lng), |(min, max): (f64, f64)| {
            (min.min(c.lng), max.max(c.lng))
        }))
    })
}

fn geometry_error(message: &str) -> SanitizeError {
    SanitizeError::Geometry {
        message: message.to_string(),
    }
}

fn as_array<'a>(value: &'a Value, kind: &str) -> Result<&'a Vec<Value>, SanitizeError> {
    value
        .as_array()
        .ok_or_else(|| geometry_error(&format!("{kind} coordinates are not nested arrays")))
}

/// Reads one position. Missing or non-numeric members become `NaN`.
fn parse_position(value: &Value) -> LngLat {
    let member = |i: usize| {
        value
            .as_array()
            .and_then(|items| items.get(i))
            .and_then(Value::as_f64)
            .unwrap_or(f64::NAN)
    };
    LngLat::new(member(0), member(1))
}

fn parse_line(value: &Value, kind: &str) -> Result<Vec<LngLat>, SanitizeError> {
    Ok(as_array(value, kind)?.iter().map(parse_position).collect())
}

fn parse_polygon(value: &Value, kind: &str) -> Result<Polygon, SanitizeError> {
    Ok(Polygon(
        as_array(value, kind)?
            .iter()
            .map(|ring| parse_line(ring, kind).map(Ring))
            .collect::<Result<_, _>>()?,
    ))
}

fn position(c: LngLat) -> geojson::Position {
    vec![c.lng, c.lat]
}

fn line(coords: &[LngLat]) -> Vec<geojson::Position> {
    coords.iter().copied().map(position).collect()
}

fn polygon_rings(polygon: &Polygon) -> Vec<Vec<geojson::Position>> {
    polygon.0.iter().map(|ring| line(&ring.0)).collect()
}

fn geo_line(coords: &[LngLat]) -> geo::LineString<f64> {
    coords
        .iter()
        .map(|c| geo::Coord { x: c.lng, y: c.lat })
        .collect()
}

fn geo_polygon(polygon: &Polygon) -> Option<geo::Polygon<f64>> {
    let (exterior, holes) = polygon.0.split_first()?;
    if exterior.is_empty() {
        return None;
    }
    Some(geo::Polygon::new(
        geo_line(&exterior.0),
        holes.iter().map(|ring| geo_line(&ring.0)).collect(),
    ))
}
