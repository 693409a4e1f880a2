use geojson;
use serde_json::Value;

use record::{FieldPath, Record};

/// A planar coordinate. Any ordinates after x and y in the source are dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Coord { x, y }
    }
}

/// A polygon as a sequence of rings, the first of which is the exterior ring.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Vec<Coord>>,
}

impl Polygon {
    pub fn new(rings: Vec<Vec<Coord>>) -> Self {
        Polygon { rings }
    }

    pub fn exterior(&self) -> Option<&[Coord]> {
        self.rings.first().map(|ring| ring.as_slice())
    }

    pub fn interiors(&self) -> &[Vec<Coord>] {
        if self.rings.is_empty() {
            &[]
        } else {
            &self.rings[1..]
        }
    }
}

/// A decoded geometry, each variant carrying the coordinate nesting of its type.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon(Polygon),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match *self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }
}

/// `decode` interprets a record's geometry field as a typed `Geometry`.
///
/// The field is parsed as a GeoJSON geometry object. Decoding never fails: `None` is returned
/// when the field is missing or is not a GeoJSON geometry (which includes an unrecognised type
/// tag), when its coordinate structure (or member list, for a collection) has zero length, or
/// when a leaf position has fewer than two ordinates.
///
/// Components nested inside the top level may be empty; they are kept so that the extractor can
/// skip them.
pub fn decode(field: Option<&Value>) -> Option<Geometry> {
    let field = field?;
    if let Some(members) = collection_members(field) {
        // Each member is parsed on its own and dropped if it cannot be decoded.
        return non_empty(members).map(|members| {
            Geometry::GeometryCollection(
                members.iter().filter_map(|member| decode(Some(member))).collect(),
            )
        });
    }

    geojson::Geometry::from_json_value(field.clone())
        .ok()
        .and_then(|geometry| from_geojson(geometry.value))
}

/// Decodes the geometry found at `path` in `record`.
pub fn decode_record(record: &Record, path: &FieldPath) -> Option<Geometry> {
    decode(record.lookup(path))
}

fn collection_members(field: &Value) -> Option<&Vec<Value>> {
    let object = field.as_object()?;
    if object.get("type").and_then(Value::as_str) != Some("GeometryCollection") {
        return None;
    }
    object.get("geometries").and_then(Value::as_array)
}

fn from_geojson(value: geojson::Value) -> Option<Geometry> {
    match value {
        geojson::Value::Point(position) => coord_from(&position).map(Geometry::Point),
        geojson::Value::MultiPoint(positions) => {
            coord_seq(non_empty(&positions)?).map(Geometry::MultiPoint)
        }
        geojson::Value::LineString(positions) => {
            coord_seq(non_empty(&positions)?).map(Geometry::LineString)
        }
        geojson::Value::MultiLineString(lines) => {
            nested(non_empty(&lines)?, |line| coord_seq(line)).map(Geometry::MultiLineString)
        }
        geojson::Value::Polygon(rings) => polygon_from(non_empty(&rings)?).map(Geometry::Polygon),
        geojson::Value::MultiPolygon(polygons) => {
            nested(non_empty(&polygons)?, |rings| polygon_from(rings))
                .map(Geometry::MultiPolygon)
        }
        geojson::Value::GeometryCollection(members) => {
            if members.is_empty() {
                return None;
            }
            Some(Geometry::GeometryCollection(
                members
                    .into_iter()
                    .filter_map(|member| from_geojson(member.value))
                    .collect(),
            ))
        }
    }
}

fn non_empty<T>(items: &[T]) -> Option<&[T]> {
    if items.is_empty() { None } else { Some(items) }
}

fn coord_from(position: &[f64]) -> Option<Coord> {
    if position.len() < 2 {
        return None;
    }
    Some(Coord::new(position[0], position[1]))
}

fn coord_seq(positions: &[geojson::Position]) -> Option<Vec<Coord>> {
    positions.iter().map(|position| coord_from(position)).collect()
}

fn polygon_from(rings: &[Vec<geojson::Position>]) -> Option<Polygon> {
    nested(rings, |ring| coord_seq(ring)).map(Polygon::new)
}

fn nested<I, T, F>(items: &[I], decode_item: F) -> Option<Vec<T>>
where
    F: Fn(&I) -> Option<T>,
{
    items.iter().map(decode_item).collect()
}
