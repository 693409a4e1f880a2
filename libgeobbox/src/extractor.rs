use bbox::BBox;
use config::{CollectionPolicy, GroupingKey, JobConfig};
use geometry::{decode_record, Geometry, Polygon};
use mapper::{Emission, Map};
use record::{FieldPath, Record};

/// `extract` computes the bounding box of a geometry.
///
/// Components with no coordinates contribute nothing, so `None` is returned when nothing at all
/// was contributed. The empty box is never returned as a value.
///
/// Polygons are bounded by their exterior ring; interior rings cannot widen it. A
/// `GeometryCollection` contributes nothing unless `policy` is `CollectionPolicy::Recurse`.
pub fn extract(geometry: &Geometry, policy: CollectionPolicy) -> Option<BBox> {
    let bbox = bounds(geometry, policy);
    if bbox.is_empty() { None } else { Some(bbox) }
}

fn bounds(geometry: &Geometry, policy: CollectionPolicy) -> BBox {
    match *geometry {
        Geometry::Point(coord) => BBox::point(coord),
        Geometry::LineString(ref coords) |
        Geometry::MultiPoint(ref coords) => BBox::from_coords(coords),
        Geometry::Polygon(ref polygon) => polygon_bounds(polygon),
        Geometry::MultiLineString(ref lines) => {
            lines.iter().map(|line| BBox::from_coords(line)).collect()
        }
        Geometry::MultiPolygon(ref polygons) => polygons.iter().map(polygon_bounds).collect(),
        Geometry::GeometryCollection(ref members) => {
            match policy {
                CollectionPolicy::Skip => BBox::Empty,
                CollectionPolicy::Recurse => {
                    members.iter().map(|member| bounds(member, policy)).collect()
                }
            }
        }
    }
}

fn polygon_bounds(polygon: &Polygon) -> BBox {
    match polygon.exterior() {
        Some(ring) => BBox::from_coords(ring),
        None => BBox::Empty,
    }
}

/// `BBoxExtractor` is the map phase of a bounding box job.
///
/// For each record it decodes the geometry at the configured path and emits its bounding box
/// under the record's grouping key. Records without a usable geometry emit nothing.
pub struct BBoxExtractor {
    geometry_path: FieldPath,
    key: GroupingKey,
    collections: CollectionPolicy,
}

impl BBoxExtractor {
    pub fn new(config: &JobConfig) -> Self {
        BBoxExtractor {
            geometry_path: config.geometry_path.clone(),
            key: config.key.clone(),
            collections: config.collections,
        }
    }
}

impl Default for BBoxExtractor {
    fn default() -> Self {
        BBoxExtractor::new(&JobConfig::default())
    }
}

impl Map for BBoxExtractor {
    type Key = String;
    type Value = BBox;

    fn map(&self, record: &Record) -> Option<Emission<Self::Key, Self::Value>> {
        let geometry = match decode_record(record, &self.geometry_path) {
            Some(geometry) => geometry,
            None => {
                debug!("No geometry at '{}', skipping record.", self.geometry_path);
                return None;
            }
        };

        match extract(&geometry, self.collections) {
            Some(bbox) => Some(Emission::new(self.key.key_for(record), bbox)),
            None => {
                debug!(
                    "{} contributes no bounding box, skipping record.",
                    geometry.type_name()
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::{decode, Coord};

    fn extract_json(field: ::serde_json::Value) -> Option<BBox> {
        decode(Some(&field)).and_then(|geometry| extract(&geometry, CollectionPolicy::Skip))
    }

    #[test]
    fn point_bbox() {
        assert_eq!(
            Some(BBox::new(3.0, 4.0, 3.0, 4.0)),
            extract(&Geometry::Point(Coord::new(3.0, 4.0)), CollectionPolicy::Skip)
        );
    }

    #[test]
    fn line_string_bbox() {
        let bbox = extract_json(json!({
            "type": "LineString",
            "coordinates": [[0, 0], [2, 3], [-1, 5]]
        }));

        assert_eq!(Some(BBox::new(-1.0, 0.0, 2.0, 5.0)), bbox);
    }

    #[test]
    fn multi_point_bbox() {
        let bbox = extract_json(json!({
            "type": "MultiPoint",
            "coordinates": [[10, -3], [4, 8]]
        }));

        assert_eq!(Some(BBox::new(4.0, -3.0, 10.0, 8.0)), bbox);
    }

    #[test]
    fn polygon_bbox_ignores_interior_rings() {
        let exterior = json!([[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]]);
        let without_hole = extract_json(json!({
            "type": "Polygon",
            "coordinates": [exterior.clone()]
        }));
        // A malformed hole poking outside the shell still cannot widen the box.
        let with_hole = extract_json(json!({
            "type": "Polygon",
            "coordinates": [exterior, [[1, 1], [9, 1], [9, -9], [1, 1]]]
        }));

        assert_eq!(Some(BBox::new(0.0, 0.0, 4.0, 4.0)), without_hole);
        assert_eq!(without_hole, with_hole);
    }

    #[test]
    fn multi_line_string_bbox() {
        let bbox = extract_json(json!({
            "type": "MultiLineString",
            "coordinates": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]]
        }));

        assert_eq!(Some(BBox::new(0.0, 0.0, 3.0, 3.0)), bbox);
    }

    #[test]
    fn multi_polygon_bbox_is_union_of_exterior_rings() {
        // Each component contributes its whole exterior ring, not just its first coordinate:
        // the box must reach (6, 7) which only appears mid-ring in the second polygon.
        let bbox = extract_json(json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                [[[5, 5], [6, 5], [6, 7], [5, 5]], [[5.5, 5.5], [20, 5.5], [5.5, 5.6], [5.5, 5.5]]]
            ]
        }));

        assert_eq!(Some(BBox::new(0.0, 0.0, 6.0, 7.0)), bbox);
    }

    #[test]
    fn empty_components_contribute_nothing() {
        let lines = extract_json(json!({
            "type": "MultiLineString",
            "coordinates": [[], [[2, 2], [3, 3]], []]
        }));
        let polygons = extract_json(json!({
            "type": "MultiPolygon",
            "coordinates": [[], [[]], [[[1, 1], [2, 1], [2, 2], [1, 1]]]]
        }));
        let nothing = extract_json(json!({
            "type": "MultiLineString",
            "coordinates": [[], []]
        }));

        assert_eq!(Some(BBox::new(2.0, 2.0, 3.0, 3.0)), lines);
        assert_eq!(Some(BBox::new(1.0, 1.0, 2.0, 2.0)), polygons);
        assert_eq!(None, nothing);
    }

    #[test]
    fn geometry_collection_contributes_nothing_by_default() {
        let collection = decode(Some(&json!({
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [1, 2]},
                {"type": "LineString", "coordinates": [[-1, 0], [3, 3]]}
            ]
        }))).unwrap();

        assert_eq!(None, extract(&collection, CollectionPolicy::Skip));
        assert_eq!(
            Some(BBox::new(-1.0, 0.0, 3.0, 3.0)),
            extract(&collection, CollectionPolicy::Recurse)
        );
    }

    #[test]
    fn extract_is_idempotent() {
        let geometry = Geometry::MultiPoint(vec![Coord::new(1.0, 9.0), Coord::new(-4.0, 2.0)]);

        assert_eq!(
            extract(&geometry, CollectionPolicy::Skip),
            extract(&geometry, CollectionPolicy::Skip)
        );
    }

    #[test]
    fn extractor_emits_under_constant_key() {
        let extractor = BBoxExtractor::default();
        let record = Record::new(json!({
            "geometry": {"type": "Point", "coordinates": [3, 4]}
        }));

        assert_eq!(
            Some(Emission::new("bbox".to_owned(), BBox::new(3.0, 4.0, 3.0, 4.0))),
            extractor.map(&record)
        );
    }

    #[test]
    fn extractor_emits_nothing_for_absent_geometry() {
        let extractor = BBoxExtractor::default();
        let records = vec![
            Record::new(json!({"name": "no geometry"})),
            Record::new(json!({"geometry": null})),
            Record::new(json!({"geometry": {"type": "LineString", "coordinates": []}})),
            Record::new(json!({"geometry": {"type": "Curve", "coordinates": [[0, 0]]}})),
            Record::new(json!({"geometry": {"type": "GeometryCollection", "geometries": [
                {"type": "Point", "coordinates": [1, 2]}
            ]}})),
        ];

        for record in &records {
            assert_eq!(None, extractor.map(record), "record: {:?}", record);
        }
    }

    #[test]
    fn extractor_uses_configured_path_and_key() {
        let config = JobConfig {
            geometry_path: FieldPath::new("loc"),
            key: GroupingKey::Attribute {
                path: FieldPath::new("layer"),
                fallback: "unlayered".to_owned(),
            },
            ..JobConfig::default()
        };
        let extractor = BBoxExtractor::new(&config);
        let record = Record::new(json!({
            "layer": "roads",
            "loc": {"type": "LineString", "coordinates": [[0, 0], [1, 2]]}
        }));

        assert_eq!(
            Some(Emission::new("roads".to_owned(), BBox::new(0.0, 0.0, 1.0, 2.0))),
            extractor.map(&record)
        );
    }
}
