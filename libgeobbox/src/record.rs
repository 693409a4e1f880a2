use std::fmt;

use serde_json::{self, Value};

use errors::*;

/// `FieldPath` addresses a value inside a record through nested objects.
///
/// Paths are written with the `.` separator, e.g. `"loc.geom"`. Empty segments are ignored, so
/// the empty path addresses the record document itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(path: &str) -> Self {
        FieldPath {
            segments: path.split('.')
                .filter(|segment| !segment.is_empty())
                .map(|segment| segment.to_owned())
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn join(&self) -> String {
        self.segments.join(".")
    }
}

impl<'a> From<&'a str> for FieldPath {
    fn from(path: &'a str) -> Self {
        FieldPath::new(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        FieldPath::new(&path)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.join()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.join())
    }
}

/// A `Record` is a single document of the collection being aggregated.
///
/// Records are only ever read. Nothing about the document's shape is assumed until a field is
/// looked up.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record(Value);

impl Record {
    pub fn new(document: Value) -> Self {
        Record(document)
    }

    /// Parses a single JSON document into a `Record`.
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Record(serde_json::from_str(input)?))
    }

    pub fn document(&self) -> &Value {
        &self.0
    }

    /// Follows `path` through nested objects, returning `None` if any segment is missing or a
    /// non-object value is met on the way.
    pub fn lookup(&self, path: &FieldPath) -> Option<&Value> {
        path.segments().iter().fold(Some(&self.0), |current, segment| {
            current.and_then(Value::as_object).and_then(
                |object| object.get(segment),
            )
        })
    }
}

impl From<Value> for Record {
    fn from(document: Value) -> Self {
        Record(document)
    }
}
