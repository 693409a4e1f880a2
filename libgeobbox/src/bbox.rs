use std::iter::FromIterator;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use geometry::Coord;

/// `BBox` is an axis-aligned bounding box, or the explicit empty box.
///
/// Together with `merge`, boxes form a commutative monoid with `BBox::Empty` as the identity:
///
/// ```
/// use geobbox::BBox;
///
/// let a = BBox::new(0.0, 0.0, 1.0, 1.0);
/// let b = BBox::new(2.0, 2.0, 3.0, 3.0);
///
/// assert_eq!(a.merge(b), b.merge(a));
/// assert_eq!(a, a.merge(BBox::Empty));
/// assert_eq!(BBox::new(0.0, 0.0, 3.0, 3.0), a.merge(b));
/// ```
///
/// A non-empty box always satisfies `min_x <= max_x` and `min_y <= max_y`.
///
/// On the wire a box is written as `{"x1": min_x, "y1": min_y, "x2": max_x, "y2": max_y}` and
/// the empty box as `null`. Reading `null` yields the empty box, so a missing partial result acts
/// as the identity when merged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BBox {
    Empty,
    Extent {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
}

impl Default for BBox {
    fn default() -> Self {
        BBox::Empty
    }
}

impl BBox {
    pub fn empty() -> Self {
        BBox::Empty
    }

    /// Constructs a box from two opposite corners, in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        BBox::Extent {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    pub fn point(coord: Coord) -> Self {
        BBox::Extent {
            min_x: coord.x,
            min_y: coord.y,
            max_x: coord.x,
            max_y: coord.y,
        }
    }

    /// The smallest box containing every coordinate, or `BBox::Empty` for no coordinates.
    pub fn from_coords<'a, I>(coords: I) -> Self
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        coords.into_iter().fold(BBox::Empty, |bbox, coord| {
            bbox.expand_to_include(*coord)
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == BBox::Empty
    }

    /// Merges two boxes into the smallest box containing both.
    pub fn merge(self, other: BBox) -> BBox {
        match (self, other) {
            (BBox::Empty, bbox) | (bbox, BBox::Empty) => bbox,
            (BBox::Extent {
                 min_x: a_min_x,
                 min_y: a_min_y,
                 max_x: a_max_x,
                 max_y: a_max_y,
             },
             BBox::Extent {
                 min_x: b_min_x,
                 min_y: b_min_y,
                 max_x: b_max_x,
                 max_y: b_max_y,
             }) => BBox::Extent {
                min_x: a_min_x.min(b_min_x),
                min_y: a_min_y.min(b_min_y),
                max_x: a_max_x.max(b_max_x),
                max_y: a_max_y.max(b_max_y),
            },
        }
    }

    pub fn expand_to_include(self, coord: Coord) -> BBox {
        self.merge(BBox::point(coord))
    }

    /// Returns `[min_x, min_y, max_x, max_y]`, or `None` for the empty box.
    pub fn to_array(&self) -> Option<[f64; 4]> {
        match *self {
            BBox::Empty => None,
            BBox::Extent {
                min_x,
                min_y,
                max_x,
                max_y,
            } => Some([min_x, min_y, max_x, max_y]),
        }
    }

    pub fn min_x(&self) -> Option<f64> {
        self.to_array().map(|bounds| bounds[0])
    }

    pub fn min_y(&self) -> Option<f64> {
        self.to_array().map(|bounds| bounds[1])
    }

    pub fn max_x(&self) -> Option<f64> {
        self.to_array().map(|bounds| bounds[2])
    }

    pub fn max_y(&self) -> Option<f64> {
        self.to_array().map(|bounds| bounds[3])
    }

    pub fn width(&self) -> Option<f64> {
        self.to_array().map(|bounds| bounds[2] - bounds[0])
    }

    pub fn height(&self) -> Option<f64> {
        self.to_array().map(|bounds| bounds[3] - bounds[1])
    }

    pub fn contains_coord(&self, coord: Coord) -> bool {
        match self.to_array() {
            Some(bounds) => {
                coord.x >= bounds[0] && coord.y >= bounds[1] && coord.x <= bounds[2] &&
                    coord.y <= bounds[3]
            }
            None => false,
        }
    }
}

impl FromIterator<BBox> for BBox {
    fn from_iter<I: IntoIterator<Item = BBox>>(iter: I) -> Self {
        iter.into_iter().fold(BBox::Empty, BBox::merge)
    }
}

/// The wire form of a non-empty box.
#[derive(Serialize, Deserialize)]
struct Envelope {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl Serialize for BBox {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let envelope = self.to_array().map(|bounds| {
            Envelope {
                x1: bounds[0],
                y1: bounds[1],
                x2: bounds[2],
                y2: bounds[3],
            }
        });
        envelope.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BBox {
    fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let envelope: Option<Envelope> = Option::deserialize(deserializer)?;
        Ok(match envelope {
            Some(envelope) => BBox::new(envelope.x1, envelope.y1, envelope.x2, envelope.y2),
            None => BBox::Empty,
        })
    }
}
