//! Shapes and the shape-pair -> contact category table
//!
//! ShapeType ordering is load-bearing: detectors receive the lower type first.
//! The lookup table is filled for both triangle halves, so `contact_type` is
//! symmetric and callers can query either permutation.

use serde::{Deserialize, Serialize};

use crate::core::Vec2;

/// Shape kinds, totally ordered: Point < Circle < Edge < Box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShapeType {
    Point = 0,
    Circle = 1,
    Edge = 2,
    Box = 3,
}

impl ShapeType {
    pub const ALL: [ShapeType; 4] = [
        ShapeType::Point,
        ShapeType::Circle,
        ShapeType::Edge,
        ShapeType::Box,
    ];
}

/// Contact category for an ordered pair of non-point shape kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ContactType {
    CircleAndCircle = 0,
    CircleAndEdge = 1,
    CircleAndBox = 2,
    EdgeAndEdge = 3,
    EdgeAndBox = 4,
    BoxAndBox = 5,
}

pub const CONTACT_TYPE_COUNT: usize = 6;

impl ContactType {
    pub const ALL: [ContactType; CONTACT_TYPE_COUNT] = [
        ContactType::CircleAndCircle,
        ContactType::CircleAndEdge,
        ContactType::CircleAndBox,
        ContactType::EdgeAndEdge,
        ContactType::EdgeAndBox,
        ContactType::BoxAndBox,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

// Rows/columns: Circle, Edge, Box (Point has no category).
const CONTACT_TYPE_MAP: [[ContactType; 3]; 3] = [
    [
        ContactType::CircleAndCircle,
        ContactType::CircleAndEdge,
        ContactType::CircleAndBox,
    ],
    [
        ContactType::CircleAndEdge,
        ContactType::EdgeAndEdge,
        ContactType::EdgeAndBox,
    ],
    [
        ContactType::CircleAndBox,
        ContactType::EdgeAndBox,
        ContactType::BoxAndBox,
    ],
];

/// Category of a shape pair. `None` when either side is a point.
#[inline]
pub fn contact_type(a: ShapeType, b: ShapeType) -> Option<ContactType> {
    let row = (a as usize).checked_sub(1)?;
    let col = (b as usize).checked_sub(1)?;
    Some(CONTACT_TYPE_MAP[row][col])
}

/// Collision shape bound to a particle. Geometry is in local coordinates,
/// relative to the owning particle's position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Point,
    Circle { radius: f64 },
    Edge { start: Vec2, end: Vec2 },
    Box { half_extents: Vec2 },
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Shape::Circle { radius }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Point => ShapeType::Point,
            Shape::Circle { .. } => ShapeType::Circle,
            Shape::Edge { .. } => ShapeType::Edge,
            Shape::Box { .. } => ShapeType::Box,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Shape::Point)
    }
}
