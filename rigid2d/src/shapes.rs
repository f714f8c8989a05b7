// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Collision shapes
//!
//! The set of shapes is closed: circles and boxes are solid bodies that move
//! with their transform, while edges, paths and polygons describe static
//! outline geometry made of line segments.
//!
//! Outline vertices are stored relative to the entity's position and are
//! translated (never rotated) by it. Scenes that place outline geometry at
//! the origin can therefore give vertices in world coordinates.
//!
//! | Shape     | Bounding box                         | Segments               |
//! |-----------|--------------------------------------|------------------------|
//! | `Circle`  | `[pos - r, pos + r]`                 | none                   |
//! | `Box`     | min/max of the four rotated corners  | none                   |
//! | `Edge`    | min/max of its two points            | `(p1, p2)`             |
//! | `Path`    | min/max over all vertices            | `(i, i + 1)`, open     |
//! | `Polygon` | min/max over all vertices            | `(i, (i + 1) % n)`     |

use crate::ecs::components::Transform;
use crate::ecs::Entity;
use glam::DVec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lower-left corner
    pub min: DVec2,
    /// Upper-right corner
    pub max: DVec2,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Aabb { min, max }
    }

    /// Smallest box enclosing all points, or `None` for an empty set
    pub fn from_points<I>(points: I) -> Option<Aabb>
    where
        I: IntoIterator<Item = DVec2>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Aabb { min, max })
    }

    /// Half-open overlap test on both axes
    ///
    /// Boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// A line segment between two world-space points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point
    pub a: DVec2,
    /// End point
    pub b: DVec2,
}

impl Segment {
    /// Create a segment
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Segment { a, b }
    }

    /// Closest point on the segment to `p`
    ///
    /// Returns `None` for a zero-length segment.
    pub fn closest_point(&self, p: DVec2) -> Option<DVec2> {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq == 0.0 {
            return None;
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        Some(self.a + ab * t)
    }

    /// Unit normal on the left of the direction `a -> b`
    pub fn left_normal(&self) -> Option<DVec2> {
        (self.b - self.a).perp().try_normalize()
    }
}

/// Discriminant of a [`Shape`], used as the narrow-phase dispatch key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Solid circle
    Circle = 0,
    /// Solid (possibly rotated) rectangle
    Box = 1,
    /// Single line segment
    Edge = 2,
    /// Open chain of segments
    Path = 3,
    /// Closed loop of segments
    Polygon = 4,
}

impl ShapeKind {
    /// Number of shape kinds
    pub const COUNT: usize = 5;
}

/// Collision shape of a body
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Solid circle centered on the transform
    Circle {
        /// Radius in meters
        radius: f64,
    },
    /// Solid rectangle centered on the transform and rotated with it
    Box {
        /// Half width and half height
        half_extents: DVec2,
    },
    /// Single segment
    Edge {
        /// First endpoint, relative to the transform position
        p1: DVec2,
        /// Second endpoint, relative to the transform position
        p2: DVec2,
    },
    /// Open chain of segments
    Path {
        /// Ordered vertices, relative to the transform position
        vertices: Vec<DVec2>,
    },
    /// Closed loop of segments
    Polygon {
        /// Ordered vertices, relative to the transform position
        vertices: Vec<DVec2>,
    },
}

impl Shape {
    /// A circle with the given radius
    pub fn circle(radius: f64) -> Self {
        Shape::Circle { radius }
    }

    /// A rectangle with the given half extents
    pub fn rect(half_width: f64, half_height: f64) -> Self {
        Shape::Box {
            half_extents: DVec2::new(half_width, half_height),
        }
    }

    /// A square with the given half extent
    pub fn square(half_extent: f64) -> Self {
        Shape::rect(half_extent, half_extent)
    }

    /// A single segment
    pub fn edge(p1: DVec2, p2: DVec2) -> Self {
        Shape::Edge { p1, p2 }
    }

    /// An open chain through the given vertices
    pub fn path(vertices: Vec<DVec2>) -> Self {
        Shape::Path { vertices }
    }

    /// A closed loop through the given vertices
    pub fn polygon(vertices: Vec<DVec2>) -> Self {
        Shape::Polygon { vertices }
    }

    /// Dispatch tag of this shape
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Box { .. } => ShapeKind::Box,
            Shape::Edge { .. } => ShapeKind::Edge,
            Shape::Path { .. } => ShapeKind::Path,
            Shape::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    /// Conservative bounding box at the given transform
    ///
    /// Returns `None` for outlines with fewer than two vertices, which take
    /// no part in collision.
    pub fn aabb(&self, transform: &Transform) -> Option<Aabb> {
        let pos = transform.position;
        match self {
            Shape::Circle { radius } => {
                let r = DVec2::splat(*radius);
                Some(Aabb::new(pos - r, pos + r))
            }
            Shape::Box { half_extents } => {
                Aabb::from_points(box_corners(pos, transform.rotation, *half_extents))
            }
            Shape::Edge { p1, p2 } => Aabb::from_points([*p1 + pos, *p2 + pos]),
            Shape::Path { vertices } | Shape::Polygon { vertices } => {
                if vertices.len() < 2 {
                    return None;
                }
                Aabb::from_points(vertices.iter().map(|v| *v + pos))
            }
        }
    }

    /// World-space vertices at the given transform
    ///
    /// Boxes yield their four corners counter-clockwise; circles yield none.
    pub fn world_vertices(&self, transform: &Transform) -> Vec<DVec2> {
        let pos = transform.position;
        match self {
            Shape::Circle { .. } => Vec::new(),
            Shape::Box { half_extents } => {
                box_corners(pos, transform.rotation, *half_extents).to_vec()
            }
            Shape::Edge { p1, p2 } => vec![*p1 + pos, *p2 + pos],
            Shape::Path { vertices } | Shape::Polygon { vertices } => {
                vertices.iter().map(|v| *v + pos).collect()
            }
        }
    }

    /// World-space segments of an outline at the given transform
    ///
    /// Paths are open chains and polygons are closed loops. Circles, boxes
    /// and outlines with fewer than two vertices yield no segments.
    pub fn segments(&self, transform: &Transform) -> Vec<Segment> {
        let vertices = match self {
            Shape::Circle { .. } | Shape::Box { .. } => return Vec::new(),
            Shape::Edge { .. } | Shape::Path { .. } | Shape::Polygon { .. } => {
                self.world_vertices(transform)
            }
        };
        let n = vertices.len();
        if n < 2 {
            return Vec::new();
        }

        let closed = matches!(self, Shape::Polygon { .. }) && n > 2;
        let count = if closed { n } else { n - 1 };
        (0..count)
            .map(|i| Segment::new(vertices[i], vertices[(i + 1) % n]))
            .collect()
    }
}

/// Corners of a rotated box, counter-clockwise from the lower-left
pub fn box_corners(center: DVec2, rotation: f64, half_extents: DVec2) -> [DVec2; 4] {
    let rot = DVec2::from_angle(rotation);
    let h = half_extents;
    [
        DVec2::new(-h.x, -h.y),
        DVec2::new(h.x, -h.y),
        DVec2::new(h.x, h.y),
        DVec2::new(-h.x, h.y),
    ]
    .map(|local| center + rot.rotate(local))
}

pub(crate) fn warn_on_degenerate_shape(entity: Entity, shape: &Shape) {
    match shape {
        Shape::Path { vertices } | Shape::Polygon { vertices } if vertices.len() < 2 => {
            log::warn!(
                "{} has a {:?} with {} vertices; it will never collide",
                entity,
                shape.kind(),
                vertices.len()
            );
        }
        Shape::Circle { radius } if *radius <= 0.0 => {
            log::warn!("{} has a circle with non-positive radius {}", entity, radius);
        }
        _ => {}
    }
}
