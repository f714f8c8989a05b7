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
//! Contact resolution primitives
//!
//! Every resolution is an instantaneous, stateless correction: bodies are
//! pushed apart along the contact normal and the normal component of their
//! velocity is exchanged (between two dynamic bodies) or reflected (against
//! an immovable one). Tangential velocity is never touched.
//!
//! The normal is computed once per contact and used for both the positional
//! push and the velocity update; it is not recomputed after positions move.
//!
//! Velocity is only changed while the bodies approach each other along the
//! normal. A pair that is already separating keeps its velocity.

use crate::ecs::components::{Collider, Rigidbody, Transform};
use crate::ecs::{Entity, World};
use crate::shapes::{Segment, Shape};
use glam::DVec2;

/// Copy of the state of one body taking part in a contact
///
/// Resolution works on copies so two bodies can be updated at once; the
/// result is written back to the world afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Body {
    pub position: DVec2,
    pub rotation: f64,
    pub velocity: DVec2,
    pub mass: f64,
    pub kinematic: bool,
    pub valid_mass: bool,
    pub collider: Collider,
}

impl Body {
    /// Snapshot an entity; bodies without a collider have restitution 0
    pub fn read(world: &World, entity: Entity) -> Option<Body> {
        let transform = world.get::<Transform>(entity)?;
        let rigidbody = world.get::<Rigidbody>(entity)?;
        let collider = world.get::<Collider>(entity).copied().unwrap_or_default();
        Some(Body {
            position: transform.position,
            rotation: transform.rotation,
            velocity: rigidbody.velocity,
            mass: rigidbody.mass,
            kinematic: rigidbody.is_kinematic,
            valid_mass: rigidbody.has_valid_mass(),
            collider,
        })
    }

    /// Store position and velocity back into the world
    ///
    /// Kinematic bodies are never written.
    pub fn write(&self, world: &mut World, entity: Entity) {
        if self.kinematic {
            return;
        }
        if let Some(transform) = world.get_mut::<Transform>(entity) {
            transform.position = self.position;
        }
        if let Some(rigidbody) = world.get_mut::<Rigidbody>(entity) {
            rigidbody.velocity = self.velocity;
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }
}

/// Penetration of `second` into `first`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Contact {
    /// Unit normal pointing from the first body towards the second
    pub normal: DVec2,
    /// Penetration depth along the normal
    pub depth: f64,
}

/// Normal velocities after a collision between two dynamic bodies
///
/// ```text
/// v1' = (m1 v1 + m2 v2 - m2 (v1 - v2) e) / (m1 + m2)
/// v2' = (m1 v1 + m2 v2 - m1 (v2 - v1) e) / (m1 + m2)
/// ```
pub(crate) fn exchange_normal_velocities(v1: f64, v2: f64, m1: f64, m2: f64, e: f64) -> (f64, f64) {
    let total = m1 + m2;
    let momentum = m1 * v1 + m2 * v2;
    (
        (momentum - m2 * (v1 - v2) * e) / total,
        (momentum - m1 * (v2 - v1) * e) / total,
    )
}

/// Reflect the normal component of `velocity`, scaled by restitution
pub(crate) fn reflect_normal_velocity(velocity: DVec2, normal: DVec2, e: f64) -> DVec2 {
    let vn = velocity.dot(normal);
    velocity - normal * (vn * (1.0 + e))
}

/// Resolve a contact between two bodies
///
/// Two dynamic bodies split the correction evenly; against a kinematic body
/// the dynamic one takes the full depth. Returns `false` when nothing could
/// be resolved (both kinematic, or a dynamic pair with an invalid mass).
pub(crate) fn apply_contact(a: &mut Body, b: &mut Body, contact: Contact) -> bool {
    let Contact { normal, depth } = contact;
    let e = a.collider.paired(&b.collider);

    match (a.kinematic, b.kinematic) {
        (true, true) => false,
        (false, true) => {
            a.position -= normal * depth;
            if a.velocity.dot(normal) > 0.0 {
                a.velocity = reflect_normal_velocity(a.velocity, normal, e);
            }
            true
        }
        (true, false) => {
            b.position += normal * depth;
            if b.velocity.dot(normal) < 0.0 {
                b.velocity = reflect_normal_velocity(b.velocity, normal, e);
            }
            true
        }
        (false, false) => {
            if !a.valid_mass || !b.valid_mass {
                return false;
            }

            a.position -= normal * (depth / 2.0);
            b.position += normal * (depth / 2.0);

            let v1 = a.velocity.dot(normal);
            let v2 = b.velocity.dot(normal);
            if v1 - v2 > 0.0 {
                let (v1_new, v2_new) = exchange_normal_velocities(v1, v2, a.mass, b.mass, e);
                a.velocity += normal * (v1_new - v1);
                b.velocity += normal * (v2_new - v2);
            }
            true
        }
    }
}

/// Exact circle-circle test and resolution
///
/// Coincident centers are skipped: there is no direction to separate along.
pub(crate) fn circle_circle(a: &mut Body, radius_a: f64, b: &mut Body, radius_b: f64) -> bool {
    let offset = b.position - a.position;
    let distance = offset.length();
    let reach = radius_a + radius_b;

    if distance == 0.0 || distance > reach {
        return false;
    }

    let contact = Contact {
        normal: offset / distance,
        depth: reach - distance,
    };
    apply_contact(a, b, contact)
}

/// Resolve a circle against immovable outline geometry
///
/// Only the circle moves, and only its own restitution is used.
pub(crate) fn circle_outline(circle: &mut Body, radius: f64, outline: &Shape, at: &Transform) -> bool {
    if circle.kinematic {
        return false;
    }

    let segments = outline.segments(at);
    match outline {
        Shape::Polygon { .. } if segments.len() > 2 => circle_polygon(circle, radius, &segments),
        _ => segments
            .iter()
            .fold(false, |hit, segment| circle_segment(circle, radius, segment, None) | hit),
    }
}

/// Resolve a circle against a single segment
///
/// When the circle's center lies exactly on the segment, `outward` (or, for
/// open geometry, the side facing against the circle's motion) is used as
/// the normal.
fn circle_segment(circle: &mut Body, radius: f64, segment: &Segment, outward: Option<DVec2>) -> bool {
    let Some(closest) = segment.closest_point(circle.position) else {
        return false;
    };
    let offset = circle.position - closest;
    let distance = offset.length();
    if distance > radius {
        return false;
    }

    let normal = if distance > 0.0 {
        offset / distance
    } else {
        match outward.or_else(|| facing_normal(segment, circle.velocity)) {
            Some(normal) => normal,
            None => return false,
        }
    };
    push_out(circle, normal, radius - distance)
}

/// Resolve a circle against a closed polygon
///
/// A center on the boundary or inside the polygon is resolved once against
/// the nearest segment and pushed fully outside. Otherwise every segment is
/// resolved in turn.
fn circle_polygon(circle: &mut Body, radius: f64, segments: &[Segment]) -> bool {
    let center = circle.position;
    let counter_clockwise = signed_area(segments) > 0.0;
    let outward = |segment: &Segment| {
        segment
            .left_normal()
            .map(|n| if counter_clockwise { -n } else { n })
    };

    let mut nearest: Option<(usize, DVec2, f64)> = None;
    for (index, segment) in segments.iter().enumerate() {
        if let Some(point) = segment.closest_point(center) {
            let distance = (center - point).length();
            if nearest.map_or(true, |(_, _, best)| distance < best) {
                nearest = Some((index, point, distance));
            }
        }
    }
    let Some((index, closest, distance)) = nearest else {
        return false;
    };

    if distance == 0.0 {
        return match outward(&segments[index]) {
            Some(normal) => push_out(circle, normal, radius),
            None => false,
        };
    }
    if contains_point(segments, center) {
        let normal = (closest - center) / distance;
        return push_out(circle, normal, radius + distance);
    }

    segments.iter().fold(false, |hit, segment| {
        circle_segment(circle, radius, segment, outward(segment)) | hit
    })
}

fn push_out(circle: &mut Body, normal: DVec2, depth: f64) -> bool {
    circle.position += normal * depth;
    if circle.velocity.dot(normal) < 0.0 {
        circle.velocity = reflect_normal_velocity(circle.velocity, normal, circle.collider.restitution());
    }
    true
}

fn facing_normal(segment: &Segment, velocity: DVec2) -> Option<DVec2> {
    let normal = segment.left_normal()?;
    Some(if velocity.dot(normal) > 0.0 { -normal } else { normal })
}

fn signed_area(segments: &[Segment]) -> f64 {
    segments
        .iter()
        .map(|s| s.a.x * s.b.y - s.b.x * s.a.y)
        .sum::<f64>()
        / 2.0
}

/// Even-odd point-in-polygon test
fn contains_point(segments: &[Segment], p: DVec2) -> bool {
    let mut inside = false;
    for Segment { a, b } in segments {
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}
