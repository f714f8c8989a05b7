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
//! Separating axis tests for boxes
//!
//! Both shapes are projected onto each candidate axis. If any axis shows a
//! gap the shapes are apart; otherwise the axis with the smallest overlap
//! becomes the contact normal and that overlap the penetration depth.

use super::resolution::Contact;
use crate::shapes::{box_corners, Segment};
use glam::DVec2;

/// Projection interval of `points` onto `axis`
fn project(points: &[DVec2], axis: DVec2) -> (f64, f64) {
    points
        .iter()
        .map(|p| p.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), d| {
            (min.min(d), max.max(d))
        })
}

/// Shortest shift along the axis that separates two intervals
///
/// Non-positive means the intervals already have a gap (or just touch).
/// When one interval contains the other this is the distance needed to
/// push it out through the nearer end.
fn interval_overlap(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.1 - b.0).min(b.1 - a.0)
}

/// Face normals of a box with the given rotation
fn box_axes(rotation: f64) -> [DVec2; 2] {
    let x = DVec2::from_angle(rotation);
    [x, x.perp()]
}

/// Orient `axis` so it points from `from` towards `to`
fn orient(axis: DVec2, from: DVec2, to: DVec2) -> DVec2 {
    if (to - from).dot(axis) < 0.0 {
        -axis
    } else {
        axis
    }
}

/// Minimum-overlap search over `axes` for two projected shapes
fn min_overlap<F>(axes: &[DVec2], mut overlap_on: F) -> Option<(DVec2, f64)>
where
    F: FnMut(DVec2) -> f64,
{
    let mut best: Option<(DVec2, f64)> = None;
    for &axis in axes {
        let overlap = overlap_on(axis);
        if overlap <= 0.0 {
            return None;
        }
        if best.map_or(true, |(_, depth)| overlap < depth) {
            best = Some((axis, overlap));
        }
    }
    best
}

/// Box against box
///
/// Each box is `(center, rotation, half_extents)`. The returned normal
/// points from `a` towards `b`.
pub(crate) fn box_box(a: (DVec2, f64, DVec2), b: (DVec2, f64, DVec2)) -> Option<Contact> {
    let corners_a = box_corners(a.0, a.1, a.2);
    let corners_b = box_corners(b.0, b.1, b.2);

    let [a0, a1] = box_axes(a.1);
    let [b0, b1] = box_axes(b.1);
    let axes = [a0, a1, b0, b1];

    let (axis, depth) = min_overlap(&axes, |axis| {
        interval_overlap(project(&corners_a, axis), project(&corners_b, axis))
    })?;

    Some(Contact {
        normal: orient(axis, a.0, b.0),
        depth,
    })
}

/// Box against circle
///
/// The returned normal points from the box towards the circle. The axis set
/// is the two box face normals plus, when the circle's center lies outside
/// the box, the direction from the center to the nearest point on the box.
pub(crate) fn box_circle(b: (DVec2, f64, DVec2), center: DVec2, radius: f64) -> Option<Contact> {
    let (box_center, rotation, half) = b;
    let corners = box_corners(box_center, rotation, half);

    let local = DVec2::from_angle(-rotation).rotate(center - box_center);
    let inside = local.x.abs() <= half.x && local.y.abs() <= half.y;

    let mut closest: Option<(DVec2, f64)> = None;
    for i in 0..corners.len() {
        let edge = Segment::new(corners[i], corners[(i + 1) % corners.len()]);
        let point = edge.closest_point(center)?;
        let distance = (center - point).length();
        if closest.map_or(true, |(_, best)| distance < best) {
            closest = Some((point, distance));
        }
    }
    let (point, distance) = closest?;
    if !inside && distance > radius {
        return None;
    }

    let [x, y] = box_axes(rotation);
    let mut axes = vec![x, y];
    if distance > 0.0 && !inside {
        axes.push((point - center) / distance);
    }

    let (axis, depth) = min_overlap(&axes, |axis| {
        let c = center.dot(axis);
        interval_overlap(project(&corners, axis), (c - radius, c + radius))
    })?;

    Some(Contact {
        normal: orient(axis, box_center, center),
        depth,
    })
}
