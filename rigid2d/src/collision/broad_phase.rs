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
//! Broad phase
//!
//! Every unordered pair of bodies is tested with an axis-aligned bounding
//! box overlap check. This is O(n²) and meant for tens to low hundreds of
//! bodies. The filter is conservative: bodies whose shapes truly overlap are
//! always reported, while pairs whose boxes overlap but shapes do not are
//! left for the narrow phase to reject.

use crate::ecs::components::{Rigidbody, Transform};
use crate::ecs::{Entity, World};
use crate::shapes::{Aabb, Shape};

/// Pair of entities whose bounding boxes overlap this pass
///
/// `a` always precedes `b` in query order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidatePair {
    /// First entity
    pub a: Entity,
    /// Second entity
    pub b: Entity,
}

struct Proxy {
    entity: Entity,
    aabb: Option<Aabb>,
    kinematic: bool,
}

/// Collect candidate pairs among `entities` into `out`
///
/// `out` is cleared first. Pairs are emitted in ascending `(i, j)` order of
/// positions in `entities`, so the output is deterministic. Pairs of two
/// kinematic bodies are never emitted; entities missing a transform,
/// rigidbody or shape, or whose shape has no bounding box, are skipped.
pub fn find_candidates(world: &World, entities: &[Entity], out: &mut Vec<CandidatePair>) {
    out.clear();

    let proxies: Vec<Proxy> = entities
        .iter()
        .filter_map(|&entity| {
            let transform = world.get::<Transform>(entity)?;
            let body = world.get::<Rigidbody>(entity)?;
            let shape = world.get::<Shape>(entity)?;
            Some(Proxy {
                entity,
                aabb: shape.aabb(transform),
                kinematic: body.is_kinematic,
            })
        })
        .collect();

    for (i, first) in proxies.iter().enumerate() {
        let Some(box_a) = first.aabb else {
            continue;
        };

        for second in &proxies[i + 1..] {
            if first.kinematic && second.kinematic {
                continue;
            }
            let Some(box_b) = second.aabb else {
                continue;
            };
            if box_a.overlaps(&box_b) {
                out.push(CandidatePair {
                    a: first.entity,
                    b: second.entity,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ComponentKind;
    use glam::DVec2;

    fn spawn(world: &mut World, pos: DVec2, body: Rigidbody, shape: Shape) -> Entity {
        let e = world.create_entity();
        world.attach(e, Transform::at(pos));
        world.attach(e, body);
        world.attach(e, shape);
        e
    }

    fn candidates(world: &World) -> Vec<CandidatePair> {
        let entities = world.query(&[
            ComponentKind::Transform,
            ComponentKind::Rigidbody,
            ComponentKind::Shape,
        ]);
        let mut out = Vec::new();
        find_candidates(world, &entities, &mut out);
        out
    }

    #[test]
    fn test_overlapping_boxes_are_candidates() {
        let mut world = World::new();
        let a = spawn(&mut world, DVec2::ZERO, Rigidbody::dynamic(1.0), Shape::circle(1.0));
        let b = spawn(&mut world, DVec2::new(1.5, 0.0), Rigidbody::dynamic(1.0), Shape::circle(1.0));
        spawn(&mut world, DVec2::new(10.0, 0.0), Rigidbody::dynamic(1.0), Shape::circle(1.0));

        assert_eq!(candidates(&world), vec![CandidatePair { a, b }]);
    }

    #[test]
    fn test_kinematic_pairs_are_skipped() {
        let mut world = World::new();
        spawn(&mut world, DVec2::ZERO, Rigidbody::kinematic(), Shape::square(1.0));
        spawn(&mut world, DVec2::new(0.5, 0.0), Rigidbody::kinematic(), Shape::square(1.0));
        assert!(candidates(&world).is_empty());
    }

    #[test]
    fn test_kinematic_dynamic_pair_is_kept() {
        let mut world = World::new();
        let floor = spawn(
            &mut world,
            DVec2::ZERO,
            Rigidbody::kinematic(),
            Shape::edge(DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0)),
        );
        let ball = spawn(&mut world, DVec2::new(0.0, 0.05), Rigidbody::dynamic(1.0), Shape::circle(0.1));
        assert_eq!(candidates(&world), vec![CandidatePair { a: floor, b: ball }]);
    }

    #[test]
    fn test_false_positive_is_allowed() {
        // Corners of the boxes overlap, the circles do not
        let mut world = World::new();
        spawn(&mut world, DVec2::ZERO, Rigidbody::dynamic(1.0), Shape::circle(1.0));
        spawn(&mut world, DVec2::new(1.6, 1.6), Rigidbody::dynamic(1.0), Shape::circle(1.0));
        assert_eq!(candidates(&world).len(), 1);
    }

    #[test]
    fn test_degenerate_outline_is_never_a_candidate() {
        let mut world = World::new();
        spawn(&mut world, DVec2::ZERO, Rigidbody::kinematic(), Shape::path(vec![DVec2::ZERO]));
        spawn(&mut world, DVec2::ZERO, Rigidbody::dynamic(1.0), Shape::circle(1.0));
        assert!(candidates(&world).is_empty());
    }

    #[test]
    fn test_output_order_is_deterministic() {
        let mut world = World::new();
        let entities: Vec<Entity> = (0..4)
            .map(|i| {
                spawn(
                    &mut world,
                    DVec2::new(i as f64 * 0.1, 0.0),
                    Rigidbody::dynamic(1.0),
                    Shape::circle(1.0),
                )
            })
            .collect();

        let pairs = candidates(&world);
        let expected: Vec<CandidatePair> = (0..4)
            .flat_map(|i| (i + 1..4).map(move |j| (i, j)))
            .map(|(i, j)| CandidatePair {
                a: entities[i],
                b: entities[j],
            })
            .collect();
        assert_eq!(pairs, expected);
    }
}
