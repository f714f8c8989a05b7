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
//! Narrow phase dispatch
//!
//! Each candidate pair is routed to an exact routine by the pair of shape
//! kinds through a fixed table. Mixed pairs are stored once and the table
//! marks which argument order the routine expects, so `(Box, Circle)` and
//! `(Circle, Box)` run the same code with the same argument order.
//!
//! Pairs without a routine (for example Path against Path) are ignored.

use super::broad_phase::CandidatePair;
use super::resolution::{self, Body};
use super::sat;
use crate::ecs::components::Renderable;
use crate::ecs::{Entity, World};
use crate::shapes::{Shape, ShapeKind};

/// Exact test and resolution routine for a pair of shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routine {
    /// Distance test between two circles
    CircleCircle,
    /// Separating axis test between two boxes
    BoxBox,
    /// Separating axis test between a box (first) and a circle (second)
    BoxCircle,
    /// Closest point test between a circle (first) and immovable outline
    /// geometry (second)
    CircleOutline,
}

type Entry = Option<(Routine, bool)>;

const CC: Entry = Some((Routine::CircleCircle, false));
const BB: Entry = Some((Routine::BoxBox, false));
const BC: Entry = Some((Routine::BoxCircle, false));
const CB: Entry = Some((Routine::BoxCircle, true));
const CO: Entry = Some((Routine::CircleOutline, false));
const OC: Entry = Some((Routine::CircleOutline, true));

/// Routine table indexed by `[kind of a][kind of b]`
///
/// The flag is set when the routine expects the pair in reverse order.
const DISPATCH: [[Entry; ShapeKind::COUNT]; ShapeKind::COUNT] = [
    //  Circle Box   Edge  Path  Polygon
    [CC, CB, CO, CO, CO], // Circle
    [BC, BB, None, None, None], // Box
    [OC, None, None, None, None], // Edge
    [OC, None, None, None, None], // Path
    [OC, None, None, None, None], // Polygon
];

/// Routine for a pair of shape kinds, and whether the pair must be swapped
/// before calling it
pub fn lookup(a: ShapeKind, b: ShapeKind) -> Option<(Routine, bool)> {
    DISPATCH[a as usize][b as usize]
}

/// Test and resolve one candidate pair
///
/// Returns `true` when the shapes were in contact and a correction was
/// applied. Both entities get their [`Renderable::is_colliding`] flag set in
/// that case, if they carry a renderable.
pub fn resolve_pair(world: &mut World, pair: CandidatePair) -> bool {
    let (Some(kind_a), Some(kind_b)) = (shape_kind(world, pair.a), shape_kind(world, pair.b))
    else {
        return false;
    };
    let Some((routine, swapped)) = lookup(kind_a, kind_b) else {
        return false;
    };
    let (first, second) = if swapped {
        (pair.b, pair.a)
    } else {
        (pair.a, pair.b)
    };

    let (Some(mut body_first), Some(mut body_second)) =
        (Body::read(world, first), Body::read(world, second))
    else {
        return false;
    };

    let hit = {
        let (Some(shape_first), Some(shape_second)) =
            (world.get::<Shape>(first), world.get::<Shape>(second))
        else {
            return false;
        };
        run_routine(
            routine,
            (&mut body_first, shape_first),
            (&mut body_second, shape_second),
        )
    };

    if hit {
        body_first.write(world, first);
        body_second.write(world, second);
        mark_colliding(world, first);
        mark_colliding(world, second);
    }
    hit
}

fn shape_kind(world: &World, entity: Entity) -> Option<ShapeKind> {
    world.get::<Shape>(entity).map(Shape::kind)
}

fn mark_colliding(world: &mut World, entity: Entity) {
    if let Some(renderable) = world.get_mut::<Renderable>(entity) {
        renderable.is_colliding = true;
    }
}

fn run_routine(routine: Routine, first: (&mut Body, &Shape), second: (&mut Body, &Shape)) -> bool {
    let (a, shape_a) = first;
    let (b, shape_b) = second;

    match (routine, shape_a, shape_b) {
        (Routine::CircleCircle, Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            resolution::circle_circle(a, *ra, b, *rb)
        }
        (
            Routine::BoxBox,
            Shape::Box { half_extents: ha },
            Shape::Box { half_extents: hb },
        ) => match sat::box_box((a.position, a.rotation, *ha), (b.position, b.rotation, *hb)) {
            Some(contact) => resolution::apply_contact(a, b, contact),
            None => false,
        },
        (Routine::BoxCircle, Shape::Box { half_extents }, Shape::Circle { radius }) => {
            match sat::box_circle((a.position, a.rotation, *half_extents), b.position, *radius) {
                Some(contact) => resolution::apply_contact(a, b, contact),
                None => false,
            }
        }
        (Routine::CircleOutline, Shape::Circle { radius }, outline) => {
            resolution::circle_outline(a, *radius, outline, &b.transform())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Collider, Rigidbody, Transform};
    use glam::DVec2;

    const KINDS: [ShapeKind; ShapeKind::COUNT] = [
        ShapeKind::Circle,
        ShapeKind::Box,
        ShapeKind::Edge,
        ShapeKind::Path,
        ShapeKind::Polygon,
    ];

    fn spawn(world: &mut World, position: DVec2, body: Rigidbody, shape: Shape) -> Entity {
        let entity = world.create_entity();
        world.attach(entity, Transform::at(position));
        world.attach(entity, body);
        world.attach(entity, Collider::new(1.0));
        world.attach(entity, shape);
        world.attach(entity, Renderable::default());
        entity
    }

    #[test]
    fn test_dispatch_table_is_symmetric() {
        for a in KINDS {
            for b in KINDS {
                match (lookup(a, b), lookup(b, a)) {
                    (Some((r1, s1)), Some((r2, s2))) => {
                        assert_eq!(r1, r2, "{:?} vs {:?}", a, b);
                        if a != b {
                            assert_ne!(s1, s2, "{:?} vs {:?}", a, b);
                        }
                    }
                    (None, None) => {}
                    other => panic!("asymmetric entry for {:?} vs {:?}: {:?}", a, b, other),
                }
            }
        }
    }

    #[test]
    fn test_unsupported_pairs() {
        assert_eq!(lookup(ShapeKind::Path, ShapeKind::Path), None);
        assert_eq!(lookup(ShapeKind::Box, ShapeKind::Edge), None);
        assert_eq!(lookup(ShapeKind::Polygon, ShapeKind::Edge), None);
    }

    #[test]
    fn test_resolve_sets_colliding_flags() {
        let mut world = World::new();
        let a = spawn(&mut world, DVec2::ZERO, Rigidbody::dynamic(1.0), Shape::circle(1.0));
        let b = spawn(
            &mut world,
            DVec2::new(1.5, 0.0),
            Rigidbody::dynamic(1.0),
            Shape::circle(1.0),
        );

        assert!(resolve_pair(&mut world, CandidatePair { a, b }));
        assert!(world.get::<Renderable>(a).unwrap().is_colliding);
        assert!(world.get::<Renderable>(b).unwrap().is_colliding);
    }

    #[test]
    fn test_miss_leaves_world_untouched() {
        let mut world = World::new();
        let a = spawn(&mut world, DVec2::ZERO, Rigidbody::dynamic(1.0), Shape::circle(1.0));
        let b = spawn(
            &mut world,
            DVec2::new(1.6, 1.6),
            Rigidbody::dynamic(1.0),
            Shape::circle(1.0),
        );

        assert!(!resolve_pair(&mut world, CandidatePair { a, b }));
        assert_eq!(world.get::<Transform>(a).unwrap().position, DVec2::ZERO);
        assert!(!world.get::<Renderable>(b).unwrap().is_colliding);
    }

    #[test]
    fn test_outline_first_is_swapped() {
        let mut world = World::new();
        let floor = spawn(
            &mut world,
            DVec2::ZERO,
            Rigidbody::kinematic(),
            Shape::edge(DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0)),
        );
        let ball = spawn(
            &mut world,
            DVec2::new(0.0, 0.05),
            Rigidbody::dynamic(1.0),
            Shape::circle(0.1),
        );

        assert!(resolve_pair(&mut world, CandidatePair { a: floor, b: ball }));
        let y = world.get::<Transform>(ball).unwrap().position.y;
        assert!((y - 0.1).abs() < 1e-12);
        assert_eq!(world.get::<Transform>(floor).unwrap().position, DVec2::ZERO);
    }

    #[test]
    fn test_box_circle_order_does_not_matter() {
        let run = |box_first: bool| {
            let mut world = World::new();
            let spawn_box = |w: &mut World| {
                spawn(w, DVec2::ZERO, Rigidbody::dynamic(1.0), Shape::square(0.5))
            };
            let spawn_ball = |w: &mut World| {
                spawn(
                    w,
                    DVec2::new(0.0, 0.9),
                    Rigidbody::dynamic(1.0).with_velocity(DVec2::new(0.0, -1.0)),
                    Shape::circle(0.5),
                )
            };
            let (boxed, ball) = if box_first {
                let b = spawn_box(&mut world);
                (b, spawn_ball(&mut world))
            } else {
                let c = spawn_ball(&mut world);
                (spawn_box(&mut world), c)
            };
            let pair = if box_first {
                CandidatePair { a: boxed, b: ball }
            } else {
                CandidatePair { a: ball, b: boxed }
            };
            assert!(resolve_pair(&mut world, pair));
            (
                *world.get::<Transform>(boxed).unwrap(),
                *world.get::<Rigidbody>(boxed).unwrap(),
                *world.get::<Transform>(ball).unwrap(),
                *world.get::<Rigidbody>(ball).unwrap(),
            )
        };

        assert_eq!(run(true), run(false));
    }
}
