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
//! Collision detection and resolution
//!
//! One pass runs in two stages:
//!
//! 1. [`broad_phase`] pairs up bodies whose bounding boxes overlap
//! 2. [`narrow_phase`] tests each candidate pair exactly and resolves any
//!    contact with a positional push plus a normal velocity update
//!
//! Pairs are resolved one at a time in candidate order; a later pair sees
//! the corrections made by earlier ones.
//!
//! Resolved contacts set [`Renderable::is_colliding`] on both bodies. Passes
//! only ever set the flag; [`clear_contact_flags`] resets it, which the
//! simulation driver does once at the start of every tick.

pub mod broad_phase;
pub mod narrow_phase;
mod resolution;
mod sat;

use crate::ecs::components::Renderable;
use crate::ecs::{Component, ComponentKind, System, World};
use broad_phase::CandidatePair;

/// Counters from the most recent collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Pairs that passed the broad phase
    pub candidates: usize,
    /// Pairs that were in contact and got resolved
    pub contacts: usize,
}

/// System running the broad and narrow phase over every body with a shape
///
/// Bodies need a [`Transform`](crate::ecs::components::Transform), a
/// [`Rigidbody`](crate::ecs::components::Rigidbody) and a
/// [`Shape`](crate::shapes::Shape). A
/// [`Collider`](crate::ecs::components::Collider) is optional and supplies
/// restitution.
///
/// # Example
///
/// ```
/// use glam::DVec2;
/// use rigid2d::collision::CollisionSystem;
/// use rigid2d::ecs::{System, World};
/// use rigid2d::ecs::components::{Collider, Rigidbody, Transform};
/// use rigid2d::shapes::Shape;
///
/// let mut world = World::new();
/// for (x, vx) in [(0.0, 1.0), (1.5, -1.0)] {
///     let e = world.create_entity();
///     world.attach(e, Transform::at(DVec2::new(x, 0.0)));
///     world.attach(e, Rigidbody::dynamic(1.0).with_velocity(DVec2::new(vx, 0.0)));
///     world.attach(e, Collider::new(1.0));
///     world.attach(e, Shape::circle(1.0));
/// }
///
/// let mut collision = CollisionSystem::new();
/// collision.run(&mut world, 1.0 / 60.0);
/// assert_eq!(collision.last_pass().contacts, 1);
/// ```
#[derive(Debug, Default)]
pub struct CollisionSystem {
    candidates: Vec<CandidatePair>,
    stats: CollisionStats,
}

impl CollisionSystem {
    /// Create a collision system
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate pairs found by the most recent pass
    pub fn candidates(&self) -> &[CandidatePair] {
        &self.candidates
    }

    /// Counters from the most recent pass
    pub fn last_pass(&self) -> CollisionStats {
        self.stats
    }
}

/// Reset the colliding flag of every renderable
pub fn clear_contact_flags(world: &mut World) {
    for renderable in Renderable::storage_mut(world).components_mut() {
        renderable.is_colliding = false;
    }
}

impl System for CollisionSystem {
    fn run(&mut self, world: &mut World, _dt: f64) {
        let bodies = world.query(&[
            ComponentKind::Transform,
            ComponentKind::Rigidbody,
            ComponentKind::Shape,
        ]);
        broad_phase::find_candidates(world, &bodies, &mut self.candidates);

        let mut contacts = 0;
        for &pair in &self.candidates {
            if narrow_phase::resolve_pair(world, pair) {
                contacts += 1;
            }
        }

        self.stats = CollisionStats {
            candidates: self.candidates.len(),
            contacts,
        };
        log::trace!(
            "collision pass: {} bodies, {} candidates, {} contacts",
            bodies.len(),
            self.stats.candidates,
            contacts
        );
    }

    fn name(&self) -> &str {
        "collision"
    }
}
