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
//! Gravity integration
//!
//! Dynamic bodies are advanced with semi-implicit (symplectic) Euler:
//!
//! ```text
//! v(t + dt) = v(t) + g*dt
//! x(t + dt) = x(t) + v(t + dt)*dt
//! ```
//!
//! The position update must use the already-updated velocity. Using the old
//! velocity (explicit Euler) makes resting contacts gain energy every step.

use crate::ecs::components::{Rigidbody, Transform};
use crate::ecs::{ComponentKind, System, World};
use glam::DVec2;

/// System advancing every non-kinematic body under constant gravity
///
/// # Example
///
/// ```
/// use glam::DVec2;
/// use rigid2d::ecs::{System, World};
/// use rigid2d::ecs::components::{Rigidbody, Transform};
/// use rigid2d::integration::IntegrationSystem;
///
/// let mut world = World::new();
/// let e = world.create_entity();
/// world.attach(e, Transform::default());
/// world.attach(e, Rigidbody::dynamic(1.0));
///
/// let mut integration = IntegrationSystem::new(DVec2::new(0.0, -10.0));
/// integration.run(&mut world, 0.1);
///
/// let body = world.get::<Rigidbody>(e).unwrap();
/// assert_eq!(body.velocity, DVec2::new(0.0, -1.0));
/// ```
#[derive(Debug, Clone)]
pub struct IntegrationSystem {
    gravity: DVec2,
    last_integrated: usize,
}

impl IntegrationSystem {
    /// Create an integration system with the given gravity
    pub fn new(gravity: DVec2) -> Self {
        IntegrationSystem {
            gravity,
            last_integrated: 0,
        }
    }

    /// Gravity applied to dynamic bodies
    pub fn gravity(&self) -> DVec2 {
        self.gravity
    }

    /// Number of bodies advanced by the most recent run
    pub fn last_integrated(&self) -> usize {
        self.last_integrated
    }
}

impl System for IntegrationSystem {
    fn run(&mut self, world: &mut World, dt: f64) {
        let mut integrated = 0;

        for entity in world.query(&[ComponentKind::Transform, ComponentKind::Rigidbody]) {
            let Some(body) = world.get_mut::<Rigidbody>(entity) else {
                continue;
            };
            if body.is_kinematic {
                continue;
            }

            body.velocity += self.gravity * dt;
            let velocity = body.velocity;

            if let Some(transform) = world.get_mut::<Transform>(entity) {
                transform.position += velocity * dt;
                integrated += 1;
            }
        }

        self.last_integrated = integrated;
    }

    fn name(&self) -> &str {
        "integration"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: DVec2 = DVec2::new(0.0, -9.8);

    fn spawn(world: &mut World, body: Rigidbody) -> crate::ecs::Entity {
        let e = world.create_entity();
        world.attach(e, Transform::default());
        world.attach(e, body);
        e
    }

    #[test]
    fn test_semi_implicit_ordering() {
        let mut world = World::new();
        let e = spawn(&mut world, Rigidbody::dynamic(1.0));

        let dt = 0.5;
        IntegrationSystem::new(G).run(&mut world, dt);

        // Position uses the updated velocity: x = (g*dt)*dt, not 0
        let pos = world.get::<Transform>(e).unwrap().position;
        assert!((pos.y - G.y * dt * dt).abs() < 1e-12);
        assert_eq!(world.get::<Rigidbody>(e).unwrap().velocity, G * dt);
    }

    #[test]
    fn test_kinematic_bodies_are_skipped() {
        let mut world = World::new();
        let e = spawn(
            &mut world,
            Rigidbody::kinematic().with_velocity(DVec2::new(1.0, 0.0)),
        );

        let mut system = IntegrationSystem::new(G);
        system.run(&mut world, 0.1);

        assert_eq!(world.get::<Transform>(e).unwrap().position, DVec2::ZERO);
        assert_eq!(world.get::<Rigidbody>(e).unwrap().velocity, DVec2::new(1.0, 0.0));
        assert_eq!(system.last_integrated(), 0);
    }

    #[test]
    fn test_entities_without_transform_are_ignored() {
        let mut world = World::new();
        let e = world.create_entity();
        world.attach(e, Rigidbody::dynamic(1.0));

        let mut system = IntegrationSystem::new(G);
        system.run(&mut world, 0.1);
        assert_eq!(world.get::<Rigidbody>(e).unwrap().velocity, DVec2::ZERO);
        assert_eq!(system.last_integrated(), 0);
    }

    #[test]
    fn test_free_fall_matches_discrete_sum() {
        let mut world = World::new();
        let e = spawn(&mut world, Rigidbody::dynamic(1.0));
        let mut system = IntegrationSystem::new(G);

        let dt = 0.01;
        let steps = 100;
        for _ in 0..steps {
            system.run(&mut world, dt);
        }

        // Semi-implicit Euler: y_n = g*dt^2 * n(n+1)/2
        let n = steps as f64;
        let expected = G.y * dt * dt * n * (n + 1.0) / 2.0;
        let y = world.get::<Transform>(e).unwrap().position.y;
        assert!((y - expected).abs() < 1e-9, "y = {}, expected {}", y, expected);
    }
}
