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
//! Rigid-body components
//!
//! This module provides the per-entity data the physics systems operate on:
//! placement ([`Transform`]), motion ([`Rigidbody`]), surface response
//! ([`Collider`]) and an optional diagnostic [`Renderable`]. The collision
//! [`Shape`](crate::shapes::Shape) lives in its own module.
//!
//! All quantities are double precision.

use crate::ecs::Entity;
use glam::DVec2;

/// Position and orientation of a body
///
/// # Examples
///
/// ```
/// use glam::DVec2;
/// use rigid2d::ecs::components::Transform;
///
/// let transform = Transform::new(DVec2::new(1.0, 2.0), std::f64::consts::FRAC_PI_4);
/// assert_eq!(transform.position.x, 1.0);
/// assert!(transform.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// World-space position in meters
    pub position: DVec2,
    /// Counter-clockwise rotation in radians
    pub rotation: f64,
}

impl Transform {
    /// Create a transform with the given position and rotation
    pub fn new(position: DVec2, rotation: f64) -> Self {
        Transform { position, rotation }
    }

    /// Create an unrotated transform at the given position
    pub fn at(position: DVec2) -> Self {
        Transform::new(position, 0.0)
    }

    /// Check if all fields are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

/// Motion state of a body
///
/// Kinematic bodies are immovable as far as the physics core is concerned:
/// integration skips them and collision resolution never changes their
/// position or velocity, whatever mass they store.
///
/// # Examples
///
/// ```
/// use glam::DVec2;
/// use rigid2d::ecs::components::Rigidbody;
///
/// let ball = Rigidbody::dynamic(2.0).with_velocity(DVec2::new(1.0, 0.0));
/// assert!(!ball.is_kinematic);
/// assert!(ball.has_valid_mass());
///
/// let wall = Rigidbody::kinematic();
/// assert!(wall.is_kinematic);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rigidbody {
    /// Linear velocity in m/s
    pub velocity: DVec2,
    /// Mass in kilograms; ignored for kinematic bodies
    pub mass: f64,
    /// Angular velocity in rad/s
    pub angular_velocity: f64,
    /// Excluded from integration and collision response
    pub is_kinematic: bool,
}

impl Rigidbody {
    /// A dynamic body at rest with the given mass
    pub fn dynamic(mass: f64) -> Self {
        Rigidbody {
            velocity: DVec2::ZERO,
            mass,
            angular_velocity: 0.0,
            is_kinematic: false,
        }
    }

    /// A kinematic (immovable) body
    pub fn kinematic() -> Self {
        Rigidbody {
            velocity: DVec2::ZERO,
            mass: f64::INFINITY,
            angular_velocity: 0.0,
            is_kinematic: true,
        }
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Whether the stored mass can take part in a momentum exchange
    pub fn has_valid_mass(&self) -> bool {
        self.mass > 0.0 && self.mass.is_finite()
    }
}

impl Default for Rigidbody {
    fn default() -> Self {
        Rigidbody::dynamic(1.0)
    }
}

/// Surface response of a body
///
/// Restitution is clamped into `[0, 1]`. A pair of colliders uses the
/// smaller of the two coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    restitution: f64,
}

impl Collider {
    /// Create a collider with the given restitution
    pub fn new(restitution: f64) -> Self {
        let restitution = if restitution.is_nan() {
            0.0
        } else {
            restitution.clamp(0.0, 1.0)
        };
        Collider { restitution }
    }

    /// Coefficient of restitution in `[0, 1]`
    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    /// Restitution used when two colliders meet
    pub fn paired(&self, other: &Collider) -> f64 {
        self.restitution.min(other.restitution)
    }
}

impl Default for Collider {
    fn default() -> Self {
        Collider::new(0.0)
    }
}

/// Diagnostic drawing hints
///
/// Read by external renderers only. The collision system sets
/// `is_colliding`; nothing in the physics core reads any of these fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderable {
    /// RGBA color, components in `[0, 1]`
    pub color: [f32; 4],
    /// Draw debug overlays (bounding boxes, normals)
    pub debug: bool,
    /// Fill the shape instead of stroking it
    pub filled: bool,
    /// Set when the body took part in a contact during the last collision pass
    pub is_colliding: bool,
}

impl Renderable {
    /// Create a renderable with the given color
    pub fn new(color: [f32; 4]) -> Self {
        Renderable {
            color,
            debug: false,
            filled: false,
            is_colliding: false,
        }
    }

    /// Enable debug overlays
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Fill the shape
    pub fn filled(mut self) -> Self {
        self.filled = true;
        self
    }
}

impl Default for Renderable {
    fn default() -> Self {
        Renderable::new([0.2, 1.0, 0.2, 1.0])
    }
}

pub(crate) fn warn_on_invalid_mass(entity: Entity, body: &Rigidbody) {
    if !body.is_kinematic && !body.has_valid_mass() {
        log::warn!(
            "{} is dynamic with mass {}; it will be skipped in dynamic-dynamic collisions",
            entity,
            body.mass
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_constructors() {
        let t = Transform::at(DVec2::new(3.0, 4.0));
        assert_eq!(t.rotation, 0.0);
        assert_eq!(Transform::default().position, DVec2::ZERO);
        assert!(!Transform::at(DVec2::new(f64::NAN, 0.0)).is_valid());
    }

    #[test]
    fn test_rigidbody_mass_validity() {
        assert!(Rigidbody::dynamic(1.0).has_valid_mass());
        assert!(!Rigidbody::dynamic(0.0).has_valid_mass());
        assert!(!Rigidbody::dynamic(-2.0).has_valid_mass());
        assert!(!Rigidbody::dynamic(f64::NAN).has_valid_mass());
        assert!(!Rigidbody::kinematic().has_valid_mass());
    }

    #[test]
    fn test_collider_clamps_restitution() {
        assert_eq!(Collider::new(1.5).restitution(), 1.0);
        assert_eq!(Collider::new(-0.5).restitution(), 0.0);
        assert_eq!(Collider::new(f64::NAN).restitution(), 0.0);
        assert_eq!(Collider::new(0.25).restitution(), 0.25);
    }

    #[test]
    fn test_collider_pairing_uses_minimum() {
        let bouncy = Collider::new(0.9);
        let dull = Collider::new(0.1);
        assert_eq!(bouncy.paired(&dull), 0.1);
        assert_eq!(dull.paired(&bouncy), 0.1);
    }

    #[test]
    fn test_renderable_builders() {
        let r = Renderable::new([1.0, 0.0, 0.0, 1.0]).with_debug().filled();
        assert!(r.debug && r.filled);
        assert!(!r.is_colliding);
    }
}
