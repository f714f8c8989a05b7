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
//! Constraints run after collision in every substep
//!
//! A constraint gets two hooks per substep: [`Constraint::before_substep`]
//! sees the world before integration, and [`Constraint::apply`] corrects it
//! after collision. Constraints are registered with a [`ConstraintSet`],
//! which checks that each one was written against a compatible version of
//! this API.
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use rigid2d::constraints::{ConstraintSet, WireConstraint};
//! use rigid2d::ecs::World;
//!
//! let mut world = World::new();
//! let bead = world.create_entity();
//!
//! let mut set = ConstraintSet::new();
//! set.register(Box::new(WireConstraint::new(bead, DVec2::ZERO, 1.0)))
//!     .unwrap();
//! assert_eq!(set.len(), 1);
//! ```

use crate::ecs::components::{Rigidbody, Transform};
use crate::ecs::{Entity, System, World};
use crate::error::ConstraintError;
use glam::DVec2;
use semver::{Version, VersionReq};

/// Version of the constraint API
///
/// Constraints declare the API version they target; registration fails when
/// it is not caret-compatible with this one.
pub const CONSTRAINT_API_VERSION: &str = "0.1.0";

/// A correction applied to the world after collision
pub trait Constraint {
    /// Unique name of the constraint
    fn name(&self) -> &str;

    /// Version of the constraint itself
    fn version(&self) -> &str;

    /// Constraint API version this constraint was written against
    fn api_version(&self) -> &str {
        CONSTRAINT_API_VERSION
    }

    /// Lower priorities run first
    fn priority(&self) -> i32 {
        100
    }

    /// Observe the world before integration
    fn before_substep(&mut self, _world: &World) {}

    /// Correct the world after collision
    fn apply(&mut self, world: &mut World, dt: f64);
}

/// Ordered set of registered constraints
#[derive(Default)]
pub struct ConstraintSet {
    constraints: Vec<Box<dyn Constraint>>,
}

impl ConstraintSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constraint
    ///
    /// # Errors
    ///
    /// Fails if a constraint with the same name is registered, if either
    /// version is not valid semver, or if the targeted API version is not
    /// compatible with [`CONSTRAINT_API_VERSION`].
    pub fn register(&mut self, constraint: Box<dyn Constraint>) -> Result<(), ConstraintError> {
        let name = constraint.name().to_string();
        if self.constraints.iter().any(|c| c.name() == name) {
            return Err(ConstraintError::Duplicate(name));
        }

        Version::parse(constraint.version()).map_err(|source| ConstraintError::InvalidVersion {
            name: name.clone(),
            source,
        })?;
        check_api_version(&name, constraint.api_version())?;

        log::debug!(
            "registered constraint '{}' v{} (priority {})",
            name,
            constraint.version(),
            constraint.priority()
        );
        self.constraints.push(constraint);
        self.constraints.sort_by_key(|c| c.priority());
        Ok(())
    }

    /// Number of registered constraints
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether no constraints are registered
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Names of registered constraints in execution order
    pub fn names(&self) -> Vec<&str> {
        self.constraints.iter().map(|c| c.name()).collect()
    }

    /// Run every constraint's pre-substep hook
    pub fn before_substep(&mut self, world: &World) {
        for constraint in &mut self.constraints {
            constraint.before_substep(world);
        }
    }
}

impl System for ConstraintSet {
    fn run(&mut self, world: &mut World, dt: f64) {
        for constraint in &mut self.constraints {
            constraint.apply(world, dt);
        }
    }

    fn name(&self) -> &str {
        "constraints"
    }
}

fn check_api_version(name: &str, required: &str) -> Result<(), ConstraintError> {
    let invalid = |source: semver::Error| ConstraintError::InvalidVersion {
        name: name.to_string(),
        source,
    };
    let requirement = VersionReq::parse(&format!("^{}", required)).map_err(invalid)?;
    let provided = Version::parse(CONSTRAINT_API_VERSION).map_err(invalid)?;

    if requirement.matches(&provided) {
        Ok(())
    } else {
        Err(ConstraintError::IncompatibleApi {
            name: name.to_string(),
            required: required.to_string(),
            provided: CONSTRAINT_API_VERSION,
        })
    }
}

/// Keeps one entity on a circular wire
///
/// Before each substep the entity's position is recorded. After collision
/// the entity is moved to the nearest point on the circle and its velocity
/// is set to its displacement over the substep, so velocity never points
/// off the wire.
#[derive(Debug, Clone)]
pub struct WireConstraint {
    entity: Entity,
    center: DVec2,
    radius: f64,
    previous: Option<DVec2>,
}

impl WireConstraint {
    /// Constrain `entity` to the circle with the given center and radius
    pub fn new(entity: Entity, center: DVec2, radius: f64) -> Self {
        WireConstraint {
            entity,
            center,
            radius,
            previous: None,
        }
    }

    /// Constrained entity
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Nearest point on the wire to `position`
    ///
    /// Returns `None` when `position` is the center, which has no nearest
    /// point.
    pub fn project(&self, position: DVec2) -> Option<DVec2> {
        let direction = (position - self.center).try_normalize()?;
        Some(self.center + direction * self.radius)
    }
}

impl Constraint for WireConstraint {
    fn name(&self) -> &str {
        "wire"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn before_substep(&mut self, world: &World) {
        self.previous = world.get::<Transform>(self.entity).map(|t| t.position);
    }

    fn apply(&mut self, world: &mut World, dt: f64) {
        let Some(transform) = world.get_mut::<Transform>(self.entity) else {
            return;
        };
        let Some(projected) = self.project(transform.position) else {
            return;
        };
        transform.position = projected;

        let Some(previous) = self.previous.take() else {
            return;
        };
        let velocity = if dt > 0.0 {
            (projected - previous) / dt
        } else {
            DVec2::ZERO
        };
        if let Some(body) = world.get_mut::<Rigidbody>(self.entity) {
            body.velocity = velocity;
        }
    }
}
