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
//! World management
//!
//! The World is the central container for all ECS data: it hands out
//! entity ids, owns one storage column per component type, and answers
//! queries for entities holding a given set of components.

use crate::ecs::component::{Component, ComponentKind, ComponentStorage, DenseStorage};
use crate::ecs::components::{self, Collider, Renderable, Rigidbody, Transform};
use crate::ecs::Entity;
use crate::shapes::{self, Shape};

/// The main ECS world container
///
/// The world is owned by the simulation driver and lent to each system for
/// the duration of its run; there is no global registry.
///
/// # Examples
///
/// ```
/// use glam::DVec2;
/// use rigid2d::ecs::{ComponentKind, World};
/// use rigid2d::ecs::components::{Rigidbody, Transform};
///
/// let mut world = World::new();
/// let body = world.create_entity();
/// let marker = world.create_entity();
///
/// world.attach(body, Transform::at(DVec2::new(0.0, 2.0)));
/// world.attach(body, Rigidbody::dynamic(1.0));
/// world.attach(marker, Transform::default());
///
/// let moving = world.query(&[ComponentKind::Transform, ComponentKind::Rigidbody]);
/// assert_eq!(moving, vec![body]);
/// ```
#[derive(Debug, Default)]
pub struct World {
    next_entity_id: u32,
    pub(crate) transforms: DenseStorage<Transform>,
    pub(crate) rigidbodies: DenseStorage<Rigidbody>,
    pub(crate) colliders: DenseStorage<Collider>,
    pub(crate) shapes: DenseStorage<Shape>,
    pub(crate) renderables: DenseStorage<Renderable>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World::default()
    }

    /// Create a new entity with no components
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        entity
    }

    /// Number of entities created since the last reset
    pub fn entity_count(&self) -> usize {
        self.next_entity_id as usize
    }

    /// Whether the entity was created by this world since the last reset
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        entity.raw() < self.next_entity_id
    }

    /// Attach a component, replacing any previous value of the same type
    ///
    /// # Panics
    ///
    /// Panics if the entity was not created by this world (or was created
    /// before the last [`reset`](World::reset)).
    pub fn attach<T: Component>(&mut self, entity: Entity, component: T) {
        assert!(
            self.is_entity_alive(entity),
            "{} was not created by this world",
            entity
        );
        component.on_attach(entity);
        T::storage_mut(self).insert(entity, component);
    }

    /// Get a component of an entity
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        T::storage(self).get(entity)
    }

    /// Get a component of an entity mutably
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        T::storage_mut(self).get_mut(entity)
    }

    /// Whether the entity has a component of type `T`
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        T::storage(self).contains(entity)
    }

    /// Storage column of a component type
    pub fn storage<T: Component>(&self) -> &DenseStorage<T> {
        T::storage(self)
    }

    /// Entities holding every component in `required`, in ascending id order
    ///
    /// Entities missing any of the components are skipped.
    pub fn query(&self, required: &[ComponentKind]) -> Vec<Entity> {
        (0..self.next_entity_id)
            .map(Entity::new)
            .filter(|&entity| required.iter().all(|&kind| self.has_kind(entity, kind)))
            .collect()
    }

    /// Remove every entity and component
    ///
    /// All previously issued entity ids become invalid.
    pub fn reset(&mut self) {
        self.transforms.clear();
        self.rigidbodies.clear();
        self.colliders.clear();
        self.shapes.clear();
        self.renderables.clear();
        self.next_entity_id = 0;
    }

    fn has_kind(&self, entity: Entity, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Transform => self.transforms.contains(entity),
            ComponentKind::Rigidbody => self.rigidbodies.contains(entity),
            ComponentKind::Collider => self.colliders.contains(entity),
            ComponentKind::Shape => self.shapes.contains(entity),
            ComponentKind::Renderable => self.renderables.contains(entity),
        }
    }
}

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn storage(world: &World) -> &DenseStorage<Self> {
                &world.$field
            }

            fn storage_mut(world: &mut World) -> &mut DenseStorage<Self> {
                &mut world.$field
            }
        }
    };
    ($ty:ty, $kind:ident, $field:ident, on_attach = $hook:path) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn storage(world: &World) -> &DenseStorage<Self> {
                &world.$field
            }

            fn storage_mut(world: &mut World) -> &mut DenseStorage<Self> {
                &mut world.$field
            }

            fn on_attach(&self, entity: Entity) {
                $hook(entity, self)
            }
        }
    };
}

impl_component!(Transform, Transform, transforms);
impl_component!(Rigidbody, Rigidbody, rigidbodies, on_attach = components::warn_on_invalid_mass);
impl_component!(Collider, Collider, colliders);
impl_component!(Shape, Shape, shapes, on_attach = shapes::warn_on_degenerate_shape);
impl_component!(Renderable, Renderable, renderables);
