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
//! Component storage and management
//!
//! Components are data containers that can be attached to entities.
//! Each component type lives in its own [`DenseStorage`]: a packed array of
//! values plus an entity-indexed table pointing into it, so lookup by id is
//! O(1) and iteration touches contiguous memory.

use crate::ecs::{Entity, World};

/// Tag naming a component type in queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// [`Transform`](crate::ecs::components::Transform)
    Transform,
    /// [`Rigidbody`](crate::ecs::components::Rigidbody)
    Rigidbody,
    /// [`Collider`](crate::ecs::components::Collider)
    Collider,
    /// [`Shape`](crate::shapes::Shape)
    Shape,
    /// [`Renderable`](crate::ecs::components::Renderable)
    Renderable,
}

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior. The
/// storage accessors tie each type to its column in the [`World`].
pub trait Component: Sized + 'static + Send + Sync {
    /// Query tag for this component type
    const KIND: ComponentKind;

    /// Storage column for this component type
    fn storage(world: &World) -> &DenseStorage<Self>;

    /// Mutable storage column for this component type
    fn storage_mut(world: &mut World) -> &mut DenseStorage<Self>;

    /// Hook run when the component is attached
    ///
    /// Used to report malformed values. Attaching never fails.
    fn on_attach(&self, _entity: Entity) {}
}

/// Storage interface for components
pub trait ComponentStorage {
    /// The component type this storage manages
    type Component;

    /// Insert a component for the given entity, replacing any previous value
    fn insert(&mut self, entity: Entity, component: Self::Component);

    /// Get a reference to a component for the given entity
    fn get(&self, entity: Entity) -> Option<&Self::Component>;

    /// Get a mutable reference to a component for the given entity
    fn get_mut(&mut self, entity: Entity) -> Option<&mut Self::Component>;

    /// Check if an entity has this component
    fn contains(&self, entity: Entity) -> bool;

    /// Number of stored components
    fn len(&self) -> usize;

    /// Whether the storage holds no components
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all components
    fn clear(&mut self);
}

/// Packed component storage with an entity-indexed lookup table
///
/// # Memory Layout
///
/// ```text
/// sparse:     [Some(1), None, Some(0), ...]   // indexed by entity id
/// entities:   [e2, e0, ...]                   // dense index -> entity
/// components: [c2, c0, ...]                   // dense index -> value
/// ```
///
/// # Example
///
/// ```
/// use rigid2d::ecs::{ComponentStorage, DenseStorage, Entity};
/// use rigid2d::ecs::components::Collider;
///
/// let mut storage = DenseStorage::<Collider>::new();
/// let entity = Entity::new(3);
///
/// storage.insert(entity, Collider::new(0.5));
/// assert!(storage.contains(entity));
/// assert_eq!(storage.get(entity).unwrap().restitution(), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct DenseStorage<T> {
    sparse: Vec<Option<usize>>,
    entities: Vec<Entity>,
    components: Vec<T>,
}

impl<T> DenseStorage<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        DenseStorage {
            sparse: Vec::new(),
            entities: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Entities holding this component, in insertion order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// The packed component values
    pub fn components(&self) -> &[T] {
        &self.components
    }

    /// The packed component values, mutably
    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.components
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        self.sparse.get(entity.index()).copied().flatten()
    }
}

impl<T> Default for DenseStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentStorage for DenseStorage<T> {
    type Component = T;

    fn insert(&mut self, entity: Entity, component: T) {
        if let Some(index) = self.dense_index(entity) {
            self.components[index] = component;
            return;
        }

        let slot = entity.index();
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, None);
        }
        self.sparse[slot] = Some(self.components.len());
        self.entities.push(entity);
        self.components.push(component);

        debug_assert_eq!(self.entities.len(), self.components.len());
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        let index = self.dense_index(entity)?;
        Some(&self.components[index])
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.dense_index(entity)?;
        Some(&mut self.components[index])
    }

    fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn clear(&mut self) {
        self.sparse.clear();
        self.entities.clear();
        self.components.clear();
    }
}
