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
//! Entity Component System (ECS) core implementation
//!
//! This module provides the foundational ECS architecture including:
//! - Entity handles
//! - Packed component storage with O(1) lookup by entity
//! - The world container and component queries
//! - The system trait run by the simulation driver

mod entity;
mod component;
mod system;
mod world;

/// Rigid-body components
pub mod components;

pub use entity::Entity;
pub use component::{Component, ComponentKind, ComponentStorage, DenseStorage};
pub use system::System;
pub use world::World;
