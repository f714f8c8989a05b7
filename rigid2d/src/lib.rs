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
//! # rigid2d
//!
//! A 2D rigid-body simulation kernel built on a small ECS (Entity Component
//! System) core. Bodies carry a transform, a rigidbody, an optional collider
//! and a shape; the simulation driver advances them under gravity in fixed
//! substeps and resolves overlaps with positional correction and a normal
//! velocity impulse.
//!
//! ## Features
//!
//! - **ECS Architecture**: dense component storage with O(1) lookup by entity
//! - **Shapes**: circles, boxes, edges, open paths and closed polygons
//! - **Collision**: pairwise bounding-box broad phase, tag-dispatched narrow phase
//! - **Integration**: semi-implicit Euler, substepped for stability
//! - **Constraints**: versioned constraint hooks with a bead-on-wire example
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec2;
//! use rigid2d::ecs::components::{Collider, Rigidbody, Transform};
//! use rigid2d::shapes::Shape;
//! use rigid2d::{Simulation, SimulationConfig};
//!
//! let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
//! let world = sim.world_mut();
//!
//! let ball = world.create_entity();
//! world.attach(ball, Transform::at(DVec2::new(0.0, 1.0)));
//! world.attach(ball, Rigidbody::dynamic(1.0));
//! world.attach(ball, Collider::new(0.5));
//! world.attach(ball, Shape::circle(0.1));
//!
//! let floor = world.create_entity();
//! world.attach(floor, Transform::default());
//! world.attach(floor, Rigidbody::kinematic());
//! world.attach(floor, Shape::edge(DVec2::new(-5.0, 0.0), DVec2::new(5.0, 0.0)));
//!
//! for _ in 0..120 {
//!     sim.step();
//! }
//!
//! let y = sim.world().get::<Transform>(ball).unwrap().position.y;
//! assert!(y >= 0.0);
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Collision shapes and bounding boxes
pub mod shapes;

/// Broad phase, narrow phase and contact resolution
pub mod collision;

/// Gravity integration
pub mod integration;

/// Versioned constraint hooks
pub mod constraints;

/// Simulation configuration
pub mod config;

/// Error types for configuration and registration
pub mod error;

/// Simulation driver and host-facing control surface
pub mod simulation;

pub use config::SimulationConfig;
pub use ecs::{Entity, World};
pub use error::{ConfigError, ConstraintError};
pub use simulation::{FrameHost, Renderer, Simulation, StepStats, StopHandle};
