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
//! Simulation driver
//!
//! The [`Simulation`] owns the world, the fixed-step configuration and the
//! systems. One outer tick runs `substeps` iterations of
//!
//! 1. constraint pre-substep hooks
//! 2. integration
//! 3. one collision pass (broad and narrow phase)
//! 4. constraints
//!
//! at `timestep / substeps`, then hands the world to the renderer once.
//! Contact flags on renderables are cleared once at the start of a tick, so
//! the renderer sees every body that touched something during any substep.
//!
//! Stepping is synchronous. [`Simulation::start`] drives ticks from a
//! host-supplied frame source until the host runs out of frames or
//! [`Simulation::stop`] (or a [`StopHandle`]) is called; a stop never
//! interrupts a tick that is already running.

use crate::collision::{self, CollisionSystem};
use crate::config::SimulationConfig;
use crate::constraints::{Constraint, ConstraintSet};
use crate::ecs::{System, World};
use crate::error::{ConfigError, ConstraintError};
use crate::integration::IntegrationSystem;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Receives the world once per outer tick
pub trait Renderer {
    /// Draw the post-tick state
    fn render(&mut self, world: &World);
}

impl<F> Renderer for F
where
    F: FnMut(&World),
{
    fn render(&mut self, world: &World) {
        self(world)
    }
}

/// A renderer that also paces continuous stepping
///
/// This is the per-frame callback of a display loop: [`Simulation::start`]
/// asks for a frame before every tick.
pub trait FrameHost: Renderer {
    /// Wait for the next frame; `false` ends the run
    fn next_frame(&mut self) -> bool;
}

/// Handle that stops a running simulation from inside a callback
#[derive(Debug, Clone)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    /// Stop before the next tick
    pub fn stop(&self) {
        self.0.set(false);
    }
}

/// Counters describing recent stepping
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// Outer ticks run since construction or the last reset
    pub ticks: u64,
    /// Substeps run since construction or the last reset
    pub substeps: u64,
    /// Bodies advanced by integration in each substep of the last tick
    pub integrated: usize,
    /// Candidate pairs found over all substeps of the last tick
    pub candidates: usize,
    /// Contacts resolved over all substeps of the last tick
    pub contacts: usize,
    /// Wall-clock time of the last tick
    pub last_tick: Duration,
}

/// Fixed-step rigid-body simulation
///
/// # Example
///
/// ```
/// use glam::DVec2;
/// use rigid2d::ecs::components::{Rigidbody, Transform};
/// use rigid2d::{Simulation, SimulationConfig, World};
///
/// let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
/// let ball = sim.world_mut().create_entity();
/// sim.world_mut().attach(ball, Transform::at(DVec2::new(0.0, 10.0)));
/// sim.world_mut().attach(ball, Rigidbody::dynamic(1.0));
///
/// let mut frames = 0;
/// sim.single_step(&mut |_: &World| frames += 1);
///
/// assert_eq!(frames, 1);
/// assert!(!sim.is_running());
/// assert!(sim.world().get::<Transform>(ball).unwrap().position.y < 10.0);
/// ```
pub struct Simulation {
    world: World,
    config: SimulationConfig,
    integration: IntegrationSystem,
    collision: CollisionSystem,
    constraints: ConstraintSet,
    running: Rc<Cell<bool>>,
    stats: StepStats,
}

impl Simulation {
    /// Create a simulation with an empty world
    ///
    /// # Errors
    ///
    /// Returns the validation error of an unusable configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "simulation: timestep {}s, {} substeps, gravity ({}, {})",
            config.timestep,
            config.substeps,
            config.gravity.x,
            config.gravity.y
        );

        Ok(Simulation {
            world: World::new(),
            config,
            integration: IntegrationSystem::new(config.gravity),
            collision: CollisionSystem::new(),
            constraints: ConstraintSet::new(),
            running: Rc::new(Cell::new(false)),
            stats: StepStats::default(),
        })
    }

    /// The simulated world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world, for scene setup between ticks
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Configuration fixed at construction
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Stepping counters
    pub fn stats(&self) -> StepStats {
        self.stats
    }

    /// Register a constraint to run after collision in every substep
    ///
    /// # Errors
    ///
    /// See [`ConstraintSet::register`].
    pub fn add_constraint(&mut self, constraint: Box<dyn Constraint>) -> Result<(), ConstraintError> {
        self.constraints.register(constraint)
    }

    /// Run exactly one outer tick without rendering
    pub fn step(&mut self) {
        let started = Instant::now();
        let dt = self.config.substep_dt();
        let mut candidates = 0;
        let mut contacts = 0;

        collision::clear_contact_flags(&mut self.world);
        for _ in 0..self.config.substeps {
            self.constraints.before_substep(&self.world);

            let systems: [&mut dyn System; 3] = [
                &mut self.integration,
                &mut self.collision,
                &mut self.constraints,
            ];
            for system in systems {
                system.run(&mut self.world, dt);
            }

            let pass = self.collision.last_pass();
            candidates += pass.candidates;
            contacts += pass.contacts;
        }

        self.stats.ticks += 1;
        self.stats.substeps += u64::from(self.config.substeps);
        self.stats.integrated = self.integration.last_integrated();
        self.stats.candidates = candidates;
        self.stats.contacts = contacts;
        self.stats.last_tick = started.elapsed();

        log::trace!(
            "tick {}: {} bodies, {} candidates, {} contacts in {:?}",
            self.stats.ticks,
            self.stats.integrated,
            candidates,
            contacts,
            self.stats.last_tick
        );
    }

    /// Step continuously, one tick per host frame
    ///
    /// Runs until the host reports no more frames or the simulation is
    /// stopped. Each tick is followed by exactly one render.
    pub fn start<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        self.running.set(true);
        log::debug!("simulation started");

        while self.running.get() && host.next_frame() {
            // A stop issued while waiting for the frame still wins
            if !self.running.get() {
                break;
            }
            self.step();
            host.render(&self.world);
        }

        self.running.set(false);
        log::debug!("simulation stopped after {} ticks", self.stats.ticks);
    }

    /// Stop before the next tick
    pub fn stop(&self) {
        self.running.set(false);
    }

    /// Whether [`start`](Self::start) is stepping
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Handle for stopping the simulation from inside a host callback
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Rc::clone(&self.running))
    }

    /// Run one tick and render it, leaving the running state as it was
    pub fn single_step<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let was_running = self.running.replace(true);
        self.step();
        renderer.render(&self.world);
        self.running.set(was_running);
    }

    /// Remove every entity and clear the counters
    ///
    /// Registered constraints are kept.
    pub fn reset(&mut self) {
        log::debug!(
            "simulation reset: dropping {} entities",
            self.world.entity_count()
        );
        self.world.reset();
        self.stats = StepStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Rigidbody, Transform};
    use glam::DVec2;

    struct Frames {
        remaining: usize,
        rendered: usize,
    }

    impl Renderer for Frames {
        fn render(&mut self, _world: &World) {
            self.rendered += 1;
        }
    }

    impl FrameHost for Frames {
        fn next_frame(&mut self) -> bool {
            if self.remaining == 0 {
                return false;
            }
            self.remaining -= 1;
            true
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig::default().with_substeps(0);
        assert!(matches!(Simulation::new(config), Err(ConfigError::ZeroSubsteps)));
    }

    #[test]
    fn test_step_counts_substeps() {
        let mut sim = Simulation::new(SimulationConfig::default().with_substeps(4)).unwrap();
        for (i, body) in [
            Rigidbody::dynamic(1.0),
            Rigidbody::dynamic(2.0),
            Rigidbody::kinematic(),
        ]
        .into_iter()
        .enumerate()
        {
            let e = sim.world_mut().create_entity();
            sim.world_mut().attach(e, Transform::at(DVec2::new(i as f64, 0.0)));
            sim.world_mut().attach(e, body);
        }

        sim.step();
        sim.step();
        assert_eq!(sim.stats().ticks, 2);
        assert_eq!(sim.stats().substeps, 8);
        assert_eq!(sim.stats().integrated, 2);
    }

    #[test]
    fn test_start_runs_one_tick_per_frame() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let mut host = Frames {
            remaining: 5,
            rendered: 0,
        };

        sim.start(&mut host);
        assert_eq!(host.rendered, 5);
        assert_eq!(sim.stats().ticks, 5);
        assert!(!sim.is_running());
    }

    #[test]
    fn test_stop_handle_halts_before_next_tick() {
        struct StopAfter {
            handle: StopHandle,
            rendered: usize,
        }

        impl Renderer for StopAfter {
            fn render(&mut self, _world: &World) {
                self.rendered += 1;
                if self.rendered == 3 {
                    self.handle.stop();
                }
            }
        }

        impl FrameHost for StopAfter {
            fn next_frame(&mut self) -> bool {
                true
            }
        }

        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let mut host = StopAfter {
            handle: sim.stop_handle(),
            rendered: 0,
        };

        sim.start(&mut host);
        assert_eq!(host.rendered, 3);
        assert_eq!(sim.stats().ticks, 3);
    }

    #[test]
    fn test_single_step_restores_running_state() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let mut seen_running = false;
        {
            let running = sim.stop_handle();
            let mut renderer = |_: &World| seen_running = running.0.get();
            sim.single_step(&mut renderer);
        }
        assert!(seen_running);
        assert!(!sim.is_running());
        assert_eq!(sim.stats().ticks, 1);
    }

    #[test]
    fn test_reset_clears_world_and_stats() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let e = sim.world_mut().create_entity();
        sim.world_mut().attach(e, Transform::at(DVec2::new(0.0, 1.0)));
        sim.world_mut().attach(e, Rigidbody::dynamic(1.0));
        sim.step();

        sim.reset();
        assert_eq!(sim.world().entity_count(), 0);
        assert_eq!(sim.stats(), StepStats::default());
    }
}
