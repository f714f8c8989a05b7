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
//! Bead on a Wire Example
//!
//! A single bead is held on a circular wire by a [`WireConstraint`] and
//! swings under gravity like a pendulum. The example steps the simulation
//! one tick at a time with `single_step` and reports how far the bead drifts
//! from the wire and how well its energy holds up.
//!
//! # Running
//!
//! ```bash
//! cargo run --example bead_on_wire --release
//! cargo run --example bead_on_wire --release -- --radius 2.0 --seconds 20
//! ```

use glam::DVec2;
use rigid2d::constraints::WireConstraint;
use rigid2d::ecs::components::{Rigidbody, Transform};
use rigid2d::{Entity, Simulation, SimulationConfig, World};

const WIRE_CENTER: DVec2 = DVec2::new(0.0, 0.0);

fn parse_arg(args: &[String], flag: &str, default: f64) -> f64 {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|v| match v.parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("invalid {} '{}', using {}", flag, v, default);
                default
            }
        })
        .unwrap_or(default)
}

fn energy(world: &World, bead: Entity, gravity: DVec2) -> Option<f64> {
    let position = world.get::<Transform>(bead)?.position;
    let body = world.get::<Rigidbody>(bead)?;
    let kinetic = 0.5 * body.mass * body.velocity.length_squared();
    let potential = -body.mass * gravity.dot(position);
    Some(kinetic + potential)
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    let radius = parse_arg(&args, "--radius", 1.0);
    let seconds = parse_arg(&args, "--seconds", 10.0);

    let config = SimulationConfig::default();
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let bead = sim.world_mut().create_entity();
    sim.world_mut()
        .attach(bead, Transform::at(WIRE_CENTER + DVec2::new(radius, 0.0)));
    sim.world_mut().attach(bead, Rigidbody::dynamic(1.0));
    if let Err(e) = sim.add_constraint(Box::new(WireConstraint::new(bead, WIRE_CENTER, radius))) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("Bead on a Wire");
    println!("==============");
    println!("radius {} m, {} substeps per tick", radius, config.substeps);
    println!();

    let initial = energy(sim.world(), bead, config.gravity).unwrap_or(0.0);
    let ticks = (seconds / config.timestep).round() as usize;
    let report_every = ((0.5 / config.timestep).round() as usize).max(1);
    let mut worst_drift: f64 = 0.0;

    for tick in 1..=ticks {
        let mut drift = 0.0;
        sim.single_step(&mut |world: &World| {
            if let Some(t) = world.get::<Transform>(bead) {
                drift = ((t.position - WIRE_CENTER).length() - radius).abs();
            }
        });
        worst_drift = worst_drift.max(drift);

        if tick % report_every == 0 {
            let position = sim
                .world()
                .get::<Transform>(bead)
                .map_or(DVec2::ZERO, |t| t.position);
            let e = energy(sim.world(), bead, config.gravity).unwrap_or(0.0);
            println!(
                "t = {:5.2}s  position: ({:7.4}, {:7.4})  energy drift: {:+.3e}",
                tick as f64 * config.timestep,
                position.x,
                position.y,
                e - initial
            );
        }
    }

    println!();
    println!("Largest distance from the wire: {:.3e} m", worst_drift);
}
