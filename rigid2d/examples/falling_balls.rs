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
//! Falling Balls Example
//!
//! Drops a batch of circles and boxes into a container made of a kinematic
//! polygon floor and two edge walls, and prints a plain-text frame summary
//! once per second of simulated time.
//!
//! # Running
//!
//! ```bash
//! # 40 balls for 5 seconds
//! cargo run --example falling_balls --release
//!
//! # More bodies and substeps, with collision counters logged
//! RUST_LOG=rigid2d=trace RIGID2D_SUBSTEPS=16 \
//!     cargo run --example falling_balls --release -- --balls 150 --seconds 10
//! ```

use glam::DVec2;
use rigid2d::ecs::components::{Collider, Renderable, Rigidbody, Transform};
use rigid2d::ecs::{ComponentKind, Entity};
use rigid2d::shapes::Shape;
use rigid2d::{FrameHost, Renderer, Simulation, SimulationConfig, World};

/// Linear congruential generator for reproducible scenes
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

struct Options {
    balls: usize,
    seconds: f64,
    seed: u64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            balls: 40,
            seconds: 5.0,
            seed: 12345,
        }
    }
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--balls", Some(v)) => match v.parse() {
                Ok(n) => options.balls = n,
                Err(_) => log::warn!("invalid --balls '{}', using {}", v, options.balls),
            },
            ("--seconds", Some(v)) => match v.parse() {
                Ok(s) => options.seconds = s,
                Err(_) => log::warn!("invalid --seconds '{}', using {}", v, options.seconds),
            },
            ("--seed", Some(v)) => match v.parse() {
                Ok(s) => options.seed = s,
                Err(_) => log::warn!("invalid --seed '{}', using {}", v, options.seed),
            },
            (flag, None) => {
                eprintln!("Error: {} requires an argument", flag);
                std::process::exit(1);
            }
            (flag, Some(_)) => {
                eprintln!("Error: unknown option {}", flag);
                std::process::exit(1);
            }
        }
        i += 2;
    }
    options
}

fn build_container(world: &mut World) {
    let floor = world.create_entity();
    world.attach(floor, Transform::default());
    world.attach(floor, Rigidbody::kinematic());
    world.attach(floor, Collider::new(0.4));
    world.attach(
        floor,
        Shape::polygon(vec![
            DVec2::new(-4.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 0.3),
            DVec2::new(-4.0, 0.3),
        ]),
    );
    world.attach(floor, Renderable::new([0.4, 0.4, 0.4, 1.0]).filled());

    for x in [-4.0, 4.0] {
        let wall = world.create_entity();
        world.attach(wall, Transform::at(DVec2::new(x, 0.0)));
        world.attach(wall, Rigidbody::kinematic());
        world.attach(wall, Collider::new(0.4));
        world.attach(wall, Shape::edge(DVec2::ZERO, DVec2::new(0.0, 8.0)));
        world.attach(wall, Renderable::new([0.4, 0.4, 0.4, 1.0]));
    }
}

fn drop_balls(world: &mut World, options: &Options) {
    let mut rng = SimpleRng::new(options.seed);
    for i in 0..options.balls {
        let e = world.create_entity();
        let position = DVec2::new(rng.range(-3.5, 3.5), 1.0 + i as f64 * 0.12);
        world.attach(e, Transform::at(position));
        world.attach(
            e,
            Rigidbody::dynamic(rng.range(0.5, 2.0))
                .with_velocity(DVec2::new(rng.range(-1.0, 1.0), 0.0)),
        );
        world.attach(e, Collider::new(rng.range(0.2, 0.8)));
        world.attach(e, Renderable::new([0.2, 0.6, 1.0, 1.0]).with_debug());

        // Boxes only collide with circles and each other, so keep most bodies round
        if i % 5 == 4 {
            world.attach(e, Shape::square(0.1));
        } else {
            world.attach(e, Shape::circle(rng.range(0.06, 0.15)));
        }
    }
}

/// Prints a one-line summary of the world every `every` frames
struct ConsoleHost {
    frames_left: usize,
    frame: usize,
    every: usize,
    dt: f64,
}

impl Renderer for ConsoleHost {
    fn render(&mut self, world: &World) {
        self.frame += 1;
        if self.frame % self.every != 0 {
            return;
        }

        let bodies: Vec<Entity> = world.query(&[ComponentKind::Rigidbody, ComponentKind::Shape]);
        let mut dynamic = 0;
        let mut colliding = 0;
        let mut lowest = f64::INFINITY;
        let mut kinetic = 0.0;
        for e in bodies {
            let (Some(body), Some(transform)) = (world.get::<Rigidbody>(e), world.get::<Transform>(e))
            else {
                continue;
            };
            if body.is_kinematic {
                continue;
            }
            dynamic += 1;
            lowest = lowest.min(transform.position.y);
            kinetic += 0.5 * body.mass * body.velocity.length_squared();
            if world.get::<Renderable>(e).map_or(false, |r| r.is_colliding) {
                colliding += 1;
            }
        }

        println!(
            "t = {:5.2}s  bodies: {:4}  touching: {:4}  lowest y: {:6.3}  KE: {:8.4}",
            self.frame as f64 * self.dt,
            dynamic,
            colliding,
            lowest,
            kinetic
        );
    }
}

impl FrameHost for ConsoleHost {
    fn next_frame(&mut self) -> bool {
        if self.frames_left == 0 {
            return false;
        }
        self.frames_left -= 1;
        true
    }
}

fn main() {
    env_logger::init();
    let options = parse_args();

    let config = match SimulationConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Falling Balls");
    println!("=============");
    println!(
        "{} bodies, dt = {:.5}s, {} substeps, gravity = ({}, {})",
        options.balls, config.timestep, config.substeps, config.gravity.x, config.gravity.y
    );
    println!();

    build_container(sim.world_mut());
    drop_balls(sim.world_mut(), &options);

    let frames = (options.seconds / config.timestep).round() as usize;
    let mut host = ConsoleHost {
        frames_left: frames,
        frame: 0,
        every: ((1.0 / config.timestep).round() as usize).max(1),
        dt: config.timestep,
    };
    sim.start(&mut host);

    let stats = sim.stats();
    println!();
    println!(
        "Ran {} ticks ({} substeps); last tick {:?} with {} contacts",
        stats.ticks, stats.substeps, stats.last_tick, stats.contacts
    );
}
