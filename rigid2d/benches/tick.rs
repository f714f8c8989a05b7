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
//! Benchmarks for full simulation ticks
//!
//! Measures the cost of one outer tick for scenes of falling balls resting
//! on a kinematic floor, and how it scales with the substep count.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use rigid2d::ecs::components::{Collider, Rigidbody, Transform};
use rigid2d::shapes::Shape;
use rigid2d::{Simulation, SimulationConfig};

fn build_scene(config: SimulationConfig, balls: usize) -> Simulation {
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => panic!("invalid benchmark config: {}", e),
    };
    let world = sim.world_mut();

    let floor = world.create_entity();
    world.attach(floor, Transform::default());
    world.attach(floor, Rigidbody::kinematic());
    world.attach(floor, Collider::new(0.3));
    world.attach(floor, Shape::edge(DVec2::new(-10.0, 0.0), DVec2::new(10.0, 0.0)));

    for i in 0..balls {
        let e = world.create_entity();
        let x = -9.0 + (i % 40) as f64 * 0.45;
        let y = 0.5 + (i / 40) as f64 * 0.45;
        world.attach(e, Transform::at(DVec2::new(x, y)));
        world.attach(e, Rigidbody::dynamic(1.0));
        world.attach(e, Collider::new(0.6));
        world.attach(e, Shape::circle(0.2));
    }

    // Let the pile settle so the benchmark measures resting contact
    for _ in 0..60 {
        sim.step();
    }
    sim
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for balls in [20, 80, 160].iter() {
        let mut sim = build_scene(SimulationConfig::default(), *balls);
        group.bench_with_input(BenchmarkId::new("balls", balls), balls, |b, _| {
            b.iter(|| sim.step());
        });
    }

    group.finish();
}

fn bench_substeps(c: &mut Criterion) {
    let mut group = c.benchmark_group("substeps");

    for substeps in [1u32, 4, 8, 16].iter() {
        let config = SimulationConfig::default().with_substeps(*substeps);
        let mut sim = build_scene(config, 80);
        group.bench_with_input(BenchmarkId::from_parameter(substeps), substeps, |b, _| {
            b.iter(|| sim.step());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick, bench_substeps);
criterion_main!(benches);
