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
//! Benchmarks for the pairwise bounding-box broad phase
//!
//! The broad phase is O(n²); these runs show where that starts to dominate
//! a collision pass.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::DVec2;
use rigid2d::collision::broad_phase::find_candidates;
use rigid2d::collision::CollisionSystem;
use rigid2d::ecs::components::{Collider, Rigidbody, Transform};
use rigid2d::ecs::{ComponentKind, System, World};
use rigid2d::shapes::Shape;

/// Scatter `count` small circles on a grid with light overlap
fn build_world(count: usize) -> World {
    let mut world = World::new();
    let side = (count as f64).sqrt().ceil() as usize;
    for i in 0..count {
        let e = world.create_entity();
        let x = (i % side) as f64 * 0.18;
        let y = (i / side) as f64 * 0.18;
        world.attach(e, Transform::at(DVec2::new(x, y)));
        world.attach(e, Rigidbody::dynamic(1.0));
        world.attach(e, Collider::new(0.5));
        world.attach(e, Shape::circle(0.1));
    }
    world
}

fn bench_find_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("broad_phase");

    for body_count in [10, 50, 100, 200].iter() {
        let world = build_world(*body_count);
        let bodies = world.query(&[
            ComponentKind::Transform,
            ComponentKind::Rigidbody,
            ComponentKind::Shape,
        ]);
        let pairs = (body_count * (body_count - 1) / 2) as u64;
        group.throughput(Throughput::Elements(pairs));

        group.bench_with_input(BenchmarkId::new("find_candidates", body_count), &bodies, |b, bodies| {
            let mut out = Vec::new();
            b.iter(|| {
                find_candidates(black_box(&world), bodies, &mut out);
                black_box(out.len());
            });
        });
    }

    group.finish();
}

fn bench_collision_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_pass");

    for body_count in [10, 50, 100, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(body_count), body_count, |b, &count| {
            let mut collision = CollisionSystem::new();
            b.iter_batched_ref(
                || build_world(count),
                |world| collision.run(world, 1.0 / 480.0),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_find_candidates, bench_collision_pass);
criterion_main!(benches);
