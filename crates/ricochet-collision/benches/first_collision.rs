#![allow(missing_docs)]

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ricochet_collision::prelude::*;

/// Square grid of `side * side` small boxes spaced 40 units apart.
fn grid(side: u32) -> StaticWorld {
    let mut world = StaticWorld::new();
    for i in 0..side {
        for j in 0..side {
            let center = Vec2::new(i as f32 * 40.0, j as f32 * 40.0);
            if let Ok(aabb) = Aabb::new(center, Vec2::splat(8.0)) {
                world.insert(aabb);
            }
        }
    }
    world
}

fn criterion_benchmark(c: &mut Criterion) {
    let params = CollisionParams::default().with_invariant_checks(false);
    let Ok(ball) = Circle::new(Vec2::new(20.0, 20.0), 4.0) else {
        return;
    };

    for side in [8, 32, 64] {
        let world = grid(side);

        c.bench_function(&format!("first_collision, {} boxes, short move", side * side), |b| {
            b.iter(|| first_collision(&world, black_box(&ball), black_box(Vec2::new(5.0, 3.0)), &params));
        });

        c.bench_function(&format!("first_collision, {} boxes, long diagonal", side * side), |b| {
            b.iter(|| {
                first_collision(&world, black_box(&ball), black_box(Vec2::new(900.0, 870.0)), &params)
            });
        });

        c.bench_function(&format!("ballistic_move, {} boxes", side * side), |b| {
            b.iter(|| {
                ballistic_move(&world, black_box(&ball), black_box(Vec2::new(600.0, 450.0)), 1.0, 0.8, &params)
            });
        });
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = criterion_benchmark
);
criterion_main!(benches);
