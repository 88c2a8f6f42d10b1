// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Rect, Size, Vec2};
use understory_arrange::{
    Arrangement, Constraints, Edges, Element, ResizeRequest, TransformMode, solve_move,
    solve_resize,
};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_f64(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// A `side x side` grid of disjoint cells, each holding one jittered rectangle.
fn grid(side: u32, seed: u64) -> Vec<Rect> {
    let mut rng = Lcg::new(seed);
    let cell = 20.0;
    let mut rects = Vec::with_capacity((side * side) as usize);
    for row in 0..side {
        for col in 0..side {
            let x = f64::from(col) * cell;
            let y = f64::from(row) * cell;
            rects.push(Rect::new(
                x + rng.next_f64() * 4.0,
                y + rng.next_f64() * 4.0,
                x + cell - rng.next_f64() * 4.0,
                y + cell - rng.next_f64() * 4.0,
            ));
        }
    }
    rects
}

fn bench_solve_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("arrange/solve_move");

    // Obstacle count dominates: every selected rect is swept against every obstacle.
    for side in [4_u32, 8, 16, 32] {
        let mut obstacles = grid(side, 7);
        let selected = [obstacles.swap_remove(0)];
        let bounds = Rect::new(0.0, 0.0, f64::from(side) * 20.0, f64::from(side) * 20.0);
        group.throughput(Throughput::Elements(obstacles.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("diagonal", obstacles.len()),
            &obstacles,
            |b, obstacles| {
                let constraints = Constraints::default()
                    .with_bounds(Some(bounds))
                    .with_obstacles(obstacles);
                b.iter(|| {
                    black_box(solve_move(
                        black_box(&selected),
                        &constraints,
                        black_box(Vec2::new(35.0, 35.0)),
                    ))
                });
            },
        );
    }

    group.finish();
}

fn bench_solve_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("arrange/solve_resize");

    for side in [4_u32, 16, 32] {
        let mut obstacles = grid(side, 11);
        let rect = obstacles.swap_remove(0);
        group.throughput(Throughput::Elements(obstacles.len() as u64));

        for uniform in [false, true] {
            let request = ResizeRequest::new(rect, Edges::BOTTOM_RIGHT, Vec2::new(30.0, 45.0))
                .with_uniform(uniform);
            let name = if uniform { "uniform" } else { "free" };
            group.bench_with_input(
                BenchmarkId::new(name, obstacles.len()),
                &obstacles,
                |b, obstacles| {
                    let constraints = Constraints::default().with_obstacles(obstacles);
                    b.iter(|| black_box(solve_resize(black_box(&request), &constraints)));
                },
            );
        }
    }

    group.finish();
}

fn bench_session_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("arrange/session_drag");

    // A 60-tick pointer drag of a growing selection across a populated surface.
    for selected in [1_usize, 8, 32] {
        let side = 16_u32;
        let rects = grid(side, 3);
        let surface = Size::new(f64::from(side) * 20.0, f64::from(side) * 20.0);
        group.throughput(Throughput::Elements(60));

        group.bench_function(BenchmarkId::new("ticks", selected), |b| {
            b.iter_batched(
                || {
                    let mut arrangement = Arrangement::new(surface);
                    let ids: Vec<_> = rects
                        .iter()
                        .map(|r| arrangement.insert(Element::new(*r)))
                        .collect();
                    arrangement.replace_selection(ids.iter().copied().step_by(7).take(selected));
                    arrangement
                },
                |mut arrangement| {
                    arrangement.begin_transform(TransformMode::Move).unwrap();
                    for tick in 0..60 {
                        let dir = if tick % 20 < 10 { 1.0 } else { -1.0 };
                        let _ = arrangement.step(Vec2::new(1.5 * dir, 0.75));
                    }
                    black_box(arrangement.end_transform());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_solve_move,
    bench_solve_resize,
    bench_session_drag
);
criterion_main!(benches);
