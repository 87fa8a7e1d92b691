// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Line, Point};
use snowflake_geometry::{angle_between, direction, ray, segment_intersect};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_segments(count: usize, extent: f64, seed: u64) -> Vec<Line> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let p0 = Point::new(rng.next_f64() * extent, rng.next_f64() * extent);
            let p1 = Point::new(rng.next_f64() * extent, rng.next_f64() * extent);
            Line::new(p0, p1)
        })
        .collect()
}

fn bench_segment_intersect(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_intersect");
    let segments = gen_segments(1024, 1000.0, 0x5eed);
    let probes: Vec<Line> = (0..16)
        .map(|i| ray(Point::new(500.0, 500.0), f64::from(i) * 22.5, 10_000.0))
        .collect();
    group.throughput(Throughput::Elements((segments.len() * probes.len()) as u64));
    group.bench_function("random_vs_probes", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for s in &segments {
                for p in &probes {
                    hits += usize::from(segment_intersect(*s, *p).is_some());
                }
            }
            black_box(hits);
        })
    });
    group.finish();
}

fn bench_angle_between(c: &mut Criterion) {
    let mut group = c.benchmark_group("angle_between");
    let segments = gen_segments(1024, 1000.0, 0xa11e);
    group.throughput(Throughput::Elements((segments.len() - 1) as u64));
    group.bench_function("adjacent_pairs", |b| {
        b.iter(|| {
            let total: f64 = segments
                .windows(2)
                .map(|w| angle_between(direction(w[0]), direction(w[1])))
                .sum();
            black_box(total);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_segment_intersect, bench_angle_between);
criterion_main!(benches);
