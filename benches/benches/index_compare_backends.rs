// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tremor_index::{Aabb2D, Index};

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

/// Uniform points over the globe, `(lon, lat, slot)`.
fn gen_uniform_points(count: usize) -> Vec<(f64, f64, u32)> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|i| {
            (
                rng.next_f64() * 360.0 - 180.0,
                rng.next_f64() * 180.0 - 90.0,
                i as u32,
            )
        })
        .collect()
}

/// Points bunched around a few centres, like aftershock sequences along plate boundaries.
fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<(f64, f64, u32)> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let centers: Vec<(f64, f64)> = (0..n_clusters)
        .map(|_| (rng.next_f64() * 300.0 - 150.0, rng.next_f64() * 120.0 - 60.0))
        .collect();
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push((cx + dx, cy + dy, out.len() as u32));
        }
    }
    out
}

fn regional_view() -> Aabb2D<f64> {
    Aabb2D::new(120.0, 20.0, 150.0, 50.0)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = gen_uniform_points(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("quadtree_n{}", n), |b| {
            b.iter(|| black_box(Index::<f64, u32>::build(&points).len()));
        });
        group.bench_function(format!("flatvec_n{}", n), |b| {
            b.iter(|| black_box(Index::<f64, u32>::with_flat_vec(&points).len()));
        });
    }
    group.finish();
}

fn bench_query_uniform(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_uniform");
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = gen_uniform_points(n);
        let quad = Index::<f64, u32>::build(&points);
        let flat = Index::<f64, u32>::with_flat_vec(&points);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("quadtree_n{}", n), |b| {
            b.iter(|| black_box(quad.query_rect(regional_view()).count()));
        });
        group.bench_function(format!("flatvec_n{}", n), |b| {
            b.iter(|| black_box(flat.query_rect(regional_view()).count()));
        });
    }
    group.finish();
}

fn bench_query_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_clustered");
    let points = gen_clustered_points(64, 256, 8.0);
    let quad = Index::<f64, u32>::build(&points);
    let flat = Index::<f64, u32>::with_flat_vec(&points);
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("quadtree", |b| {
        b.iter(|| black_box(quad.query_rect(regional_view()).count()));
    });
    group.bench_function("flatvec", |b| {
        b.iter(|| black_box(flat.query_rect(regional_view()).count()));
    });
    group.finish();
}

fn bench_leaf_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaf_capacity");
    let points = gen_uniform_points(50_000);
    for &cap in &[4usize, 16, 64] {
        group.bench_function(format!("build_and_query_cap{}", cap), |b| {
            b.iter_batched(
                || points.clone(),
                |pts| {
                    let idx = Index::<f64, u32>::with_quadtree(&pts, cap, 16);
                    black_box(idx.query_rect(regional_view()).count())
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_query_uniform,
    bench_query_clustered,
    bench_leaf_capacity,
);
criterion_main!(benches);
