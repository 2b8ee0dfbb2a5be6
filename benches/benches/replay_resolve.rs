// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tremor_feed::RawRow;
use tremor_replay::{GeoBounds, ReplayConfig, ReplayEngine, ResolveOrder};

fn gen_rows(count: usize) -> Vec<RawRow> {
    let mut x: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        (x >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..count)
        .map(|i| {
            let day = i / 86_400;
            let secs = i % 86_400;
            RawRow::new(
                format!("{:.3}", next() * 180.0 - 90.0),
                format!("{:.3}", next() * 360.0 - 180.0),
                format!("{:.1}", next() * 9.0),
                format!("{:.1}", next() * 700.0),
                format!("01/{:02}/2001", day + 1),
                format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60),
            )
        })
        .collect()
}

fn engine(rows: &[RawRow], order: ResolveOrder) -> ReplayEngine {
    let config = ReplayConfig {
        resolve_order: order,
        ..ReplayConfig::default()
    };
    let (mut engine, _) = ReplayEngine::from_rows(rows, &config).expect("default config is valid");
    engine.seek(rows.len());
    engine
}

fn bench_viewport_pan(c: &mut Criterion) {
    let rows = gen_rows(20_000);
    let views = [
        GeoBounds::new(20.0, 50.0, 120.0, 150.0).expect("valid"),
        GeoBounds::new(-40.0, -10.0, -80.0, -60.0).expect("valid"),
    ];
    let mut group = c.benchmark_group("viewport_pan_n20000");
    for order in [ResolveOrder::SpatialFirst, ResolveOrder::FilterFirst] {
        let mut e = engine(&rows, order);
        e.set_min_magnitude(4.0).expect("finite");
        let mut flip = 0;
        group.bench_function(format!("{:?}", order), |b| {
            b.iter(|| {
                flip ^= 1;
                e.set_viewport(views[flip]);
                black_box(e.resolve().entering.len())
            });
        });
    }
    group.finish();
}

fn bench_playback_tick(c: &mut Criterion) {
    let rows = gen_rows(20_000);
    let mut e = engine(&rows, ResolveOrder::Auto);
    e.set_viewport(GeoBounds::new(-60.0, 60.0, -120.0, 120.0).expect("valid"));
    c.bench_function("playback_tick_resolve_n20000", |b| {
        b.iter(|| {
            if !e.tick() {
                e.seek(0);
                e.play();
            }
            black_box(e.resolve().updating.len())
        });
    });
}

criterion_group!(benches, bench_viewport_pan, bench_playback_tick);
criterion_main!(benches);
