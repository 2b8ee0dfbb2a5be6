// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan a viewport over a synthetic catalogue and print the enter/exit counts.
//!
//! Run:
//! - `cargo run -p tremor_demos --example viewport_culling`

use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;
use tremor_feed::RawRow;
use tremor_replay::{ReplayConfig, ReplayEngine};

const EVENTS: usize = 12_000;
const SCREEN: Size = Size::new(1280.0, 720.0);

fn synthetic_rows() -> Vec<RawRow> {
    let mut x: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        (x >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..EVENTS)
        .map(|i| {
            RawRow::new(
                format!("{:.3}", next() * 140.0 - 70.0),
                format!("{:.3}", next() * 360.0 - 180.0),
                format!("{:.1}", 2.5 + next() * 6.0),
                format!("{:.1}", next() * 300.0),
                format!("{:02}/{:02}/1995", i / 1000 + 1, i % 28 + 1),
                format!("{:02}:{:02}:00", i % 24, i % 60),
            )
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rows = synthetic_rows();
    let (mut engine, report) = match ReplayEngine::from_rows(&rows, &ReplayConfig::default()) {
        Ok(built) => built,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    println!("{} events loaded", report.accepted);
    engine.seek(engine.store().len());
    engine.set_shallow_only(true);

    // A 60 x 34 degree window sliding east, as a map would report it after each pan.
    for step in 0..8 {
        let west = -170.0 + f64::from(step) * 25.0;
        let view = Rect::new(west, -10.0, west + 60.0, 24.0);
        if let Err(err) = engine.set_viewport_rect(view) {
            eprintln!("{err}");
            continue;
        }
        let frame = engine.resolve();
        let first_pixel = frame
            .entering
            .first()
            .and_then(|item| item.placement)
            .map(|p| (p.x * SCREEN.width, p.y * SCREEN.height));
        println!(
            "view {:>7.1}..{:<7.1} enter {:>4} update {:>4} exit {:>4}  first at {:?}",
            view.x0,
            view.x1,
            frame.entering.len(),
            frame.updating.len(),
            frame.exiting.len(),
            first_pixel,
        );
        let tickets: Vec<_> = frame.exiting.iter().map(|x| x.ticket).collect();
        for ticket in tickets {
            engine.finalize_removal(ticket);
        }
    }
}
