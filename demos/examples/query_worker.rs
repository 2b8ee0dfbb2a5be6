// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run viewport queries on a worker thread, keep only the newest answer, and resolve a frame
//! from it.
//!
//! Run:
//! - `cargo run -p tremor_demos --example query_worker`

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tremor_feed::RawRow;
use tremor_replay::{GeoBounds, QueryWorker, ReplayConfig, ReplayEngine};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rows: Vec<RawRow> = (0..5_000_u32)
        .map(|i| {
            RawRow::new(
                format!("{}", f64::from(i % 170) - 85.0),
                format!("{}", f64::from(i % 359) - 179.0),
                "5.0",
                "10",
                "01/01/2020",
                format!("{:02}:{:02}:{:02}", i / 3600, i / 60 % 60, i % 60),
            )
        })
        .collect();
    let (mut engine, _) = match ReplayEngine::from_rows(&rows, &ReplayConfig::default()) {
        Ok(built) => built,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let mut worker = match QueryWorker::spawn(engine.store_handle(), engine.index_handle()) {
        Ok(worker) => worker,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    // A burst of pans; only the last one matters to the renderer.
    let mut last = 0;
    let mut last_bounds = GeoBounds::WORLD;
    for step in 0..10 {
        let west = -180.0 + f64::from(step) * 30.0;
        let Ok(bounds) = GeoBounds::new(-30.0, 30.0, west, west + 40.0) else {
            continue;
        };
        match worker.request(bounds) {
            Ok(seq) => {
                last = seq;
                last_bounds = bounds;
            }
            Err(err) => {
                eprintln!("{err}");
                return;
            }
        }
    }

    loop {
        match worker.recv_timeout(Duration::from_secs(1)) {
            Ok(Some(reply)) if reply.seq == last => {
                println!("query #{} -> {} events", reply.seq, reply.ids.len());
                engine.set_viewport(last_bounds);
                engine.seek(2_500);
                let frame = engine.resolve_reply(&reply);
                println!("released in view: {} entering", frame.entering.len());
                break;
            }
            Ok(Some(stale)) => println!("dropping stale reply #{}", stale.seq),
            Ok(None) => println!("still waiting"),
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        }
    }
}
