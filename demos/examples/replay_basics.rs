// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Play a small catalogue with a magnitude filter and print each frame.
//!
//! Run:
//! - `cargo run -p tremor_demos --example replay_basics`
//! - `RUST_LOG=tremor=debug cargo run -p tremor_demos --example replay_basics`

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tremor_feed::RawRow;
use tremor_replay::{ReplayEngine, config};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Rows as a CSV reader would hand them over, including a broken one.
    let rows = [
        RawRow::new("38.297", "142.373", "9.1", "29", "03/11/11", "05:46:24"),
        RawRow::new("-35.846", "-72.719", "8.8", "22.9", "02/27/10", "06:34:11"),
        RawRow::new("3.295", "95.982", "9.1", "30", "12/26/04", "00:58:53"),
        RawRow::new("28.230", "84.731", "7.8", "8.2", "04/25/15", "06:11:25"),
        RawRow::new("north", "0", "5", "10", "01/01/2000", "00:00:00"),
        RawRow::new("37.166", "37.032", "7.8", "10", "02/06/23", "01:17:35"),
        RawRow::new("35.770", "-117.599", "7.1", "8", "07/06/19", "03:19:53"),
        RawRow::new("18.457", "-72.533", "7.0", "13", "01/12/10", "21:53:10"),
        RawRow::new("-0.256", "119.846", "7.5", "20", "09/28/18", "10:02:43"),
    ];

    let (config, source) = config::load_from_env();
    let (mut engine, report) = match ReplayEngine::from_rows(&rows, &config) {
        Ok(built) => built,
        Err(err) => {
            eprintln!("bad config: {err}");
            return;
        }
    };
    println!(
        "loaded {} events ({} rejected: {:?}), config from {}",
        report.accepted,
        report.rejected(),
        report.rejected_by_kind(),
        source.map_or("defaults".to_owned(), |p| p.display().to_string()),
    );

    if let Err(err) = engine.set_min_magnitude(7.5) {
        eprintln!("{err}");
    }
    engine.play();

    // One frame per 60 Hz refresh until playback ends.
    let frame_time = Duration::from_micros(16_667);
    let mut pending = Vec::new();
    while !engine.status().finished {
        engine.advance(frame_time);
        let frame = engine.resolve();
        for item in &frame.entering {
            println!(
                "  + {} M{:.1} at ({:.2}, {:.2})",
                item.event.id(),
                item.event.magnitude(),
                item.event.latitude(),
                item.event.longitude(),
            );
        }
        pending.extend(frame.exiting.iter().map(|x| x.ticket));
    }

    let status = engine.status();
    println!(
        "finished at cursor {}/{}, last event {:?}, {} visible",
        status.cursor,
        status.len,
        status.displayed_timestamp,
        engine.visible().len(),
    );

    // Raise the bar; the renderer animates the exits and reports back.
    if let Err(err) = engine.set_min_magnitude(9.0) {
        eprintln!("{err}");
    }
    let frame = engine.resolve();
    for exit in &frame.exiting {
        println!("  - {} M{:.1}", exit.item.event.id(), exit.item.event.magnitude());
    }
    pending.extend(frame.exiting.iter().map(|x| x.ticket));
    let removed = pending
        .into_iter()
        .filter(|t| engine.finalize_removal(*t))
        .count();
    println!("{removed} visuals removed, {} still held", engine.presence().len());
}
