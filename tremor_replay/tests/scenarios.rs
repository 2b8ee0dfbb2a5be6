// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end playback scenarios through the public engine API.

use std::time::Duration;

use tremor_feed::{EventId, RawRow};
use tremor_replay::{
    ClockState, FilterConfig, FrameItem, GeoBounds, ReplayConfig, ReplayEngine, ResolveOrder, diff,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `(lat, lon, mag)` events, one minute apart, 10 km deep.
fn engine(events: &[(f64, f64, f64)], config: &ReplayConfig) -> ReplayEngine {
    init_tracing();
    let rows: Vec<RawRow> = events
        .iter()
        .enumerate()
        .map(|(i, (lat, lon, mag))| {
            RawRow::new(
                lat.to_string(),
                lon.to_string(),
                mag.to_string(),
                "10",
                "11/09/1989",
                format!("{:02}:{:02}:00", i / 60, i % 60),
            )
        })
        .collect();
    let (engine, report) = ReplayEngine::from_rows(&rows, config).expect("valid config");
    assert_eq!(report.rejected(), 0);
    engine
}

fn magnitudes(items: &[FrameItem<'_>]) -> Vec<f64> {
    items.iter().map(|i| i.event.magnitude()).collect()
}

#[test]
fn magnitude_threshold_keeps_strong_events() {
    let mut e = engine(
        &[(0.0, 0.0, 3.0), (0.0, 0.0, 6.0), (0.0, 0.0, 8.0)],
        &ReplayConfig::default(),
    );
    e.set_min_magnitude(5.0).expect("finite");

    e.seek(2);
    assert_eq!(magnitudes(&e.resolve().entering), vec![6.0]);

    e.seek(3);
    let frame = e.resolve();
    assert_eq!(magnitudes(&frame.entering), vec![8.0]);
    assert_eq!(magnitudes(&frame.updating), vec![6.0]);
    let ids: Vec<EventId> = e.visible().keys().collect();
    let store = e.store();
    assert_eq!(
        ids,
        vec![
            store.get(1).expect("event").id(),
            store.get(2).expect("event").id()
        ]
    );
}

#[test]
fn three_ticks_play_to_the_end() {
    let mut e = engine(
        &[(0.0, 0.0, 1.0), (1.0, 1.0, 1.0), (2.0, 2.0, 1.0)],
        &ReplayConfig::default(),
    );
    e.play();
    assert_eq!(e.seek(0), 0);
    let mut cursors = vec![e.status().cursor];
    for _ in 0..3 {
        assert!(e.tick());
        cursors.push(e.status().cursor);
    }
    assert_eq!(cursors, vec![0, 1, 2, 3]);
    let status = e.status();
    assert_eq!(status.state, ClockState::Finished);
    assert!(!status.running);
    assert!(!e.tick());
}

#[test]
fn empty_viewport_exits_everything() {
    let mut e = engine(
        &[(10.0, 10.0, 5.0), (20.0, 20.0, 5.0), (30.0, 30.0, 5.0)],
        &ReplayConfig::default(),
    );
    e.seek(3);
    let previous = e.resolve().entering.len();
    assert_eq!(previous, 3);

    e.set_viewport(GeoBounds::new(-60.0, -50.0, -60.0, -50.0).expect("valid"));
    let frame = e.resolve();
    assert!(frame.entering.is_empty());
    assert!(frame.updating.is_empty());
    assert_eq!(frame.exiting.len(), 3);
    assert!(e.visible().is_empty());
}

#[test]
fn playback_never_removes_members() {
    let events: Vec<(f64, f64, f64)> = (0..120_u32)
        .map(|i| {
            (
                f64::from(i % 19) * 9.0 - 80.0,
                f64::from(i % 23) * 15.0 - 170.0,
                f64::from(i % 10),
            )
        })
        .collect();
    let mut e = engine(&events, &ReplayConfig::default());
    e.set_min_magnitude(4.0).expect("finite");
    e.set_shallow_only(true);
    e.set_viewport(GeoBounds::new(-45.0, 45.0, -90.0, 90.0).expect("valid"));
    e.play();
    let mut previous = e.visible().clone();
    while e.tick() {
        let exits = e.resolve().exiting.len();
        assert_eq!(exits, 0);
        let current = e.visible().clone();
        assert!(diff(&previous, &current).exiting.is_empty());
        assert!(current.len() >= previous.len());
        previous = current;
    }
    assert!(!previous.is_empty());
}

#[test]
fn reentering_key_cancels_its_exit() {
    let mut e = engine(&[(0.0, 0.0, 4.0), (0.0, 0.0, 7.0)], &ReplayConfig::default());
    e.seek(2);
    assert_eq!(e.resolve().entering.len(), 2);

    e.set_min_magnitude(5.0).expect("finite");
    let ticket = {
        let frame = e.resolve();
        assert_eq!(frame.exiting.len(), 1);
        frame.exiting[0].ticket
    };
    assert!(e.presence().is_exiting(ticket.id()));

    // Toggled back before the exit animation finished.
    e.set_min_magnitude(0.0).expect("finite");
    let frame = e.resolve();
    assert!(frame.entering.is_empty());
    assert_eq!(magnitudes(&frame.updating), vec![4.0, 7.0]);

    assert!(!e.finalize_removal(ticket), "stale completion is ignored");
    assert!(e.presence().is_live(ticket.id()));
}

#[test]
fn finalized_exit_reenters_as_new() {
    let mut e = engine(&[(0.0, 0.0, 4.0)], &ReplayConfig::default());
    e.seek(1);
    e.resolve();
    e.set_filter(FilterConfig::default().with_min_magnitude(9.0))
        .expect("finite");
    let ticket = e.resolve().exiting[0].ticket;
    assert!(e.finalize_removal(ticket));
    assert!(e.presence().is_empty());

    e.set_filter(FilterConfig::default()).expect("finite");
    assert_eq!(e.resolve().entering.len(), 1);
}

#[test]
fn resolve_orders_agree_through_the_engine() {
    let events: Vec<(f64, f64, f64)> = (0..80_u32)
        .map(|i| {
            (
                f64::from(i % 11) * 16.0 - 80.0,
                f64::from(i % 13) * 27.0 - 162.0,
                f64::from(i % 8),
            )
        })
        .collect();
    let bounds = GeoBounds::new(-30.0, 60.0, 100.0, -100.0).expect("valid");
    let run = |order| {
        let config = ReplayConfig {
            resolve_order: order,
            ..ReplayConfig::default()
        };
        let mut e = engine(&events, &config);
        e.set_min_magnitude(3.0).expect("finite");
        e.set_viewport(bounds);
        e.seek(55);
        e.resolve();
        e.visible().keys().collect::<Vec<_>>()
    };
    let spatial = run(ResolveOrder::SpatialFirst);
    assert!(!spatial.is_empty());
    assert_eq!(spatial, run(ResolveOrder::FilterFirst));
    assert_eq!(spatial, run(ResolveOrder::Auto));
}

#[test]
fn wall_time_drives_playback() {
    let config = ReplayConfig::from_json_str(r#"{ "tick_interval_ms": 40 }"#).expect("valid");
    let mut e = engine(&[(0.0, 0.0, 1.0); 10], &config);
    e.play();
    for _ in 0..6 {
        e.advance(Duration::from_millis(16));
    }
    assert_eq!(e.status().cursor, 2);
    e.pause();
    assert_eq!(e.advance(Duration::from_secs(1)), 0);
    assert_eq!(e.status().state, ClockState::Paused);
}
