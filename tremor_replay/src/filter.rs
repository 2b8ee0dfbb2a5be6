// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The filter pipeline: independent predicates combined with logical AND.

use core::fmt;
use std::sync::Arc;

use tremor_feed::Event;

use crate::viewport::GeoBounds;

/// Events at or deeper than this many kilometres are not "shallow".
pub const SHALLOW_DEPTH_KM: f64 = 50.0;

/// A caller-supplied geographic predicate.
///
/// Cheap to clone; clones share the same predicate.
#[derive(Clone)]
pub struct Region(Arc<dyn Fn(&Event) -> bool + Send + Sync>);

impl Region {
    /// Wrap an arbitrary predicate.
    pub fn new(predicate: impl Fn(&Event) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Events inside `bounds`.
    pub fn within(bounds: GeoBounds) -> Self {
        Self::new(move |e| bounds.contains_event(e))
    }

    /// Evaluate the predicate.
    pub fn matches(&self, event: &Event) -> bool {
        (self.0)(event)
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region").finish_non_exhaustive()
    }
}

/// Filter settings. A value object: setters replace it as a whole.
#[derive(Clone, Debug, Default)]
pub struct FilterConfig {
    /// Minimum magnitude (inclusive).
    pub min_magnitude: f64,
    /// Only keep events shallower than [`SHALLOW_DEPTH_KM`].
    pub shallow_only: bool,
    /// Optional geographic predicate.
    pub region: Option<Region>,
}

impl FilterConfig {
    /// Copy with a different magnitude threshold.
    #[must_use]
    pub fn with_min_magnitude(&self, min_magnitude: f64) -> Self {
        Self {
            min_magnitude,
            ..self.clone()
        }
    }

    /// Copy with a different shallow-only flag.
    #[must_use]
    pub fn with_shallow_only(&self, shallow_only: bool) -> Self {
        Self {
            shallow_only,
            ..self.clone()
        }
    }

    /// Copy with a different region predicate.
    #[must_use]
    pub fn with_region(&self, region: Option<Region>) -> Self {
        Self {
            region,
            ..self.clone()
        }
    }
}

fn magnitude_ok(event: &Event, config: &FilterConfig) -> bool {
    event.magnitude() >= config.min_magnitude
}

fn depth_ok(event: &Event, config: &FilterConfig) -> bool {
    !config.shallow_only || event.depth_km() < SHALLOW_DEPTH_KM
}

fn region_ok(event: &Event, config: &FilterConfig) -> bool {
    config.region.as_ref().is_none_or(|r| r.matches(event))
}

/// Whether `event` passes every clause of `config`.
///
/// Pure; the clauses are independent, so evaluation order does not affect the result.
pub fn passes(event: &Event, config: &FilterConfig) -> bool {
    magnitude_ok(event, config) && depth_ok(event, config) && region_ok(event, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_feed::{RawRow, parse_row};

    fn quake(lat: &str, lon: &str, mag: &str, depth: &str) -> Event {
        parse_row(
            &RawRow::new(lat, lon, mag, depth, "01/01/2000", "00:00:00"),
            0,
        )
        .expect("valid test row")
    }

    #[test]
    fn default_passes_everything() {
        let cfg = FilterConfig::default();
        assert!(passes(&quake("0", "0", "0", "700"), &cfg));
    }

    #[test]
    fn magnitude_threshold_is_inclusive() {
        let cfg = FilterConfig::default().with_min_magnitude(5.0);
        assert!(passes(&quake("0", "0", "5.0", "10"), &cfg));
        assert!(!passes(&quake("0", "0", "4.99", "10"), &cfg));
    }

    #[test]
    fn shallow_only_excludes_fifty_km_and_below() {
        let cfg = FilterConfig::default().with_shallow_only(true);
        assert!(passes(&quake("0", "0", "6", "49.9"), &cfg));
        assert!(!passes(&quake("0", "0", "6", "50"), &cfg));
    }

    #[test]
    fn region_predicate_applies() {
        let japan = GeoBounds::new(24.0, 46.0, 122.0, 146.0).expect("valid");
        let cfg = FilterConfig::default().with_region(Some(Region::within(japan)));
        assert!(passes(&quake("35.6", "139.7", "6", "10"), &cfg));
        assert!(!passes(&quake("-33.4", "-70.6", "6", "10"), &cfg));
        let cleared = cfg.with_region(None);
        assert!(passes(&quake("-33.4", "-70.6", "6", "10"), &cleared));
    }

    #[test]
    fn clause_order_does_not_matter() {
        let cfg = FilterConfig {
            min_magnitude: 6.0,
            shallow_only: true,
            region: Some(Region::new(|e| e.latitude() > 0.0)),
        };
        for e in [
            quake("10", "0", "7", "10"),
            quake("10", "0", "5", "10"),
            quake("10", "0", "7", "80"),
            quake("-10", "0", "7", "10"),
        ] {
            let reversed = region_ok(&e, &cfg) && depth_ok(&e, &cfg) && magnitude_ok(&e, &cfg);
            assert_eq!(passes(&e, &cfg), reversed);
        }
    }
}
