// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic viewport bounds and the tracker holding the current one.

use kurbo::{Point, Rect};
use tremor_feed::Event;
use tremor_index::Aabb2D;

use crate::error::InputError;

/// A geographic bounding box in degrees.
///
/// Latitude bounds are ordered (`min_lat <= max_lat`). A box whose `min_lon` is greater than
/// its `max_lon` crosses the antimeridian: it covers `[min_lon, 180]` and `[-180, max_lon]`.
/// All bounds are inclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl GeoBounds {
    /// The whole globe.
    pub const WORLD: Self = Self {
        min_lat: -90.0,
        max_lat: 90.0,
        min_lon: -180.0,
        max_lon: 180.0,
    };

    /// Validate and build a box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, InputError> {
        let invalid = |reason| InputError::InvalidBounds { reason };
        if ![min_lat, max_lat, min_lon, max_lon]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(invalid("bounds must be finite"));
        }
        if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
            return Err(invalid("latitude must lie in [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&min_lon) || !(-180.0..=180.0).contains(&max_lon) {
            return Err(invalid("longitude must lie in [-180, 180]"));
        }
        if min_lat > max_lat {
            return Err(invalid("min_lat exceeds max_lat"));
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Build from a lon/lat rectangle (`x` = longitude, `y` = latitude), e.g. the inverse
    /// projection of a renderer's pixel viewport. The rectangle is normalized first and
    /// clamped to the globe, so it never crosses the antimeridian.
    pub fn from_rect(rect: Rect) -> Result<Self, InputError> {
        // `abs` and the clamps below would swallow a NaN edge.
        if !rect.is_finite() {
            return Err(InputError::InvalidBounds {
                reason: "bounds must be finite",
            });
        }
        let r = rect.abs();
        Self::new(
            r.y0.max(-90.0),
            r.y1.min(90.0),
            r.x0.max(-180.0),
            r.x1.min(180.0),
        )
    }

    /// The box as a lon/lat rectangle. A box crossing the antimeridian is unwrapped past
    /// `180`, so the rectangle keeps its true width.
    pub fn to_rect(&self) -> Rect {
        let max_lon = if self.crosses_antimeridian() {
            self.max_lon + 360.0
        } else {
            self.max_lon
        };
        Rect::new(self.min_lon, self.min_lat, max_lon, self.max_lat)
    }

    /// Southern edge.
    pub const fn min_lat(&self) -> f64 {
        self.min_lat
    }

    /// Northern edge.
    pub const fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Western edge.
    pub const fn min_lon(&self) -> f64 {
        self.min_lon
    }

    /// Eastern edge.
    pub const fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Whether the box wraps around the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    /// Whether the coordinate lies inside the box (edges included).
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        if latitude < self.min_lat || latitude > self.max_lat {
            return false;
        }
        if self.crosses_antimeridian() {
            longitude >= self.min_lon || longitude <= self.max_lon
        } else {
            longitude >= self.min_lon && longitude <= self.max_lon
        }
    }

    /// Whether the event lies inside the box.
    pub fn contains_event(&self, event: &Event) -> bool {
        self.contains(event.latitude(), event.longitude())
    }

    /// The index rectangles (`x` = longitude, `y` = latitude) covering this box: one, or two
    /// for a box crossing the antimeridian.
    pub fn index_rects(&self) -> impl Iterator<Item = Aabb2D<f64>> {
        let (first, second) = if self.crosses_antimeridian() {
            (
                Aabb2D::new(self.min_lon, self.min_lat, 180.0, self.max_lat),
                Some(Aabb2D::new(-180.0, self.min_lat, self.max_lon, self.max_lat)),
            )
        } else {
            (
                Aabb2D::new(self.min_lon, self.min_lat, self.max_lon, self.max_lat),
                None,
            )
        };
        core::iter::once(first).chain(second)
    }

    /// Position of a coordinate relative to the box, as a point in the unit square:
    /// `x` runs west to east, `y` runs north to south (screen orientation).
    ///
    /// Renderers scale this to pixels; coordinates outside the box map outside `[0, 1]`.
    /// A zero-extent axis maps to `0.5`.
    pub fn placement(&self, latitude: f64, longitude: f64) -> Point {
        let width = if self.crosses_antimeridian() {
            self.max_lon + 360.0 - self.min_lon
        } else {
            self.max_lon - self.min_lon
        };
        let dx = if self.crosses_antimeridian() && longitude < self.min_lon {
            longitude + 360.0 - self.min_lon
        } else {
            longitude - self.min_lon
        };
        let height = self.max_lat - self.min_lat;
        let x = if width > 0.0 { dx / width } else { 0.5 };
        let y = if height > 0.0 {
            (self.max_lat - latitude) / height
        } else {
            0.5
        };
        Point::new(x, y)
    }
}

/// Holds the currently visible bounds, if viewport tracking is active.
///
/// Written by the pan/zoom handler, read by the resolver.
#[derive(Clone, Debug, Default)]
pub struct ViewportTracker {
    current: Option<GeoBounds>,
}

impl ViewportTracker {
    /// A tracker with no active viewport (every released event is a candidate).
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bounds.
    pub const fn current(&self) -> Option<GeoBounds> {
        self.current
    }

    /// Replace the bounds. Returns whether they changed.
    pub fn set(&mut self, bounds: GeoBounds) -> bool {
        let changed = self.current != Some(bounds);
        self.current = Some(bounds);
        changed
    }

    /// Stop tracking. Returns whether a viewport was active.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }
}
