// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated events and their derived identity keys.

use core::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use kurbo::Point;
use serde::Serialize;

use crate::error::{Field, RowError};

/// Stable identity of an event.
///
/// The source data has no primary key, so the key is derived from the event's timestamp and
/// the position (ordinal) of its row in the data source. Two events sharing a timestamp stay
/// distinct. Rejected rows still consume an ordinal, so keys do not shift when validation
/// rules change for unrelated rows.
///
/// Keys order by timestamp first and ordinal second, which is exactly the order of the
/// [`EventStore`](crate::EventStore).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EventId {
    timestamp: DateTime<Utc>,
    ordinal: u64,
}

impl EventId {
    /// Build a key from a timestamp and a source ordinal.
    pub const fn new(timestamp: DateTime<Utc>, ordinal: u64) -> Self {
        Self { timestamp, ordinal }
    }

    /// Timestamp component.
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Source ordinal component.
    pub const fn ordinal(&self) -> u64 {
        self.ordinal
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.ordinal
        )
    }
}

/// A single geolocated earthquake. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    id: EventId,
    latitude: f64,
    longitude: f64,
    magnitude: f64,
    depth_km: f64,
}

impl Event {
    /// Validate and build an event.
    ///
    /// Latitude must lie in `[-90, 90]`, longitude in `[-180, 180]`, and magnitude and depth
    /// must be non-negative. Every value must be finite.
    pub fn new(
        id: EventId,
        latitude: f64,
        longitude: f64,
        magnitude: f64,
        depth_km: f64,
    ) -> Result<Self, RowError> {
        check(Field::Latitude, latitude, -90.0, 90.0)?;
        check(Field::Longitude, longitude, -180.0, 180.0)?;
        check(Field::Magnitude, magnitude, 0.0, f64::INFINITY)?;
        check(Field::Depth, depth_km, 0.0, f64::INFINITY)?;
        Ok(Self {
            id,
            latitude,
            longitude,
            magnitude,
            depth_km,
        })
    }

    /// Stable key.
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Latitude in degrees.
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Magnitude.
    pub const fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Depth below the surface in kilometres.
    pub const fn depth_km(&self) -> f64 {
        self.depth_km
    }

    /// Instant the event occurred.
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.id.timestamp
    }

    /// Location in lon/lat space (`x` = longitude, `y` = latitude).
    pub const fn position(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

fn check(field: Field, value: f64, min: f64, max: f64) -> Result<(), RowError> {
    if !value.is_finite() {
        return Err(RowError::NonFinite { field, value });
    }
    if value < min || value > max {
        return Err(RowError::OutOfRange { field, value });
    }
    Ok(())
}
