// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The immutable, time-sorted event store.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::RowError;
use crate::event::{Event, EventId};
use crate::row::{RawRow, parse_row};

/// A row that failed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct Rejection {
    /// Position of the row in the data source.
    pub ordinal: u64,
    /// Why it was dropped.
    pub error: RowError,
}

/// Outcome of building a store from raw rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    /// Rows read from the data source.
    pub total_rows: u64,
    /// Rows turned into events.
    pub accepted: u64,
    /// Rows dropped, in source order.
    pub rejections: Vec<Rejection>,
}

impl LoadReport {
    /// Number of dropped rows.
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }

    /// Dropped rows grouped by [`RowError::kind`].
    pub fn rejected_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut out = BTreeMap::new();
        for r in &self.rejections {
            *out.entry(r.error.kind()).or_insert(0) += 1;
        }
        out
    }
}

/// Ordered, immutable sequence of validated events.
///
/// Events are sorted ascending by timestamp, ties broken by [`EventId`]. The order never
/// changes after construction and no events can be added.
#[derive(Clone, Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    /// Validate `rows` and build the store.
    ///
    /// Each row is checked on its own; a bad row is recorded in the report and skipped.
    /// Row `i` of the iterator gets ordinal `i`.
    pub fn from_rows<I>(rows: I) -> (Self, LoadReport)
    where
        I: IntoIterator,
        I::Item: Borrow<RawRow>,
    {
        let mut report = LoadReport::default();
        let mut events = Vec::new();
        for (ordinal, row) in (0_u64..).zip(rows) {
            report.total_rows += 1;
            match parse_row(row.borrow(), ordinal) {
                Ok(event) => events.push(event),
                Err(error) => {
                    debug!(
                        target: "tremor::feed",
                        ordinal,
                        kind = error.kind(),
                        %error,
                        "row.rejected"
                    );
                    report.rejections.push(Rejection { ordinal, error });
                }
            }
        }
        report.accepted = report.total_rows - report.rejections.len() as u64;
        let store = Self::from_events(events);
        if store.is_empty() {
            warn!(
                target: "tremor::feed",
                total_rows = report.total_rows,
                rejected = report.rejected(),
                "store.empty"
            );
        } else {
            info!(
                target: "tremor::feed",
                total_rows = report.total_rows,
                accepted = report.accepted,
                rejected = report.rejected(),
                "store.loaded"
            );
        }
        (store, report)
    }

    /// Build a store from already-validated events, sorting them.
    ///
    /// Events must carry distinct ids; duplicates are dropped, keeping the first.
    pub fn from_events(mut events: Vec<Event>) -> Self {
        events.sort_by_key(Event::id);
        let before = events.len();
        events.dedup_by_key(|e| e.id());
        if events.len() != before {
            warn!(
                target: "tremor::feed",
                dropped = before - events.len(),
                "store.duplicate_ids"
            );
        }
        Self { events }
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event at `position`.
    pub fn get(&self, position: usize) -> Option<&Event> {
        self.events.get(position)
    }

    /// All events in chronological order.
    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// Iterate in chronological order.
    pub fn iter(&self) -> core::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Position of the event with key `id`.
    pub fn position_of(&self, id: EventId) -> Option<usize> {
        self.events.binary_search_by_key(&id, Event::id).ok()
    }

    /// First position whose event happened at or after `instant` (`len()` if none).
    ///
    /// Seeking a playback cursor here releases exactly the events strictly before `instant`.
    pub fn first_position_at_or_after(&self, instant: DateTime<Utc>) -> usize {
        self.events.partition_point(|e| e.timestamp() < instant)
    }

    /// Timestamps of the first and last events.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((
            self.events.first()?.timestamp(),
            self.events.last()?.timestamp(),
        ))
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = &'a Event;
    type IntoIter = core::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
