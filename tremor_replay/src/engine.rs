// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The replay engine: one object owning the store, index, clock, filter, viewport and ledger.
//!
//! ## Usage
//!
//! 1) Build the engine from an [`EventStore`] (or raw rows) and a [`ReplayConfig`].
//! 2) Forward UI input to the setters; they only record what changed.
//! 3) Drive the clock with [`ReplayEngine::tick`] or [`ReplayEngine::advance`].
//! 4) Call [`ReplayEngine::resolve`] once per frame and hand the [`Frame`] to the renderer.
//! 5) When an exit animation completes, return its ticket with
//!    [`ReplayEngine::finalize_removal`].
//!
//! ```
//! use tremor_feed::RawRow;
//! use tremor_replay::{ReplayConfig, ReplayEngine};
//!
//! let rows = [
//!     RawRow::new("35.6", "139.7", "3.0", "10", "01/01/2000", "00:00:00"),
//!     RawRow::new("35.7", "139.8", "6.0", "10", "01/01/2000", "00:00:01"),
//! ];
//! let (mut engine, report) = ReplayEngine::from_rows(&rows, &ReplayConfig::default()).unwrap();
//! assert_eq!(report.accepted, 2);
//!
//! engine.set_min_magnitude(5.0).unwrap();
//! engine.play();
//! engine.tick();
//! engine.tick();
//! let frame = engine.resolve();
//! assert_eq!(frame.entering.len(), 1);
//! assert_eq!(frame.entering[0].event.magnitude(), 6.0);
//! ```

use std::borrow::Borrow;
use std::sync::Arc;
use std::time::Duration;

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use kurbo::{Point, Rect};
use tremor_feed::{Event, EventId, EventStore, LoadReport, RawRow};

use crate::clock::{ClockState, SimulationClock};
use crate::config::ReplayConfig;
use crate::diff::{Transitions, diff};
use crate::driver::TickDriver;
use crate::error::{ConfigError, InputError};
use crate::filter::{FilterConfig, Region};
use crate::presence::{ExitTicket, Presence};
use crate::resolver::{self, ResolveInputs, ResolveOrder, VisibleSet};
use crate::spatial::SpatialIndex;
use crate::viewport::{GeoBounds, ViewportTracker};
use crate::worker::QueryReply;

bitflags! {
    /// Inputs that changed since the last resolver pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    struct Changes: u8 {
        const CURSOR   = 0b0000_0001;
        const FILTER   = 0b0000_0010;
        const VIEWPORT = 0b0000_0100;
        const ORDER    = 0b0000_1000;
    }
}

/// An event handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameItem<'a> {
    /// The event record.
    pub event: &'a Event,
    /// Position inside the active viewport as a unit-square point, if a viewport is active.
    /// See [`GeoBounds::placement`].
    pub placement: Option<Point>,
}

/// An event whose visual should animate out, with the ticket that completes its removal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExitingItem<'a> {
    /// Return this through [`ReplayEngine::finalize_removal`] when the animation is done.
    pub ticket: ExitTicket,
    /// The event record.
    pub item: FrameItem<'a>,
}

/// Output of one resolver pass, each list in ascending key order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame<'a> {
    /// Newly visible events.
    pub entering: Vec<FrameItem<'a>>,
    /// Events that stay visible, including ones whose pending exit was cancelled.
    pub updating: Vec<FrameItem<'a>>,
    /// Events that left the visible set.
    pub exiting: Vec<ExitingItem<'a>>,
}

impl Frame<'_> {
    /// Whether the frame carries no events at all.
    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.updating.is_empty() && self.exiting.is_empty()
    }
}

/// Snapshot of playback for UI controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackStatus {
    /// Released prefix length.
    pub cursor: usize,
    /// Number of events in the store.
    pub len: usize,
    /// Clock state.
    pub state: ClockState,
    /// Whether ticks advance the cursor.
    pub running: bool,
    /// Whether the cursor reached the end.
    pub finished: bool,
    /// Whether the store holds any events.
    pub has_data: bool,
    /// Timestamp of the most recently released event.
    pub displayed_timestamp: Option<DateTime<Utc>>,
}

/// Replay engine.
///
/// All inputs are plain `&mut self` calls; nothing is computed until [`resolve`](Self::resolve),
/// which reads cursor, filter and viewport together.
#[derive(Debug)]
pub struct ReplayEngine {
    store: Arc<EventStore>,
    index: Arc<SpatialIndex>,
    clock: SimulationClock,
    driver: TickDriver,
    filter: FilterConfig,
    viewport: ViewportTracker,
    order: ResolveOrder,
    previous: VisibleSet,
    presence: Presence,
    changes: Changes,
}

impl ReplayEngine {
    /// Build an engine over `store`.
    pub fn new(store: EventStore, config: &ReplayConfig) -> Result<Self, ConfigError> {
        Self::from_shared(Arc::new(store), config)
    }

    /// Build an engine over a store that is already shared (e.g. with a
    /// [`QueryWorker`](crate::worker::QueryWorker)).
    pub fn from_shared(store: Arc<EventStore>, config: &ReplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let driver = TickDriver::new(config.tick_interval())?;
        let index = Arc::new(SpatialIndex::build(&store, &config.index));
        if store.is_empty() {
            tracing::warn!(target: "tremor::replay", "engine.empty_dataset");
        } else {
            tracing::info!(
                target: "tremor::replay",
                events = store.len(),
                tick_ms = config.tick_interval_ms,
                order = ?config.resolve_order,
                "engine.ready"
            );
        }
        Ok(Self {
            clock: SimulationClock::new(store.len()),
            store,
            index,
            driver,
            filter: config.filter.to_filter(),
            viewport: ViewportTracker::new(),
            order: config.resolve_order,
            previous: VisibleSet::new(),
            presence: Presence::new(),
            changes: Changes::all(),
        })
    }

    /// Validate `rows` into a store and build an engine over it.
    ///
    /// Rejected rows are reported, never fatal.
    pub fn from_rows<I>(rows: I, config: &ReplayConfig) -> Result<(Self, LoadReport), ConfigError>
    where
        I: IntoIterator,
        I::Item: Borrow<RawRow>,
    {
        let (store, report) = EventStore::from_rows(rows);
        Ok((Self::new(store, config)?, report))
    }

    /// The event store.
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Shared handle to the store.
    pub fn store_handle(&self) -> Arc<EventStore> {
        Arc::clone(&self.store)
    }

    /// Shared handle to the spatial index.
    pub fn index_handle(&self) -> Arc<SpatialIndex> {
        Arc::clone(&self.index)
    }

    /// Whether the store holds any events.
    pub fn has_data(&self) -> bool {
        !self.store.is_empty()
    }

    /// Current filter.
    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    /// Active viewport, if any.
    pub fn viewport(&self) -> Option<GeoBounds> {
        self.viewport.current()
    }

    /// Visible set of the last pass.
    pub fn visible(&self) -> &VisibleSet {
        &self.previous
    }

    /// Presence ledger.
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Narrowing order used by the resolver.
    pub fn resolve_order(&self) -> ResolveOrder {
        self.order
    }

    /// Wall time per tick.
    pub fn tick_interval(&self) -> Duration {
        self.driver.interval()
    }

    fn replace_filter(&mut self, filter: FilterConfig) {
        self.filter = filter;
        self.changes |= Changes::FILTER;
    }

    /// Set the minimum magnitude. Rejects NaN and infinities, keeping the previous threshold.
    pub fn set_min_magnitude(&mut self, min_magnitude: f64) -> Result<(), InputError> {
        if !min_magnitude.is_finite() {
            tracing::warn!(target: "tremor::replay", min_magnitude, "input.rejected");
            return Err(InputError::NonFiniteMagnitude(min_magnitude));
        }
        if min_magnitude != self.filter.min_magnitude {
            tracing::debug!(target: "tremor::replay", min_magnitude, "filter.min_magnitude");
            self.replace_filter(self.filter.with_min_magnitude(min_magnitude));
        }
        Ok(())
    }

    /// Toggle the shallow-only clause.
    pub fn set_shallow_only(&mut self, shallow_only: bool) {
        if shallow_only != self.filter.shallow_only {
            tracing::debug!(target: "tremor::replay", shallow_only, "filter.shallow_only");
            self.replace_filter(self.filter.with_shallow_only(shallow_only));
        }
    }

    /// Replace the region predicate.
    pub fn set_region(&mut self, region: Option<Region>) {
        tracing::debug!(target: "tremor::replay", active = region.is_some(), "filter.region");
        self.replace_filter(self.filter.with_region(region));
    }

    /// Replace the whole filter at once.
    pub fn set_filter(&mut self, filter: FilterConfig) -> Result<(), InputError> {
        if !filter.min_magnitude.is_finite() {
            tracing::warn!(
                target: "tremor::replay",
                min_magnitude = filter.min_magnitude,
                "input.rejected"
            );
            return Err(InputError::NonFiniteMagnitude(filter.min_magnitude));
        }
        self.replace_filter(filter);
        Ok(())
    }

    /// Choose the narrowing order for later passes.
    pub fn set_resolve_order(&mut self, order: ResolveOrder) {
        if order != self.order {
            self.order = order;
            self.changes |= Changes::ORDER;
        }
    }

    /// Restrict the visible set to `bounds`.
    pub fn set_viewport(&mut self, bounds: GeoBounds) {
        if self.viewport.set(bounds) {
            self.changes |= Changes::VIEWPORT;
        }
    }

    /// Restrict the visible set to a lon/lat rectangle (`x` = longitude, `y` = latitude).
    /// Rejects unusable rectangles, keeping the previous viewport.
    pub fn set_viewport_rect(&mut self, rect: Rect) -> Result<(), InputError> {
        match GeoBounds::from_rect(rect) {
            Ok(bounds) => {
                self.set_viewport(bounds);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(target: "tremor::replay", ?rect, error = %err, "input.rejected");
                Err(err)
            }
        }
    }

    /// Stop viewport culling.
    pub fn clear_viewport(&mut self) {
        if self.viewport.clear() {
            self.changes |= Changes::VIEWPORT;
        }
    }

    /// Start or resume playback.
    pub fn play(&mut self) {
        self.clock.start();
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        self.clock.pause();
        self.driver.reset();
    }

    /// Move the cursor to `index` (clamped). Returns the new cursor.
    pub fn seek(&mut self, index: usize) -> usize {
        let before = self.clock.cursor();
        let after = self.clock.seek(index);
        self.driver.reset();
        if after != before {
            tracing::debug!(target: "tremor::replay", from = before, to = after, "clock.seek");
            self.changes |= Changes::CURSOR;
        }
        after
    }

    /// Move the cursor so that exactly the events before `instant` are released.
    pub fn seek_to_time(&mut self, instant: DateTime<Utc>) -> usize {
        self.seek(self.store.first_position_at_or_after(instant))
    }

    /// Advance one event if playing. Returns whether the cursor moved.
    pub fn tick(&mut self) -> bool {
        let moved = self.clock.tick();
        if moved {
            self.changes |= Changes::CURSOR;
            if self.clock.is_finished() {
                tracing::info!(target: "tremor::replay", cursor = self.clock.cursor(), "clock.finished");
            }
        }
        moved
    }

    /// Feed elapsed wall time to the tick driver and apply the ticks it yields.
    ///
    /// Time passing while the clock is not running is discarded. Returns how many events
    /// were released.
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        if !self.clock.is_running() {
            self.driver.reset();
            return 0;
        }
        let due = self.driver.advance(elapsed);
        let mut applied = 0;
        while applied < due && self.tick() {
            applied += 1;
        }
        applied
    }

    /// Playback snapshot.
    pub fn status(&self) -> PlaybackStatus {
        let cursor = self.clock.cursor();
        PlaybackStatus {
            cursor,
            len: self.clock.len(),
            state: self.clock.state(),
            running: self.clock.is_running(),
            finished: self.clock.is_finished(),
            has_data: self.has_data(),
            displayed_timestamp: cursor
                .checked_sub(1)
                .and_then(|last| self.store.get(last))
                .map(Event::timestamp),
        }
    }

    /// Run one resolver pass and classify the result against the previous pass.
    ///
    /// When no input changed since the last pass, the previous visible set is reused and every
    /// member is reported as updating.
    pub fn resolve(&mut self) -> Frame<'_> {
        let current = (!self.changes.is_empty()).then(|| {
            resolver::resolve(
                &self.store,
                &self.index,
                ResolveInputs {
                    cursor: self.clock.cursor(),
                    filter: &self.filter,
                    viewport: self.viewport.current().as_ref(),
                    order: self.order,
                },
            )
        });
        self.commit(current)
    }

    /// Like [`resolve`](Self::resolve), but takes the viewport hits from a
    /// [`QueryWorker`](crate::worker::QueryWorker) reply.
    ///
    /// The reply is used only if it was computed for the current viewport. Otherwise the
    /// pass falls back to the local index.
    pub fn resolve_reply(&mut self, reply: &QueryReply) -> Frame<'_> {
        if self.viewport.current() != Some(reply.bounds) {
            tracing::debug!(target: "tremor::replay", seq = reply.seq, "resolve.stale_reply");
            return self.resolve();
        }
        let current = resolver::resolve_hits(
            &self.store,
            &reply.ids,
            self.clock.cursor(),
            &self.filter,
        );
        self.commit(Some(current))
    }

    fn commit(&mut self, current: Option<VisibleSet>) -> Frame<'_> {
        let transitions = match current {
            None => diff(&self.previous, &self.previous),
            Some(current) => {
                let t = diff(&self.previous, &current);
                self.previous = current;
                t
            }
        };
        self.changes = Changes::empty();
        let Transitions {
            entering,
            updating,
            exiting,
        } = self.presence.apply(transitions);

        let viewport = self.viewport.current();
        let store = &*self.store;
        let item = |id: EventId, pos: Option<usize>| {
            pos.or_else(|| store.position_of(id))
                .and_then(|p| store.get(p))
                .map(|event| FrameItem {
                    event,
                    placement: viewport.map(|b| b.placement(event.latitude(), event.longitude())),
                })
        };
        let frame = Frame {
            entering: entering
                .into_iter()
                .filter_map(|id| item(id, self.previous.get(id)))
                .collect(),
            updating: updating
                .into_iter()
                .filter_map(|id| item(id, self.previous.get(id)))
                .collect(),
            exiting: exiting
                .into_iter()
                .filter_map(|id| {
                    let ticket = self.presence.pending_ticket(id)?;
                    Some(ExitingItem {
                        ticket,
                        item: item(id, None)?,
                    })
                })
                .collect(),
        };
        if !frame.entering.is_empty() || !frame.exiting.is_empty() {
            tracing::debug!(
                target: "tremor::replay",
                entering = frame.entering.len(),
                updating = frame.updating.len(),
                exiting = frame.exiting.len(),
                "frame.resolved"
            );
        }
        frame
    }

    /// Complete the removal of an exited visual. Stale tickets are ignored and return `false`.
    pub fn finalize_removal(&mut self, ticket: ExitTicket) -> bool {
        self.presence.finalize_removal(ticket)
    }
}
