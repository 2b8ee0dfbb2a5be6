// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible-set resolver: released events, narrowed by viewport and filter.
//!
//! A pass combines three inputs:
//!
//! 1. the released prefix of the store, `[0, cursor)`;
//! 2. the viewport, if one is active;
//! 3. the filter.
//!
//! Viewport and filter are both plain intersections, so they commute. [`ResolveOrder`]
//! only chooses which one runs first.

use std::collections::BTreeMap;

use serde::Deserialize;
use tremor_feed::{EventId, EventStore};

use crate::filter::{FilterConfig, passes};
use crate::spatial::SpatialIndex;
use crate::viewport::GeoBounds;

/// Which narrowing step runs first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOrder {
    /// Spatial first whenever a viewport is active.
    #[default]
    Auto,
    /// Query the spatial index, then filter the hits.
    SpatialFirst,
    /// Filter the released events, then test each survivor against the viewport.
    FilterFirst,
}

impl ResolveOrder {
    fn spatial_first(self, viewport: Option<&GeoBounds>) -> bool {
        match self {
            Self::Auto => viewport.is_some(),
            Self::SpatialFirst => true,
            Self::FilterFirst => false,
        }
    }
}

/// Result of one resolver pass: event id to store position.
///
/// Iterates in ascending id order, which is also ascending store order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSet {
    members: BTreeMap<EventId, usize>,
}

impl VisibleSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of visible events.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `id` is visible.
    pub fn contains(&self, id: EventId) -> bool {
        self.members.contains_key(&id)
    }

    /// Store position of `id`, if visible.
    pub fn get(&self, id: EventId) -> Option<usize> {
        self.members.get(&id).copied()
    }

    /// Visible ids, ascending.
    pub fn keys(&self) -> impl Iterator<Item = EventId> + '_ {
        self.members.keys().copied()
    }

    /// `(id, position)` pairs, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (EventId, usize)> + '_ {
        self.members.iter().map(|(id, pos)| (*id, *pos))
    }
}

impl FromIterator<(EventId, usize)> for VisibleSet {
    fn from_iter<I: IntoIterator<Item = (EventId, usize)>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

/// Inputs of one resolver pass, captured together.
#[derive(Clone, Copy, Debug)]
pub struct ResolveInputs<'a> {
    /// Released prefix length; clamped to the store length.
    pub cursor: usize,
    /// Filter in effect for this pass.
    pub filter: &'a FilterConfig,
    /// Active viewport, if any.
    pub viewport: Option<&'a GeoBounds>,
    /// Narrowing order.
    pub order: ResolveOrder,
}

/// Run one resolver pass.
pub fn resolve(store: &EventStore, index: &SpatialIndex, inputs: ResolveInputs<'_>) -> VisibleSet {
    let cursor = inputs.cursor.min(store.len());
    let filter = inputs.filter;
    let visible: VisibleSet = match inputs.viewport {
        Some(bounds) if inputs.order.spatial_first(inputs.viewport) => index
            .query(bounds)
            .into_iter()
            // Hits are ascending, so everything past the cursor is a suffix.
            .take_while(|&pos| pos < cursor)
            .filter_map(|pos| store.get(pos).map(|e| (e, pos)))
            .filter(|(e, _)| passes(e, filter))
            .map(|(e, pos)| (e.id(), pos))
            .collect(),
        viewport => store.as_slice()[..cursor]
            .iter()
            .enumerate()
            .filter(|(_, e)| passes(e, filter))
            .filter(|(_, e)| viewport.is_none_or(|b| b.contains_event(e)))
            .map(|(pos, e)| (e.id(), pos))
            .collect(),
    };
    tracing::trace!(
        target: "tremor::replay",
        cursor,
        viewport = inputs.viewport.is_some(),
        order = ?inputs.order,
        visible = visible.len(),
        "resolve.pass"
    );
    visible
}

/// Run one resolver pass over viewport hits computed elsewhere, e.g. replies of a
/// [`QueryWorker`](crate::worker::QueryWorker).
///
/// `hits` must already be culled to the pass's viewport; only the cursor and the filter are
/// applied here. Ids missing from `store` are skipped.
pub fn resolve_hits(
    store: &EventStore,
    hits: &[EventId],
    cursor: usize,
    filter: &FilterConfig,
) -> VisibleSet {
    let cursor = cursor.min(store.len());
    let visible: VisibleSet = hits
        .iter()
        .filter_map(|&id| store.position_of(id))
        .filter(|&pos| pos < cursor)
        .filter_map(|pos| store.get(pos).map(|e| (e, pos)))
        .filter(|(e, _)| passes(e, filter))
        .map(|(e, pos)| (e.id(), pos))
        .collect();
    tracing::trace!(
        target: "tremor::replay",
        cursor,
        hits = hits.len(),
        visible = visible.len(),
        "resolve.hits"
    );
    visible
}
