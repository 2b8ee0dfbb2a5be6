// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic adaptor over the point quadtree.

use kurbo::Point;
use tremor_feed::EventStore;
use tremor_index::{Index, QuadTree};

use crate::config::IndexSettings;
use crate::viewport::GeoBounds;

/// Spatial index over every event of a store.
///
/// Points are `(longitude, latitude)`; the payload is the event's position in the store.
/// Built once; rebuilding is only needed when the store changes.
#[derive(Debug)]
pub struct SpatialIndex {
    index: Index<f64, usize>,
}

impl SpatialIndex {
    /// Index `store` with the given quadtree settings.
    pub fn build(store: &EventStore, settings: &IndexSettings) -> Self {
        let items: Vec<(f64, f64, usize)> = store
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.longitude(), e.latitude(), pos))
            .collect();
        let index = Index::build_with_backend(
            QuadTree::new(settings.leaf_capacity, settings.max_depth),
            &items,
        );
        tracing::debug!(
            target: "tremor::replay",
            points = index.len(),
            depth = index.backend().depth(),
            nodes = index.backend().node_count(),
            "spatial_index.built"
        );
        Self { index }
    }

    /// Number of indexed events.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no events are indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Indexed `(longitude, latitude)` of the event at store position `pos`.
    pub fn point(&self, pos: usize) -> Option<Point> {
        self.index.point(pos).map(|(lon, lat)| Point::new(lon, lat))
    }

    /// Store positions of the events inside `bounds`, ascending, without duplicates.
    pub fn query(&self, bounds: &GeoBounds) -> Vec<usize> {
        let mut out: Vec<usize> = bounds
            .index_rects()
            .flat_map(|r| self.index.query_rect(r))
            .collect();
        if bounds.crosses_antimeridian() {
            // The two halves are disjoint in longitude, but each half is sorted on its own.
            out.sort_unstable();
            out.dedup();
        }
        out
    }
}
