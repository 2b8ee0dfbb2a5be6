// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::boxed::Box;

use crate::types::Aabb2D;
use core::fmt::Debug;

/// Static spatial backend abstraction used by `IndexGeneric`.
///
/// Backends index points by slot, where the slot is the position of the point in the
/// slice handed to [`Backend::bulk_load`]. They are loaded once and then only queried.
pub trait Backend<T: Copy + PartialOrd + Debug> {
    /// Replace the backend contents with `points`; slot `i` is `points[i]`.
    fn bulk_load(&mut self, points: &[(T, T)]);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Number of indexed slots.
    fn len(&self) -> usize;

    /// Whether no slots are indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Query slots whose point lies inside the rectangle (boundary included).
    ///
    /// Every matching slot is yielded exactly once; order is backend specific.
    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a>;
}
