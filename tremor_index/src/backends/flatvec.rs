// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets and as a
//! reference when checking other backends.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Flat vector backend with linear scans.
pub struct FlatVec<T: Copy + PartialOrd + Debug> {
    points: Vec<(T, T)>,
}

impl<T: Copy + PartialOrd + Debug> Default for FlatVec<T> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<T: Copy + PartialOrd + Debug> Debug for FlatVec<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatVec")
            .field("total_slots", &self.points.len())
            .finish_non_exhaustive()
    }
}

impl<T: Copy + PartialOrd + Debug> Backend<T> for FlatVec<T> {
    fn bulk_load(&mut self, points: &[(T, T)]) {
        self.points.clear();
        self.points.extend_from_slice(points);
    }
    fn clear(&mut self) {
        self.points.clear();
    }
    fn len(&self) -> usize {
        self.points.len()
    }
    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        for (i, &(x, y)) in self.points.iter().enumerate() {
            if rect.contains_point(x, y) {
                out.push(i);
            }
        }
        Box::new(out.into_iter())
    }
}
