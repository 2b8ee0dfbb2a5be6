// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb2D, Scalar, bounds_of};

/// A static point index parameterized by a spatial backend.
///
/// The index is built once from a list of `(x, y, payload)` items and is read-only
/// afterwards. Query results yield each matching payload once, in insertion order.
#[derive(Debug)]
pub struct IndexGeneric<T: Copy + PartialOrd + Debug, P: Copy + Debug, B: Backend<T>> {
    points: Vec<(T, T)>,
    payloads: Vec<P>,
    bounds: Option<Aabb2D<T>>,
    backend: B,
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T> + Default,
{
    /// Build an index from items using the backend's default configuration.
    pub fn build(items: &[(T, T, P)]) -> Self {
        Self::build_with_backend(B::default(), items)
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T>,
{
    /// Build an index from items, loading them into a caller-configured backend.
    pub fn build_with_backend(mut backend: B, items: &[(T, T, P)]) -> Self {
        let mut points = Vec::with_capacity(items.len());
        let mut payloads = Vec::with_capacity(items.len());
        for &(x, y, p) in items {
            points.push((x, y));
            payloads.push(p);
        }
        backend.bulk_load(&points);
        let bounds = bounds_of(&points);
        Self {
            points,
            payloads,
            bounds,
            backend,
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the index holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of every indexed point, or `None` when empty.
    pub fn bounds(&self) -> Option<Aabb2D<T>> {
        self.bounds
    }

    /// Access the backend (for diagnostics such as tree depth).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Query for payloads whose point lies inside the rectangle (boundary included).
    pub fn query_rect(&self, rect: Aabb2D<T>) -> impl Iterator<Item = P> + '_ {
        let mut slots: Vec<usize> = self.backend.query_rect(rect).collect();
        slots.sort_unstable();
        slots.into_iter().filter_map(|i| self.payloads.get(i).copied())
    }

    /// Query for payloads located exactly at the point.
    pub fn query_point(&self, x: T, y: T) -> impl Iterator<Item = P> + '_ {
        self.query_rect(Aabb2D::from_point(x, y))
    }

    /// Coordinates of the item at insertion position `slot`.
    pub fn point(&self, slot: usize) -> Option<(T, T)> {
        self.points.get(slot).copied()
    }
}

/// Default index using the point quadtree backend.
pub type Index<T, P> = IndexGeneric<T, P, crate::backends::quadtree::QuadTree<T>>;

impl<T: Scalar, P: Copy + Debug> Index<T, P> {
    /// Build a quadtree-backed index with an explicit leaf capacity and depth limit.
    pub fn with_quadtree(items: &[(T, T, P)], leaf_capacity: usize, max_depth: u32) -> Self {
        Self::build_with_backend(
            crate::backends::quadtree::QuadTree::new(leaf_capacity, max_depth),
            items,
        )
    }

    /// Build a linear-scan index over the same items.
    pub fn with_flat_vec(
        items: &[(T, T, P)],
    ) -> IndexGeneric<T, P, crate::backends::flatvec::FlatVec<T>> {
        IndexGeneric::build(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn build_and_query_rect() {
        let items = [(0_i64, 0, 'a'), (5, 5, 'b'), (10, 10, 'c'), (5, 6, 'd')];
        let idx: Index<i64, char> = Index::build(&items);
        assert_eq!(idx.len(), 4);
        assert_eq!(idx.bounds(), Some(Aabb2D::new(0, 0, 10, 10)));
        let hits: Vec<char> = idx.query_rect(Aabb2D::new(4, 4, 6, 6)).collect();
        assert_eq!(hits, vec!['b', 'd']);
        assert_eq!(idx.point(3), Some((5, 6)));
        assert_eq!(idx.point(4), None);
    }

    #[test]
    fn results_follow_insertion_order() {
        let items: Vec<(f64, f64, u32)> = (0..100_u32)
            .map(|i| (f64::from(i % 10), f64::from(i / 10), i))
            .collect();
        let idx: Index<f64, u32> = Index::with_quadtree(&items, 2, 16);
        let hits: Vec<u32> = idx.query_rect(Aabb2D::new(2.0, 2.0, 4.0, 4.0)).collect();
        assert_eq!(hits, vec![22, 23, 24, 32, 33, 34, 42, 43, 44]);
    }

    #[test]
    fn query_point_hits_coincident_items() {
        let idx: Index<i64, u8> = Index::build(&[(1, 1, 1), (1, 1, 2), (2, 1, 3)]);
        let hits: Vec<u8> = idx.query_point(1, 1).collect();
        assert_eq!(hits, vec![1, 2]);
    }

    #[test]
    fn flat_vec_and_quadtree_agree() {
        let items: Vec<(i64, i64, usize)> = (0..500_usize)
            .map(|i| {
                let k = i64::try_from(i).unwrap_or(0);
                ((k * 37) % 101, (k * 53) % 97, i)
            })
            .collect();
        let qt: Index<i64, usize> = Index::with_quadtree(&items, 4, 12);
        let flat = Index::<i64, usize>::with_flat_vec(&items);
        for rect in [
            Aabb2D::new(0, 0, 100, 100),
            Aabb2D::new(10, 10, 20, 30),
            Aabb2D::new(50, 0, 50, 96),
            Aabb2D::new(200, 200, 300, 300),
        ] {
            let a: Vec<usize> = qt.query_rect(rect).collect();
            let b: Vec<usize> = flat.query_rect(rect).collect();
            assert_eq!(a, b, "backends disagree for {rect:?}");
        }
    }

    #[test]
    fn empty_index() {
        let idx: Index<f64, u32> = Index::build(&[]);
        assert!(idx.is_empty());
        assert_eq!(idx.bounds(), None);
        assert_eq!(idx.query_rect(Aabb2D::new(-1.0, -1.0, 1.0, 1.0)).count(), 0);
    }
}
