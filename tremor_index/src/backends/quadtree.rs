// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bucketed point quadtree backend generic over scalar `T: Scalar`.
//!
//! Each node stores the tight bounding box of the points below it. A node with more than
//! `leaf_capacity` points (and not yet at `max_depth`) is split into four quadrants around
//! the midpoint of its box. Points lying exactly on a split line go to the lower-x /
//! lower-y side, so every slot lives in exactly one leaf.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb2D, Scalar, bounds_of, lt};

/// Default number of points a leaf may hold before it is split.
pub const DEFAULT_LEAF_CAPACITY: usize = 16;

/// Default depth limit; leaves at this depth hold any number of points.
pub const DEFAULT_MAX_DEPTH: u32 = 24;

/// A static point quadtree.
pub struct QuadTree<T: Scalar> {
    leaf_capacity: usize,
    max_depth: u32,
    root: Option<NodeIdx>,
    arena: Vec<Node<T>>,
    points: Vec<(T, T)>,
}

/// Quadtree over `f32` coordinates.
pub type QuadTreeF32 = QuadTree<f32>;
/// Quadtree over `f64` coordinates.
pub type QuadTreeF64 = QuadTree<f64>;
/// Quadtree over `i64` coordinates.
pub type QuadTreeI64 = QuadTree<i64>;

enum Kind {
    Leaf(Vec<usize>),
    // Quadrant `q`: bit 0 set for the upper-x half, bit 1 set for the upper-y half.
    Internal([Option<NodeIdx>; 4]),
}

struct Node<T: Scalar> {
    bbox: Aabb2D<T>,
    depth: u32,
    kind: Kind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

impl<T: Scalar> Default for QuadTree<T> {
    fn default() -> Self {
        Self::new(DEFAULT_LEAF_CAPACITY, DEFAULT_MAX_DEPTH)
    }
}

impl<T: Scalar> QuadTree<T> {
    /// Create an empty quadtree with the given split threshold and depth limit.
    ///
    /// A `leaf_capacity` of zero is treated as one.
    pub fn new(leaf_capacity: usize, max_depth: u32) -> Self {
        Self {
            leaf_capacity: leaf_capacity.max(1),
            max_depth,
            root: None,
            arena: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Number of nodes (internal and leaf) in the tree.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Depth of the deepest node; zero for a single leaf or an empty tree.
    pub fn depth(&self) -> u32 {
        self.arena.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    fn build_node(&mut self, slots: Vec<usize>, bbox: Aabb2D<T>, depth: u32) -> NodeIdx {
        let idx = NodeIdx::new(self.arena.len());
        let degenerate = !lt(bbox.min_x, bbox.max_x) && !lt(bbox.min_y, bbox.max_y);
        if slots.len() <= self.leaf_capacity || depth >= self.max_depth || degenerate {
            self.arena.push(Node {
                bbox,
                depth,
                kind: Kind::Leaf(slots),
            });
            return idx;
        }

        // Reserve the parent so children land after it in the arena.
        self.arena.push(Node {
            bbox,
            depth,
            kind: Kind::Leaf(Vec::new()),
        });
        let mid_x = T::mid(bbox.min_x, bbox.max_x);
        let mid_y = T::mid(bbox.min_y, bbox.max_y);
        let mut quadrants: [(Vec<usize>, Option<Aabb2D<T>>); 4] = Default::default();
        for slot in slots {
            let (x, y) = self.points[slot];
            let q = usize::from(lt(mid_x, x)) | (usize::from(lt(mid_y, y)) << 1);
            let (part, part_box) = &mut quadrants[q];
            part.push(slot);
            let p = Aabb2D::from_point(x, y);
            *part_box = Some(part_box.map_or(p, |b| b.union(&p)));
        }
        let mut children = [None; 4];
        for (q, (part, part_box)) in quadrants.into_iter().enumerate() {
            if let Some(b) = part_box {
                children[q] = Some(self.build_node(part, b, depth + 1));
            }
        }
        self.arena[idx.get()].kind = Kind::Internal(children);
        idx
    }

    fn collect_subtree(&self, start: NodeIdx, out: &mut Vec<usize>) {
        let mut stack = vec![start];
        while let Some(n) = stack.pop() {
            match &self.arena[n.get()].kind {
                Kind::Leaf(slots) => out.extend_from_slice(slots),
                Kind::Internal(children) => stack.extend(children.iter().flatten().copied()),
            }
        }
    }
}

impl<T: Scalar> Backend<T> for QuadTree<T> {
    fn bulk_load(&mut self, points: &[(T, T)]) {
        self.clear();
        self.points.extend_from_slice(points);
        let Some(bbox) = bounds_of(points) else {
            return;
        };
        let slots: Vec<usize> = (0..points.len()).collect();
        self.root = Some(self.build_node(slots, bbox, 0));
    }

    fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.points.clear();
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return Box::new(out.into_iter());
        };
        if rect.is_empty() {
            return Box::new(out.into_iter());
        }
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            let node = &self.arena[n.get()];
            if !node.bbox.overlaps(&rect) {
                continue;
            }
            if rect.contains(&node.bbox) {
                self.collect_subtree(n, &mut out);
                continue;
            }
            match &node.kind {
                Kind::Leaf(slots) => {
                    for &s in slots {
                        let (x, y) = self.points[s];
                        if rect.contains_point(x, y) {
                            out.push(s);
                        }
                    }
                }
                Kind::Internal(children) => stack.extend(children.iter().flatten().copied()),
            }
        }
        Box::new(out.into_iter())
    }
}

impl<T: Scalar> Debug for QuadTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let leaves = self
            .arena
            .iter()
            .filter(|n| matches!(n.kind, Kind::Leaf(_)))
            .count();
        f.debug_struct("QuadTree")
            .field("leaf_capacity", &self.leaf_capacity)
            .field("max_depth", &self.max_depth)
            .field("total_slots", &self.points.len())
            .field("nodes", &self.arena.len())
            .field("leaves", &leaves)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::flatvec::FlatVec;

    // Small xorshift generator so the tests stay deterministic without extra deps.
    struct Rng(u64);

    impl Rng {
        fn next_u64(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }

        fn next_f64(&mut self) -> f64 {
            let v = self.next_u64() >> 11;
            (v as f64) / ((1_u64 << 53) as f64)
        }
    }

    fn sorted(it: impl Iterator<Item = usize>) -> Vec<usize> {
        let mut v: Vec<usize> = it.collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn empty_tree_answers_nothing() {
        let mut qt = QuadTreeF64::default();
        qt.bulk_load(&[]);
        assert!(qt.is_empty());
        assert_eq!(qt.query_rect(Aabb2D::new(-1.0, -1.0, 1.0, 1.0)).count(), 0);
    }

    #[test]
    fn splits_past_leaf_capacity() {
        let pts: Vec<(i64, i64)> = (0..64).map(|i| (i % 8, i / 8)).collect();
        let mut qt = QuadTreeI64::new(4, 16);
        qt.bulk_load(&pts);
        assert!(qt.depth() >= 2, "64 points with capacity 4 must split twice");
        let all = sorted(qt.query_rect(Aabb2D::new(0, 0, 7, 7)));
        assert_eq!(all, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn boundary_points_are_found_once() {
        // Midpoint of the box is (2, 2); several points sit right on the split lines.
        let pts = [(0, 0), (2, 2), (2, 0), (0, 2), (4, 4), (2, 4), (4, 2), (1, 3)];
        let mut qt = QuadTreeI64::new(1, 16);
        qt.bulk_load(&pts);
        let hits = sorted(qt.query_rect(Aabb2D::new(2, 2, 2, 2)));
        assert_eq!(hits, vec![1]);
        let line = sorted(qt.query_rect(Aabb2D::new(2, 0, 2, 4)));
        assert_eq!(line, vec![1, 2, 5]);
        let everything = sorted(qt.query_rect(Aabb2D::new(0, 0, 4, 4)));
        assert_eq!(everything, (0..pts.len()).collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_points_stop_at_a_leaf() {
        let pts = vec![(1.5, -2.5); 100];
        let mut qt = QuadTreeF64::new(2, 8);
        qt.bulk_load(&pts);
        assert_eq!(qt.node_count(), 1);
        assert_eq!(qt.query_rect(Aabb2D::from_point(1.5, -2.5)).count(), 100);
    }

    #[test]
    fn depth_limit_is_respected() {
        let pts: Vec<(f64, f64)> = (0..200_u32).map(|i| (f64::from(i) * 1e-9, 0.0)).collect();
        let mut qt = QuadTreeF64::new(1, 3);
        qt.bulk_load(&pts);
        assert!(qt.depth() <= 3);
        assert_eq!(qt.query_rect(Aabb2D::new(0.0, 0.0, 1.0, 0.0)).count(), 200);
    }

    #[test]
    fn matches_linear_scan_on_random_points() {
        let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
        let pts: Vec<(f64, f64)> = (0..2_000)
            .map(|_| (rng.next_f64() * 360.0 - 180.0, rng.next_f64() * 180.0 - 90.0))
            .collect();
        let mut qt = QuadTreeF64::new(8, 20);
        qt.bulk_load(&pts);
        let mut flat = FlatVec::<f64>::default();
        flat.bulk_load(&pts);
        for _ in 0..200 {
            let x0 = rng.next_f64() * 360.0 - 180.0;
            let y0 = rng.next_f64() * 180.0 - 90.0;
            let w = rng.next_f64() * 90.0;
            let h = rng.next_f64() * 45.0;
            let rect = Aabb2D::new(x0, y0, x0 + w, y0 + h);
            let got = sorted(qt.query_rect(rect));
            let want = sorted(flat.query_rect(rect));
            assert_eq!(got, want, "query {rect:?} disagrees with linear scan");
        }
    }

    #[test]
    fn inverted_rect_is_empty() {
        let mut qt = QuadTreeI64::default();
        qt.bulk_load(&[(0, 0), (1, 1)]);
        assert_eq!(qt.query_rect(Aabb2D::new(1, 1, 0, 0)).count(), 0);
    }
}
