// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tremor Index: a static 2D point index for viewport culling.
//!
//! Tremor Index is the spatial building block behind the replay engine's visible-set queries.
//!
//! - Bulk-build once from `(x, y, payload)` items; the index is read-only afterwards.
//! - Query by inclusive rectangle or by exact point.
//! - Results contain each matching payload exactly once, in insertion order.
//!
//! It is generic over the scalar type `T` and does not depend on any geometry crate.
//! Higher layers (like the geographic adaptor in `tremor_replay`) decide what `x` and `y` mean.
//!
//! Backends are pluggable via a simple trait so you can swap the spatial strategy without API churn.
//! The default backend is a bucketed point quadtree; a flat vector (linear scan) is available
//! as a reference and for tiny sets.
//!
//! # Example
//!
//! ```rust
//! use tremor_index::{Index, Aabb2D};
//!
//! // Index three points carrying u32 payloads.
//! let idx: Index<i64, u32> = Index::build(&[(0, 0, 1), (5, 5, 2), (9, 1, 3)]);
//!
//! // Everything inside [4, 10] x [0, 6].
//! let hits: Vec<_> = idx.query_rect(Aabb2D::new(4, 0, 10, 6)).collect();
//! assert_eq!(hits, vec![2, 3]);
//! ```
//!
//! Tune the quadtree when the data is dense or heavily clustered:
//!
//! ```rust
//! use tremor_index::{Index, Aabb2D};
//!
//! let items: Vec<(f64, f64, usize)> =
//!     (0..1000).map(|i| ((i % 40) as f64, (i / 40) as f64, i)).collect();
//! let idx = Index::<f64, usize>::with_quadtree(&items, 8, 20);
//!
//! let hits = idx.query_rect(Aabb2D::new(0.0, 0.0, 1.0, 1.0)).count();
//! assert_eq!(hits, 4);
//! ```
//!
//! ## Choosing a backend
//!
//! - `QuadTree` (default): sub-linear rectangle queries; construction is O(N log N) for
//!   well-spread data and bounded by the depth limit for clustered data.
//! - `FlatVec`: simplest and smallest, linear scans. Good for very small sets or as an
//!   oracle in tests.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates. Points on a query rectangle's
//! edge are inside it. Points on a quadtree split line belong to the lower-x / lower-y child.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::quadtree::{QuadTree, QuadTreeF32, QuadTreeF64, QuadTreeI64};
pub use index::{Index, IndexGeneric};
pub use types::{Aabb2D, Scalar};
