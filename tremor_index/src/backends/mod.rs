// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple, a reference for testing).
//! - `quadtree`: bucketed point quadtree (`T: Scalar`) with midpoint splits
//!   (aliases: `QuadTreeF32`, `QuadTreeF64`, `QuadTreeI64`).
//!
//! Quadtree note
//! -------------
//! Splits happen around the midpoint of each node's tight bounding box. Queries skip nodes
//! whose box is disjoint from the query rectangle and emit whole subtrees whose box lies
//! inside it without testing individual points, so the work done is proportional to the
//! nodes crossing the rectangle's edge plus the size of the answer.

pub mod flatvec;
pub mod quadtree;

pub use quadtree::{QuadTreeF32, QuadTreeF64, QuadTreeI64};
