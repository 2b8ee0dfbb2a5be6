// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D. Bounds are inclusive on every side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (bottom)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (top)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Degenerate AABB covering a single point.
    pub const fn from_point(x: T, y: T) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Whether this AABB contains the point (boundary included).
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether `other` lies entirely inside this AABB.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
    }

    /// The intersection of two AABBs.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min_x: max_t(self.min_x, other.min_x),
            min_y: max_t(self.min_y, other.min_y),
            max_x: min_t(self.max_x, other.max_x),
            max_y: min_t(self.max_y, other.max_y),
        }
    }

    /// Whether the two AABBs share at least one point.
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Return true if the AABB is inverted (no points). Assumes no NaN.
    ///
    /// Zero-width boxes are not empty: they still contain the points on their edge.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }

    /// Smallest AABB covering both inputs.
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }
}

/// Numeric scalar abstraction used by the backends to split space.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Midpoint between a and b, rounded toward `a` for integers.
    fn mid(a: Self, b: Self) -> Self;
}

impl Scalar for f32 {
    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }
}

impl Scalar for f64 {
    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }
}

impl Scalar for i64 {
    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb2D<T>, b: Aabb2D<T>) -> Aabb2D<T> {
    Aabb2D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
    }
}

/// Bounding box of a set of points, or `None` if there are none.
pub(crate) fn bounds_of<T: PartialOrd + Copy>(points: &[(T, T)]) -> Option<Aabb2D<T>> {
    let mut it = points.iter();
    let &(x, y) = it.next()?;
    Some(it.fold(Aabb2D::from_point(x, y), |acc, &(x, y)| {
        union_aabb(acc, Aabb2D::from_point(x, y))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_box_is_not_empty() {
        let a = Aabb2D::from_point(3_i64, 4);
        assert!(!a.is_empty());
        assert!(a.contains_point(3, 4));
        assert!(!a.contains_point(3, 5));
    }

    #[test]
    fn disjoint_boxes_do_not_overlap() {
        let a = Aabb2D::new(0_i64, 0, 10, 10);
        let b = Aabb2D::new(11_i64, 0, 20, 10);
        assert!(!a.overlaps(&b));
        // Touching edges share points.
        let c = Aabb2D::new(10_i64, 10, 20, 20);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn containment_is_inclusive() {
        let outer = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains(&Aabb2D::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!outer.contains(&Aabb2D::new(-0.5, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn integer_mid_rounds_down() {
        assert_eq!(i64::mid(0, 1), 0);
        assert_eq!(i64::mid(-3, -2), -3);
        assert_eq!(i64::mid(i64::MAX - 1, i64::MAX), i64::MAX - 1);
    }

    #[test]
    fn bounds_cover_all_points() {
        let pts = [(1.0, 5.0), (-2.0, 3.0), (4.0, -1.0)];
        assert_eq!(bounds_of(&pts), Some(Aabb2D::new(-2.0, -1.0, 4.0, 5.0)));
        assert_eq!(bounds_of::<f64>(&[]), None);
    }
}
