// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle helpers shared by the detector and the solvers.
//!
//! The engine works directly on [`kurbo::Rect`] and [`kurbo::Vec2`]. The
//! helpers here pin down the numerical policy: rectangles that merely touch do
//! not overlap, and overlaps thinner than a tolerance are treated as rounding
//! noise rather than contact.

use kurbo::{Rect, Vec2};

/// Default tolerance, in surface units, below which overlaps and motions are ignored.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Returns the intersection of `a` and `b`.
///
/// Disjoint inputs produce a zero-size rectangle, which [`is_empty`] reports as empty.
#[inline]
#[must_use]
pub fn intersect(a: Rect, b: Rect) -> Rect {
    a.intersect(b)
}

/// Returns `true` if `rect` has no area: width or height `<= 0`.
///
/// NaN extents also count as empty.
#[inline]
#[must_use]
pub fn is_empty(rect: Rect) -> bool {
    !(rect.width() > 0.0 && rect.height() > 0.0)
}

/// Translates `rect` by `offset`.
#[inline]
#[must_use]
pub fn offset(rect: Rect, offset: Vec2) -> Rect {
    rect + offset
}

/// Returns `true` if `a` and `b` overlap by more than `epsilon` on both axes.
///
/// Shared edges and razor-thin slivers left behind by accumulated rounding are
/// not overlaps.
#[must_use]
pub fn overlaps(a: Rect, b: Rect, epsilon: f64) -> bool {
    let i = intersect(a, b);
    i.width() > epsilon && i.height() > epsilon
}

/// Returns the region covered by a rectangle moving or stretching from `from` to `to`.
///
/// Every edge of a [`crate::Sweep`] moves monotonically, so the union of the
/// start and end geometry covers the whole path.
#[inline]
#[must_use]
pub fn sweep_bounds(from: Rect, to: Rect) -> Rect {
    from.union(to)
}

/// Fraction of `rect`'s area covered by `region`, in `[0, 1]`.
///
/// Zero-area rectangles report `1.0` when they lie inside `region` and `0.0` otherwise.
pub(crate) fn coverage(rect: Rect, region: Rect) -> f64 {
    let area = rect.area();
    if area > 0.0 {
        (intersect(rect, region).area() / area).clamp(0.0, 1.0)
    } else if rect.x0 >= region.x0
        && rect.y0 >= region.y0
        && rect.x1 <= region.x1
        && rect.y1 <= region.y1
    {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Vec2};

    use super::*;

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 30.0, 30.0);
        assert!(is_empty(intersect(a, b)));
    }

    #[test]
    fn touching_is_not_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(is_empty(intersect(a, b)));
        assert!(!overlaps(a, b, 0.0));
        assert!(!overlaps(a, b, DEFAULT_TOLERANCE));
    }

    #[test]
    fn sliver_below_tolerance_is_not_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.995, 0.0, 20.0, 10.0);
        assert!(!is_empty(intersect(a, b)));
        assert!(!overlaps(a, b, DEFAULT_TOLERANCE));
        assert!(overlaps(a, b, 0.0));
    }

    #[test]
    fn nan_extent_counts_as_empty() {
        assert!(is_empty(Rect::new(0.0, 0.0, f64::NAN, 10.0)));
        assert!(is_empty(Rect::new(0.0, 0.0, 10.0, 0.0)));
        assert!(!is_empty(Rect::new(0.0, 0.0, 10.0, 1.0)));
    }

    #[test]
    fn offset_and_sweep_bounds() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let moved = offset(r, Vec2::new(5.0, -2.0));
        assert_eq!(moved, Rect::new(5.0, -2.0, 15.0, 8.0));
        assert_eq!(sweep_bounds(r, moved), Rect::new(0.0, -2.0, 15.0, 10.0));
    }

    #[test]
    fn coverage_handles_partial_and_degenerate() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let half = Rect::new(5.0, 0.0, 20.0, 10.0);
        assert!((coverage(r, half) - 0.5).abs() < 1e-12);

        let point = Rect::new(3.0, 3.0, 3.0, 3.0);
        assert_eq!(coverage(point, r), 1.0);
        assert_eq!(coverage(point, half), 0.0);
    }
}
