// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Vec2};

use crate::DEFAULT_TOLERANCE;

/// Upper bound on rescans when a clamp bends the path into an obstacle already tested.
///
/// Each pass either leaves the result unchanged or shrinks it, so in practice two
/// or three passes settle. Hitting the bound yields a no-op result.
pub(crate) const MAX_PASSES: usize = 8;

/// The environment a move or resize is solved against.
///
/// Obstacles are a plain slice, rebuilt by the caller for every step; no spatial
/// index is kept between steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraints<'a> {
    /// Optional containing rectangle. `None` leaves motion unbounded.
    pub bounds: Option<Rect>,
    /// Rectangles that must not be penetrated.
    pub obstacles: &'a [Rect],
    /// Tolerance in surface units for overlaps and motions.
    pub epsilon: f64,
}

impl Default for Constraints<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl<'a> Constraints<'a> {
    /// No bounds, no obstacles, the given tolerance.
    #[must_use]
    pub const fn new(epsilon: f64) -> Self {
        Self {
            bounds: None,
            obstacles: &[],
            epsilon,
        }
    }

    /// Sets the containing rectangle.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Option<Rect>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the obstacle slice.
    #[must_use]
    pub fn with_obstacles(mut self, obstacles: &'a [Rect]) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// The tolerance to solve with; non-finite or negative values fall back to [`DEFAULT_TOLERANCE`].
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        sanitize_tolerance(self.epsilon)
    }
}

pub(crate) fn sanitize_tolerance(epsilon: f64) -> f64 {
    if epsilon.is_finite() && epsilon >= 0.0 {
        epsilon
    } else {
        DEFAULT_TOLERANCE
    }
}

/// Zeroes components whose magnitude is at or below `epsilon`.
///
/// Sub-tolerance motion is never tested for collisions, so it is not applied
/// either; otherwise repeated tiny nudges could creep into an obstacle.
pub(crate) fn snap_drag(drag: Vec2, epsilon: f64) -> Vec2 {
    let snap = |v: f64| if v.is_finite() && v.abs() > epsilon { v } else { 0.0 };
    Vec2::new(snap(drag.x), snap(drag.y))
}

/// Moves `value` toward zero so it does not pass `limit`, keeping its sign.
pub(crate) fn clamp_toward_zero(value: f64, limit: f64) -> f64 {
    if value > 0.0 {
        value.min(limit.max(0.0))
    } else if value < 0.0 {
        value.max(limit.min(0.0))
    } else {
        0.0
    }
}
