// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Maximal safe translation for a group of rectangles.

use kurbo::{Rect, Vec2};

use crate::constraints::{MAX_PASSES, clamp_toward_zero, snap_drag};
use crate::geometry::is_empty;
use crate::sweep::sweep;
use crate::trace::{Axis, ConstraintTrace};
use crate::Constraints;

/// Computes the largest part of `drag` that moves every rectangle in `selected`
/// without leaving the bounds or entering an obstacle.
///
/// The result never exceeds `drag` on either axis and never points the other
/// way; a component may shrink to zero. An empty selection or a drag below the
/// tolerance on both axes yields [`Vec2::ZERO`].
///
/// Rectangles that already overlap an obstacle are not pushed out; the solver
/// only prevents new overlap.
///
/// ```rust
/// use kurbo::{Rect, Vec2};
/// use understory_arrange::{Constraints, solve_move};
///
/// let selected = [Rect::new(0.0, 0.0, 10.0, 10.0)];
/// let obstacles = [Rect::new(30.0, 0.0, 40.0, 10.0)];
/// let constraints = Constraints::default().with_obstacles(&obstacles);
///
/// let delta = solve_move(&selected, &constraints, Vec2::new(25.0, 0.0));
/// assert!((delta.x - 20.0).abs() < 1e-9);
/// assert_eq!(delta.y, 0.0);
/// ```
#[must_use]
pub fn solve_move(selected: &[Rect], constraints: &Constraints<'_>, drag: Vec2) -> Vec2 {
    solve_move_with_trace(selected, constraints, drag, &mut ())
}

/// Like [`solve_move`], reporting every limiting bound and obstacle to `trace`.
///
/// Obstacles are identified by their index in [`Constraints::obstacles`].
pub fn solve_move_with_trace<T>(
    selected: &[Rect],
    constraints: &Constraints<'_>,
    drag: Vec2,
    trace: &mut T,
) -> Vec2
where
    T: ConstraintTrace<usize> + ?Sized,
{
    let epsilon = constraints.tolerance();
    let mut limit = MoveLimit::new(snap_drag(drag, epsilon));
    if selected.is_empty() || limit.is_zero() {
        return Vec2::ZERO;
    }

    if let Some(bounds) = constraints.bounds {
        for &rect in selected {
            limit.bound(rect, bounds, trace);
        }
    }

    if constraints.obstacles.is_empty() {
        return limit.drag;
    }

    for _ in 0..MAX_PASSES {
        let before = limit.drag;
        for &rect in selected {
            if is_empty(rect) {
                continue;
            }
            for (index, &obstacle) in constraints.obstacles.iter().enumerate() {
                if limit.is_zero() {
                    return Vec2::ZERO;
                }
                if let Some(hit) = sweep(rect, obstacle, limit.drag, epsilon) {
                    trace.obstacle_hit(index, hit);
                    if hit.edges.has_horizontal() {
                        limit.tighten(Axis::X, limit.drag.x * hit.time);
                    }
                    if hit.edges.has_vertical() {
                        limit.tighten(Axis::Y, limit.drag.y * hit.time);
                    }
                }
            }
        }
        if limit.drag == before {
            return limit.drag;
        }
    }
    Vec2::ZERO
}

/// Per-axis limit that only ever tightens toward zero, plus the drag clamped to it.
#[derive(Clone, Copy, Debug)]
struct MoveLimit {
    limit: Vec2,
    drag: Vec2,
}

impl MoveLimit {
    fn new(drag: Vec2) -> Self {
        let open = |v: f64| {
            if v > 0.0 {
                f64::INFINITY
            } else if v < 0.0 {
                f64::NEG_INFINITY
            } else {
                0.0
            }
        };
        Self {
            limit: Vec2::new(open(drag.x), open(drag.y)),
            drag,
        }
    }

    fn is_zero(&self) -> bool {
        self.drag == Vec2::ZERO
    }

    /// Tightens the limit on `axis` to `value` and re-clamps the drag.
    ///
    /// Returns `true` if the drag shrank.
    fn tighten(&mut self, axis: Axis, value: f64) -> bool {
        let (limit, drag) = match axis {
            Axis::X => (&mut self.limit.x, &mut self.drag.x),
            Axis::Y => (&mut self.limit.y, &mut self.drag.y),
        };
        *limit = if *limit >= 0.0 {
            limit.min(value.max(0.0))
        } else {
            limit.max(value.min(0.0))
        };
        let clamped = clamp_toward_zero(*drag, *limit);
        let changed = clamped != *drag;
        *drag = clamped;
        changed
    }

    /// Keeps `rect` inside `bounds` for the rest of the drag.
    ///
    /// A rectangle already outside is not pulled back: its limit bottoms out at zero.
    fn bound<T>(&mut self, rect: Rect, bounds: Rect, trace: &mut T)
    where
        T: ConstraintTrace<usize> + ?Sized,
    {
        let x = if self.drag.x > 0.0 {
            Some((bounds.x1 - rect.x1, bounds.x1))
        } else if self.drag.x < 0.0 {
            Some((bounds.x0 - rect.x0, bounds.x0))
        } else {
            None
        };
        if let Some((room, edge)) = x {
            if self.tighten(Axis::X, room) {
                trace.bounds_limited(Axis::X, edge);
            }
        }

        let y = if self.drag.y > 0.0 {
            Some((bounds.y1 - rect.y1, bounds.y1))
        } else if self.drag.y < 0.0 {
            Some((bounds.y0 - rect.y0, bounds.y0))
        } else {
            None
        };
        if let Some((room, edge)) = y {
            if self.tighten(Axis::Y, room) {
                trace.bounds_limited(Axis::Y, edge);
            }
        }
    }
}
