// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Maximal safe resize of a single rectangle dragged by one of its handles.
//!
//! ## Stretch model
//!
//! The edges opposite the handle are anchored and the handle's edges follow
//! the drag. Side handles move one edge, corner handles one edge per axis.
//!
//! With `uniform` set, the width:height ratio is preserved:
//! - Corner handles take the smaller of the two scale factors for both axes.
//! - Side handles derive the other dimension from the dragged axis. The
//!   perpendicular axis keeps its minimum edge (`TOP` or `LEFT`) in place, so
//!   dragging `RIGHT` also moves `BOTTOM` and dragging `TOP` also moves `RIGHT`.
//!
//! The candidate is then limited by the bounds and by obstacles, in that order.
//! Obstacles are tested with a [`Sweep::stretch`] from the original to the
//! candidate geometry, which covers every moving edge, including the implicit
//! perpendicular one under uniform resizing.

use kurbo::{Rect, Size, Vec2};

use crate::constraints::{MAX_PASSES, snap_drag};
use crate::edges::AxisEdge;
use crate::geometry::is_empty;
use crate::trace::{Axis, ConstraintTrace};
use crate::{Constraints, Edges, Sweep};

/// A resize request: which rectangle, which handle, how far, and under which size rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeRequest {
    /// Geometry before this step.
    pub rect: Rect,
    /// Handle being dragged. The empty set is a no-op.
    pub handle: Edges,
    /// Raw pointer or keyboard delta for this step.
    pub drag: Vec2,
    /// Smallest permitted size.
    pub min_size: Size,
    /// Largest permitted size.
    pub max_size: Size,
    /// Preserve the width:height ratio.
    pub uniform: bool,
}

impl ResizeRequest {
    /// A non-uniform request with no size limits.
    #[must_use]
    pub fn new(rect: Rect, handle: Edges, drag: Vec2) -> Self {
        Self {
            rect,
            handle,
            drag,
            min_size: Size::ZERO,
            max_size: Size::new(f64::INFINITY, f64::INFINITY),
            uniform: false,
        }
    }

    /// Sets the smallest permitted size.
    #[must_use]
    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = min_size;
        self
    }

    /// Sets the largest permitted size.
    #[must_use]
    pub fn with_max_size(mut self, max_size: Size) -> Self {
        self.max_size = max_size;
        self
    }

    /// Sets whether the aspect ratio is preserved.
    #[must_use]
    pub fn with_uniform(mut self, uniform: bool) -> Self {
        self.uniform = uniform;
        self
    }
}

/// Computes the resized rectangle for `request`, honoring size limits, bounds, and obstacles.
///
/// Returns `request.rect` unchanged when the handle is empty, the rectangle
/// has no area, the drag is below the tolerance, no size satisfies the limits
/// while keeping the aspect ratio, or the resulting change is within the
/// tolerance on both dimensions.
///
/// ```rust
/// use kurbo::{Rect, Vec2};
/// use understory_arrange::{Constraints, Edges, ResizeRequest, solve_resize};
///
/// let request = ResizeRequest::new(Rect::new(0.0, 0.0, 20.0, 10.0), Edges::RIGHT, Vec2::new(100.0, 0.0))
///     .with_uniform(true);
/// let constraints = Constraints::default().with_bounds(Some(Rect::new(0.0, 0.0, 25.0, 100.0)));
///
/// let resized = solve_resize(&request, &constraints);
/// assert_eq!(resized, Rect::new(0.0, 0.0, 25.0, 12.5));
/// ```
#[must_use]
pub fn solve_resize(request: &ResizeRequest, constraints: &Constraints<'_>) -> Rect {
    solve_resize_with_trace(request, constraints, &mut ())
}

/// Like [`solve_resize`], reporting every limiting bound and obstacle to `trace`.
///
/// Obstacles are identified by their index in [`Constraints::obstacles`].
pub fn solve_resize_with_trace<T>(
    request: &ResizeRequest,
    constraints: &Constraints<'_>,
    trace: &mut T,
) -> Rect
where
    T: ConstraintTrace<usize> + ?Sized,
{
    let epsilon = constraints.tolerance();
    let rect = request.rect;
    let drag = snap_drag(request.drag, epsilon);
    let Some(stretch) = Stretch::new(request) else {
        return rect;
    };
    if is_empty(rect) || drag == Vec2::ZERO {
        return rect;
    }

    let Some(mut candidate) = stretch.sized(drag) else {
        return rect;
    };
    if let Some(bounds) = constraints.bounds {
        candidate = stretch.bounded(candidate, bounds, trace);
    }
    if !constraints.obstacles.is_empty() {
        candidate = stretch.unobstructed(candidate, constraints.obstacles, epsilon, trace);
    }

    if (candidate.width() - rect.width()).abs() <= epsilon
        && (candidate.height() - rect.height()).abs() <= epsilon
    {
        return rect;
    }
    candidate
}

/// The resolved stretch model for one request.
#[derive(Clone, Copy, Debug)]
struct Stretch {
    rect: Rect,
    /// Edges the drag acts on.
    drag_x: AxisEdge,
    drag_y: AxisEdge,
    /// Edges that actually move, including the implicit perpendicular edge under uniform resizing.
    move_x: AxisEdge,
    move_y: AxisEdge,
    uniform: bool,
    min: Size,
    max: Size,
}

impl Stretch {
    fn new(request: &ResizeRequest) -> Option<Self> {
        let drag_x = request.handle.x_edge();
        let drag_y = request.handle.y_edge();
        if drag_x.is_fixed() && drag_y.is_fixed() {
            return None;
        }
        let (move_x, move_y) = match (request.uniform, drag_x, drag_y) {
            (true, x, AxisEdge::Fixed) => (x, AxisEdge::Max),
            (true, AxisEdge::Fixed, y) => (AxisEdge::Max, y),
            (_, x, y) => (x, y),
        };
        let min = Size::new(request.min_size.width.max(0.0), request.min_size.height.max(0.0));
        let max = Size::new(
            request.max_size.width.max(min.width),
            request.max_size.height.max(min.height),
        );
        Some(Self {
            rect: request.rect,
            drag_x,
            drag_y,
            move_x,
            move_y,
            uniform: request.uniform,
            min,
            max,
        })
    }

    /// Applies the drag and the size limits.
    fn sized(&self, drag: Vec2) -> Option<Rect> {
        let old = self.rect.size();
        let stretched = |edge: AxisEdge, extent: f64, delta: f64, lo: f64, hi: f64| {
            let proposed = match edge {
                AxisEdge::Min => extent - delta,
                AxisEdge::Max => extent + delta,
                AxisEdge::Fixed => extent,
            };
            proposed.max(lo).min(hi)
        };
        let width = stretched(self.drag_x, old.width, drag.x, self.min.width, self.max.width);
        let height = stretched(self.drag_y, old.height, drag.y, self.min.height, self.max.height);

        if !self.uniform {
            return Some(self.place(width, height));
        }

        let scale = match (self.drag_x.is_fixed(), self.drag_y.is_fixed()) {
            (false, false) => (width / old.width).min(height / old.height),
            (false, true) => width / old.width,
            _ => height / old.height,
        };
        let scale = self.clamp_scale(scale)?;
        Some(self.place(old.width * scale, old.height * scale))
    }

    /// Clamps a uniform scale factor so both dimensions respect the size limits.
    fn clamp_scale(&self, scale: f64) -> Option<f64> {
        let old = self.rect.size();
        let lo = (self.min.width / old.width).max(self.min.height / old.height);
        let hi = (self.max.width / old.width).min(self.max.height / old.height);
        if lo > hi || !scale.is_finite() {
            return None;
        }
        Some(scale.max(lo).min(hi))
    }

    /// Positions a rectangle of the given size against the anchored edges.
    fn place(&self, width: f64, height: f64) -> Rect {
        let r = self.rect;
        let (x0, x1) = match self.move_x {
            AxisEdge::Min => (r.x1 - width, r.x1),
            AxisEdge::Max => (r.x0, r.x0 + width),
            AxisEdge::Fixed => (r.x0, r.x1),
        };
        let (y0, y1) = match self.move_y {
            AxisEdge::Min => (r.y1 - height, r.y1),
            AxisEdge::Max => (r.y0, r.y0 + height),
            AxisEdge::Fixed => (r.y0, r.y1),
        };
        Rect::new(x0, y0, x1, y1)
    }

    /// Pulls moving edges back inside `bounds`, never past their original position.
    fn bounded<T>(&self, candidate: Rect, bounds: Rect, trace: &mut T) -> Rect
    where
        T: ConstraintTrace<usize> + ?Sized,
    {
        if self.uniform {
            return self.bounded_uniform(candidate, bounds, trace);
        }

        let r = self.rect;
        let mut out = candidate;
        match self.move_x {
            AxisEdge::Min if out.x0 < bounds.x0.min(r.x0) => {
                out.x0 = bounds.x0.min(r.x0);
                trace.bounds_limited(Axis::X, bounds.x0);
            }
            AxisEdge::Max if out.x1 > bounds.x1.max(r.x1) => {
                out.x1 = bounds.x1.max(r.x1);
                trace.bounds_limited(Axis::X, bounds.x1);
            }
            _ => {}
        }
        match self.move_y {
            AxisEdge::Min if out.y0 < bounds.y0.min(r.y0) => {
                out.y0 = bounds.y0.min(r.y0);
                trace.bounds_limited(Axis::Y, bounds.y0);
            }
            AxisEdge::Max if out.y1 > bounds.y1.max(r.y1) => {
                out.y1 = bounds.y1.max(r.y1);
                trace.bounds_limited(Axis::Y, bounds.y1);
            }
            _ => {}
        }
        out
    }

    /// Re-derives the uniform scale factor from the room between each anchor and the boundary.
    fn bounded_uniform<T>(&self, candidate: Rect, bounds: Rect, trace: &mut T) -> Rect
    where
        T: ConstraintTrace<usize> + ?Sized,
    {
        let r = self.rect;
        let old = r.size();
        let scale = candidate.width() / old.width;
        if scale <= 1.0 {
            // Shrinking moves every edge inward.
            return candidate;
        }

        let room_x = match self.move_x {
            AxisEdge::Min => Some(((r.x1 - bounds.x0) / old.width, bounds.x0)),
            AxisEdge::Max => Some(((bounds.x1 - r.x0) / old.width, bounds.x1)),
            AxisEdge::Fixed => None,
        };
        let room_y = match self.move_y {
            AxisEdge::Min => Some(((r.y1 - bounds.y0) / old.height, bounds.y0)),
            AxisEdge::Max => Some(((bounds.y1 - r.y0) / old.height, bounds.y1)),
            AxisEdge::Fixed => None,
        };

        let mut limited = scale;
        let mut limiting = None;
        for (axis, room) in [(Axis::X, room_x), (Axis::Y, room_y)] {
            if let Some((ratio, edge)) = room {
                let ratio = ratio.max(1.0);
                if ratio < limited {
                    limited = ratio;
                    limiting = Some((axis, edge));
                }
            }
        }
        match limiting {
            Some((axis, edge)) => {
                trace.bounds_limited(axis, edge);
                self.place(old.width * limited, old.height * limited)
            }
            None => candidate,
        }
    }

    /// Pulls the candidate back until no moving edge enters an obstacle.
    fn unobstructed<T>(&self, candidate: Rect, obstacles: &[Rect], epsilon: f64, trace: &mut T) -> Rect
    where
        T: ConstraintTrace<usize> + ?Sized,
    {
        let mut target = candidate;
        for _ in 0..MAX_PASSES {
            let before = target;
            for (index, &obstacle) in obstacles.iter().enumerate() {
                let sweep = Sweep::stretch(self.rect, target);
                let Some(hit) = sweep.hit(obstacle, epsilon) else {
                    continue;
                };
                trace.obstacle_hit(index, hit);
                let reached = sweep.at(hit.time);
                if self.uniform {
                    // Pulling back along the sweep keeps the aspect ratio.
                    target = reached;
                } else {
                    if hit.edges.has_horizontal() {
                        target.x0 = reached.x0;
                        target.x1 = reached.x1;
                    }
                    if hit.edges.has_vertical() {
                        target.y0 = reached.y0;
                        target.y1 = reached.y1;
                    }
                }
            }
            if target == before {
                return target;
            }
        }
        self.rect
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Size, Vec2};

    use super::{ResizeRequest, solve_resize, solve_resize_with_trace};
    use crate::trace::{Axis, TraceRecorder};
    use crate::{Constraints, Edges};

    const WIDE: Rect = Rect::new(0.0, 0.0, 20.0, 10.0);

    fn approx(a: Rect, b: Rect) -> bool {
        (a.x0 - b.x0).abs() < 1e-9
            && (a.y0 - b.y0).abs() < 1e-9
            && (a.x1 - b.x1).abs() < 1e-9
            && (a.y1 - b.y1).abs() < 1e-9
    }

    #[test]
    fn side_handles_move_one_edge() {
        let c = Constraints::default();
        let right = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(5.0, 99.0));
        assert_eq!(solve_resize(&right, &c), Rect::new(0.0, 0.0, 25.0, 10.0));

        let left = ResizeRequest::new(WIDE, Edges::LEFT, Vec2::new(5.0, 0.0));
        assert_eq!(solve_resize(&left, &c), Rect::new(5.0, 0.0, 20.0, 10.0));

        let top = ResizeRequest::new(WIDE, Edges::TOP, Vec2::new(0.0, -4.0));
        assert_eq!(solve_resize(&top, &c), Rect::new(0.0, -4.0, 20.0, 10.0));
    }

    #[test]
    fn corner_handle_moves_two_edges() {
        let c = Constraints::default();
        let req = ResizeRequest::new(WIDE, Edges::TOP_LEFT, Vec2::new(-5.0, 3.0));
        assert_eq!(solve_resize(&req, &c), Rect::new(-5.0, 3.0, 20.0, 10.0));
    }

    #[test]
    fn size_limits_are_respected() {
        let c = Constraints::default();
        let req = ResizeRequest::new(WIDE, Edges::LEFT, Vec2::new(50.0, 0.0))
            .with_min_size(Size::new(4.0, 4.0));
        assert_eq!(solve_resize(&req, &c), Rect::new(16.0, 0.0, 20.0, 10.0));

        let req = ResizeRequest::new(WIDE, Edges::BOTTOM, Vec2::new(0.0, 50.0))
            .with_max_size(Size::new(100.0, 15.0));
        assert_eq!(solve_resize(&req, &c), Rect::new(0.0, 0.0, 20.0, 15.0));
    }

    #[test]
    fn uniform_side_handle_against_bounds() {
        let c = Constraints::default().with_bounds(Some(Rect::new(0.0, 0.0, 25.0, 100.0)));
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(100.0, 0.0)).with_uniform(true);
        assert_eq!(solve_resize(&req, &c), Rect::new(0.0, 0.0, 25.0, 12.5));
    }

    #[test]
    fn uniform_perpendicular_edge_is_bounded_too() {
        // Dragging RIGHT grows the height; the bottom boundary binds first.
        let c = Constraints::default().with_bounds(Some(Rect::new(0.0, 0.0, 100.0, 12.0)));
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(20.0, 0.0)).with_uniform(true);
        let mut rec = TraceRecorder::new();
        let out = solve_resize_with_trace(&req, &c, &mut rec);
        assert!(approx(out, Rect::new(0.0, 0.0, 24.0, 12.0)), "got {out:?}");
        assert!(rec.bounds_limited_on(Axis::Y));
    }

    #[test]
    fn uniform_corner_takes_the_smaller_scale() {
        let c = Constraints::default();
        // Width asks for 2x, height for 1.5x: 1.5x wins.
        let req =
            ResizeRequest::new(WIDE, Edges::BOTTOM_RIGHT, Vec2::new(20.0, 5.0)).with_uniform(true);
        assert_eq!(solve_resize(&req, &c), Rect::new(0.0, 0.0, 30.0, 15.0));

        // Top-left anchors the bottom-right corner.
        let req = ResizeRequest::new(WIDE, Edges::TOP_LEFT, Vec2::new(-20.0, -5.0)).with_uniform(true);
        assert_eq!(solve_resize(&req, &c), Rect::new(-10.0, -5.0, 20.0, 10.0));
    }

    #[test]
    fn uniform_scale_respects_limits_on_both_axes() {
        let c = Constraints::default();
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(100.0, 0.0))
            .with_uniform(true)
            .with_max_size(Size::new(1_000.0, 20.0));
        assert_eq!(solve_resize(&req, &c), Rect::new(0.0, 0.0, 40.0, 20.0));

        // No aspect-preserving size fits: min height needs 3x, max width allows 2x.
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(5.0, 0.0))
            .with_uniform(true)
            .with_min_size(Size::new(0.0, 30.0))
            .with_max_size(Size::new(40.0, 1_000.0));
        assert_eq!(solve_resize(&req, &c), WIDE);
    }

    #[test]
    fn obstacle_stops_the_dragged_edge() {
        let obstacles = [Rect::new(30.0, 0.0, 40.0, 10.0)];
        let c = Constraints::default().with_obstacles(&obstacles);
        let req = ResizeRequest::new(WIDE, Edges::BOTTOM_RIGHT, Vec2::new(50.0, 5.0));
        let out = solve_resize(&req, &c);
        // X stops at the obstacle; Y is free to keep growing.
        assert!(approx(out, Rect::new(0.0, 0.0, 30.0, 15.0)), "got {out:?}");
    }

    #[test]
    fn uniform_obstacle_hit_rescales_orthogonal_dimension() {
        let obstacles = [Rect::new(30.0, -50.0, 40.0, 50.0)];
        let c = Constraints::default().with_obstacles(&obstacles);
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(30.0, 0.0)).with_uniform(true);
        let out = solve_resize(&req, &c);
        assert!(approx(out, Rect::new(0.0, 0.0, 30.0, 15.0)), "got {out:?}");
    }

    #[test]
    fn uniform_side_drag_cannot_tunnel_through_flush_obstacle() {
        // The obstacle sits flush against the bottom edge, which moves implicitly.
        let obstacles = [Rect::new(0.0, 10.0, 20.0, 20.0)];
        let c = Constraints::default().with_obstacles(&obstacles);
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(20.0, 0.0)).with_uniform(true);
        assert_eq!(solve_resize(&req, &c), WIDE);

        // Without aspect locking only the right edge moves.
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(20.0, 0.0));
        assert_eq!(solve_resize(&req, &c), Rect::new(0.0, 0.0, 40.0, 10.0));
    }

    #[test]
    fn flush_obstacle_against_anchored_edge_does_not_block() {
        // Obstacles above and to the left touch anchored edges only.
        let obstacles = [Rect::new(0.0, -10.0, 20.0, 0.0), Rect::new(-10.0, 0.0, 0.0, 10.0)];
        let c = Constraints::default().with_obstacles(&obstacles);
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(20.0, 0.0)).with_uniform(true);
        assert_eq!(solve_resize(&req, &c), Rect::new(0.0, 0.0, 40.0, 20.0));
    }

    #[test]
    fn shrinking_is_never_blocked() {
        let obstacles = [Rect::new(20.0, 0.0, 30.0, 10.0)];
        let c = Constraints::default().with_obstacles(&obstacles);
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(-5.0, 0.0));
        assert_eq!(solve_resize(&req, &c), Rect::new(0.0, 0.0, 15.0, 10.0));
    }

    #[test]
    fn no_op_inputs_return_the_original() {
        let c = Constraints::default();
        let req = ResizeRequest::new(WIDE, Edges::empty(), Vec2::new(5.0, 5.0));
        assert_eq!(solve_resize(&req, &c), WIDE);

        let flat = Rect::new(0.0, 0.0, 20.0, 0.0);
        let req = ResizeRequest::new(flat, Edges::BOTTOM, Vec2::new(0.0, 5.0));
        assert_eq!(solve_resize(&req, &c), flat);

        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(0.005, 0.0));
        assert_eq!(solve_resize(&req, &c), WIDE);

        let req = ResizeRequest::new(WIDE, Edges::HORIZONTAL, Vec2::new(5.0, 0.0));
        assert_eq!(solve_resize(&req, &c), WIDE);
    }

    #[test]
    fn rectangle_outside_bounds_is_not_pulled_back() {
        let c = Constraints::default().with_bounds(Some(Rect::new(0.0, 0.0, 15.0, 15.0)));
        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(5.0, 0.0));
        assert_eq!(solve_resize(&req, &c), WIDE);

        let req = ResizeRequest::new(WIDE, Edges::RIGHT, Vec2::new(5.0, 0.0)).with_uniform(true);
        assert_eq!(solve_resize(&req, &c), WIDE);
    }
}
