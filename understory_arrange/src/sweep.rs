// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swept (continuous) collision detection between a transforming rectangle and
//! a stationary one.
//!
//! A [`Sweep`] describes a rectangle whose four edges travel linearly from a
//! start geometry to an end geometry over `t ∈ [0, 1]`. A rigid move shifts all
//! four edges by the same vector; a resize leaves the anchored edges in place.
//! Both are answered by the same per-axis solve, which is what lets a resize
//! that grows an implicitly moving edge be tested exactly like a drag.
//!
//! Detection is split into two phases:
//! - **Broad phase**: the union of start and end geometry must overlap the
//!   obstacle. This is a cheap rejection test.
//! - **Narrow phase**: per axis, solve for the window of `t` during which the
//!   moving span overlaps the obstacle span, intersect the two windows, and
//!   report the earliest contact. Two rectangles whose broad regions overlap
//!   but whose paths never actually meet (a diagonal passing a corner) are
//!   rejected here.
//!
//! Contact only counts when the path penetrates the obstacle by more than the
//! tolerance; touching and sub-tolerance slivers are not collisions.

use kurbo::{Rect, Vec2};

use crate::edges::AxisEdge;
use crate::geometry::{is_empty, overlaps, sweep_bounds};
use crate::Edges;

/// The earliest contact found by [`Sweep::hit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    /// Fraction of the sweep, in `[0, 1]`, at which the moving rectangle first touches the obstacle.
    pub time: f64,
    /// Edges of the moving rectangle that made contact.
    ///
    /// A moving `RIGHT` edge meets the obstacle's left side, and so on. A
    /// corner contact reports one edge per axis, so callers clamp both axes.
    pub edges: Edges,
}

/// A rectangle transforming linearly from one geometry to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    from: Rect,
    to: Rect,
}

impl Sweep {
    /// Creates a sweep in which every edge moves linearly from `from` to `to`.
    #[must_use]
    pub fn new(from: Rect, to: Rect) -> Self {
        Self { from, to }
    }

    /// A rigid move of `rect` by `drag`.
    #[must_use]
    pub fn translate(rect: Rect, drag: Vec2) -> Self {
        Self::new(rect, rect + drag)
    }

    /// A resize from `from` to `to`; edges that do not differ stay anchored.
    #[must_use]
    pub fn stretch(from: Rect, to: Rect) -> Self {
        Self::new(from, to)
    }

    /// Start geometry.
    #[must_use]
    pub fn from(&self) -> Rect {
        self.from
    }

    /// End geometry.
    #[must_use]
    pub fn to(&self) -> Rect {
        self.to
    }

    /// Region covered over the whole sweep.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        sweep_bounds(self.from, self.to)
    }

    /// Geometry at fraction `t` of the sweep.
    #[must_use]
    pub fn at(&self, t: f64) -> Rect {
        let lerp = |a: f64, b: f64| if t >= 1.0 { b } else { a + (b - a) * t };
        Rect::new(
            lerp(self.from.x0, self.to.x0),
            lerp(self.from.y0, self.to.y0),
            lerp(self.from.x1, self.to.x1),
            lerp(self.from.y1, self.to.y1),
        )
    }

    /// Broad-phase test: does the swept region overlap `obstacle` by more than `epsilon`?
    #[must_use]
    pub fn broad_phase(&self, obstacle: Rect, epsilon: f64) -> bool {
        overlaps(self.bounds(), obstacle, epsilon)
    }

    /// Finds the earliest contact with `obstacle`, if the sweep penetrates it.
    ///
    /// Returns `None` when:
    /// - `obstacle` has no area;
    /// - the broad phase rejects the pair;
    /// - the start geometry already overlaps `obstacle` by more than `epsilon`
    ///   (pre-existing overlap is left alone);
    /// - the path only touches the obstacle or grazes it by less than `epsilon`.
    #[must_use]
    pub fn hit(&self, obstacle: Rect, epsilon: f64) -> Option<SweepHit> {
        if is_empty(obstacle) || !self.broad_phase(obstacle, epsilon) {
            return None;
        }
        if overlaps(self.from, obstacle, epsilon) {
            return None;
        }

        // Deep contact: the path must reach into the obstacle shrunk by `epsilon`.
        let deep_x = self.axis_x(obstacle.x0 + epsilon, obstacle.x1 - epsilon, epsilon)?;
        let deep_y = self.axis_y(obstacle.y0 + epsilon, obstacle.y1 - epsilon, epsilon)?;
        let deep_enter = deep_x.enter.max(deep_y.enter);
        let deep_exit = deep_x.exit.min(deep_y.exit);
        if !(deep_enter < deep_exit && deep_enter < 1.0 && deep_exit > 0.0) {
            return None;
        }

        // Contact time is measured against the exact obstacle so the result stops flush.
        let x = self.axis_x(obstacle.x0, obstacle.x1, epsilon)?;
        let y = self.axis_y(obstacle.y0, obstacle.y1, epsilon)?;
        let time = x.enter.max(y.enter);
        if !time.is_finite() {
            return None;
        }

        let edges = match (x.enter.is_finite(), y.enter.is_finite()) {
            (true, false) => x.leading_edge(Edges::LEFT, Edges::RIGHT),
            (false, true) => y.leading_edge(Edges::TOP, Edges::BOTTOM),
            _ => {
                // Compare entry times as distances along the path.
                if (x.enter - y.enter).abs() * self.max_displacement() <= epsilon {
                    x.leading_edge(Edges::LEFT, Edges::RIGHT)
                        | y.leading_edge(Edges::TOP, Edges::BOTTOM)
                } else if x.enter > y.enter {
                    x.leading_edge(Edges::LEFT, Edges::RIGHT)
                } else {
                    y.leading_edge(Edges::TOP, Edges::BOTTOM)
                }
            }
        };

        Some(SweepHit {
            time: time.clamp(0.0, 1.0),
            edges,
        })
    }

    fn axis_x(&self, lo: f64, hi: f64, epsilon: f64) -> Option<AxisWindow> {
        AxisWindow::solve(
            Span::new(self.from.x0, self.from.x1, self.to.x0, self.to.x1),
            lo,
            hi,
            epsilon,
        )
    }

    fn axis_y(&self, lo: f64, hi: f64, epsilon: f64) -> Option<AxisWindow> {
        AxisWindow::solve(
            Span::new(self.from.y0, self.from.y1, self.to.y0, self.to.y1),
            lo,
            hi,
            epsilon,
        )
    }

    fn max_displacement(&self) -> f64 {
        (self.to.x0 - self.from.x0)
            .abs()
            .max((self.to.x1 - self.from.x1).abs())
            .max((self.to.y0 - self.from.y0).abs())
            .max((self.to.y1 - self.from.y1).abs())
    }
}

/// Finds the earliest contact of `moving` translated by `drag` with `obstacle`.
///
/// Shorthand for `Sweep::translate(moving, drag).hit(obstacle, epsilon)`.
#[must_use]
pub fn sweep(moving: Rect, obstacle: Rect, drag: Vec2, epsilon: f64) -> Option<SweepHit> {
    Sweep::translate(moving, drag).hit(obstacle, epsilon)
}

/// One axis of a moving rectangle: its extent and the displacement of each edge.
#[derive(Clone, Copy, Debug)]
struct Span {
    lo: f64,
    hi: f64,
    d_lo: f64,
    d_hi: f64,
}

impl Span {
    fn new(lo: f64, hi: f64, to_lo: f64, to_hi: f64) -> Self {
        Self {
            lo,
            hi,
            d_lo: to_lo - lo,
            d_hi: to_hi - hi,
        }
    }
}

/// The open interval of `t` during which a span overlaps an obstacle span.
#[derive(Clone, Copy, Debug)]
struct AxisWindow {
    enter: f64,
    exit: f64,
    leading: AxisEdge,
}

impl AxisWindow {
    /// Solves `hi(t) > obstacle_lo` and `lo(t) < obstacle_hi` for `t`.
    ///
    /// Returns `None` when the two conditions never hold together.
    fn solve(span: Span, obstacle_lo: f64, obstacle_hi: f64, epsilon: f64) -> Option<Self> {
        let mut window = Self {
            enter: f64::NEG_INFINITY,
            exit: f64::INFINITY,
            leading: AxisEdge::Fixed,
        };
        window.constrain(span.hi - obstacle_lo, span.d_hi, AxisEdge::Max, epsilon)?;
        window.constrain(obstacle_hi - span.lo, -span.d_lo, AxisEdge::Min, epsilon)?;
        (window.enter < window.exit).then_some(window)
    }

    /// Intersects the window with `{ t : gap + t * rate > 0 }`.
    ///
    /// A rate at or below `epsilon` is treated as stationary: the condition
    /// either always holds or never does, and nothing is divided by it.
    fn constrain(&mut self, gap: f64, rate: f64, edge: AxisEdge, epsilon: f64) -> Option<()> {
        if rate.abs() <= epsilon {
            return (gap > 0.0).then_some(());
        }
        let root = -gap / rate;
        if rate > 0.0 {
            if root > self.enter {
                self.enter = root;
                self.leading = edge;
            }
        } else {
            self.exit = self.exit.min(root);
        }
        Some(())
    }

    fn leading_edge(&self, min: Edges, max: Edges) -> Edges {
        match self.leading {
            AxisEdge::Min => min,
            AxisEdge::Max => max,
            AxisEdge::Fixed => Edges::empty(),
        }
    }
}
