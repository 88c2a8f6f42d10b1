// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_arrange --heading-base-level=0

//! Understory Arrange: constrained move and resize of axis-aligned rectangles.
//!
//! This crate is the geometric core of an interactive layout surface: the part
//! that decides how far a dragged selection may actually go. Given the raw
//! pointer or keyboard delta, it returns the largest safe part of it such that
//! - elements stay inside the surface, and
//! - elements never pass through, or come to rest overlapping, other elements.
//!
//! Collision is continuous: the whole path of every moving edge is tested, so
//! a fast drag cannot tunnel through a thin element.
//!
//! It is built from small layers that can be used on their own:
//! - Geometry helpers ([`overlaps`], [`intersect`], [`sweep_bounds`], ...) on
//!   [`kurbo::Rect`], with a tolerance so that touching is not overlapping.
//! - A swept collision detector ([`Sweep`], [`sweep`]) returning the
//!   normalized contact time and the contacting [`Edges`].
//! - A move solver ([`solve_move`]) for a group of rectangles.
//! - A resize solver ([`solve_resize`]) for one rectangle dragged by a handle,
//!   with size limits and optional aspect-ratio preservation.
//! - An [`Arrangement`] that owns elements and selection and runs one
//!   transform session at a time.
//!
//! It does **not** render, hit-test handles, or translate input events.
//! Callers turn their pointer and key events into deltas and feed them to
//! [`Arrangement::step`] or [`Arrangement::nudge`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size, Vec2};
//! use understory_arrange::{Arrangement, Edges, Element, StepOutcome, TransformMode};
//!
//! let mut arrangement = Arrangement::new(Size::new(200.0, 100.0));
//! let card = arrangement.insert(Element::new(Rect::new(10.0, 10.0, 50.0, 30.0)));
//! let _wall = arrangement.insert(Element::new(Rect::new(80.0, 0.0, 90.0, 100.0)));
//!
//! // Drag the card right; it stops flush against the wall.
//! arrangement.select_only(card);
//! arrangement.begin_transform(TransformMode::Move).unwrap();
//! arrangement.step(Vec2::new(50.0, 0.0)).unwrap();
//! let summary = arrangement.end_transform().unwrap();
//! assert!((summary.applied.x - 30.0).abs() < 1e-9);
//!
//! // Grow it downward; the surface edge stops it.
//! arrangement
//!     .begin_transform(TransformMode::Resize { target: card, handle: Edges::BOTTOM })
//!     .unwrap();
//! let outcome = arrangement.step(Vec2::new(0.0, 500.0)).unwrap();
//! arrangement.end_transform();
//! let StepOutcome::Resized { rect, .. } = outcome else { unreachable!() };
//! assert_eq!(rect.y1, 100.0);
//! ```
//!
//! ## Explaining a clamp
//!
//! Every solver has a `*_with_trace` variant taking a [`ConstraintTrace`] sink
//! that is told which bound or obstacle limited the result. [`TraceRecorder`]
//! collects the events in memory; `()` ignores them.
//!
//! ## Tolerance
//!
//! Overlaps thinner than the tolerance ([`DEFAULT_TOLERANCE`] unless set via
//! [`ArrangeOptions::tolerance`] or [`Constraints::epsilon`]) count as
//! touching, and motions smaller than it count as no motion. This absorbs
//! floating-point drift from repeated small steps.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Enable the `libm` feature when
//! building without `std`.

#![no_std]

extern crate alloc;

mod arrangement;
mod constraints;
mod edges;
mod element;
mod geometry;
mod move_solver;
mod options;
mod resize_solver;
mod sweep;
mod trace;

pub use arrangement::{
    Arrangement, SelectionChanged, StepOutcome, TransformError, TransformMode, TransformSummary,
};
pub use constraints::Constraints;
pub use edges::Edges;
pub use element::{ArrangeMode, Element, ElementFlags, ElementId};
pub use geometry::{DEFAULT_TOLERANCE, intersect, is_empty, offset, overlaps, sweep_bounds};
pub use move_solver::{solve_move, solve_move_with_trace};
pub use options::ArrangeOptions;
pub use resize_solver::{ResizeRequest, solve_resize, solve_resize_with_trace};
pub use sweep::{Sweep, SweepHit, sweep};
pub use trace::{Axis, ConstraintEvent, ConstraintTrace, TraceRecorder};
