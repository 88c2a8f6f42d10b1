// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element table, selection bookkeeping, and the transform session.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::element::{ArrangeMode, Element, ElementFlags, ElementId};
use crate::geometry::{coverage, is_empty};
use crate::move_solver::solve_move_with_trace;
use crate::resize_solver::{ResizeRequest, solve_resize_with_trace};
use crate::trace::{Axis, ConstraintTrace};
use crate::{ArrangeOptions, Constraints, Edges, SweepHit};

/// Obstacle snapshots live inline up to this many rectangles.
const INLINE_OBSTACLES: usize = 16;

type RectSnapshot = SmallVec<[Rect; INLINE_OBSTACLES]>;
type IdSnapshot = SmallVec<[ElementId; INLINE_OBSTACLES]>;

/// Error returned by the transform session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformError {
    /// The id does not refer to a live element.
    UnknownElement(ElementId),
    /// [`Arrangement::step`] was called without [`Arrangement::begin_transform`].
    NoActiveTransform,
    /// A transform is already active; end it first.
    TransformInProgress,
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElement(id) => write!(f, "element {id:?} does not exist"),
            Self::NoActiveTransform => f.write_str("no transform is active"),
            Self::TransformInProgress => f.write_str("a transform is already active"),
        }
    }
}

impl core::error::Error for TransformError {}

/// What a transform does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformMode {
    /// Move every selected, movable element together.
    Move,
    /// Resize one element by dragging `handle`.
    Resize {
        /// Element being resized.
        target: ElementId,
        /// Handle being dragged.
        handle: Edges,
    },
}

/// Result of one [`Arrangement::step`], already written to the element table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// Every moving element was translated by `delta`.
    Moved {
        /// Applied translation.
        delta: Vec2,
    },
    /// The target element now has geometry `rect`.
    Resized {
        /// The resized element.
        id: ElementId,
        /// Its new geometry.
        rect: Rect,
    },
}

/// Totals for a finished transform, returned by [`Arrangement::end_transform`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSummary {
    /// The transform that ended.
    pub mode: TransformMode,
    /// Number of steps taken.
    pub steps: u32,
    /// Sum of the raw deltas passed to [`Arrangement::step`].
    pub requested: Vec2,
    /// Sum of the motion actually applied: the translation for a move, the
    /// displacement of the dragged edges for a resize.
    pub applied: Vec2,
}

/// Selection transition produced by a selection call.
///
/// The arrangement only stores membership; callers apply this to whatever
/// presentation state (highlights, adorners, z-order) they keep.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionChanged {
    /// Elements that joined the selection, in selection order.
    pub added: Vec<ElementId>,
    /// Elements that left the selection.
    pub removed: Vec<ElementId>,
}

impl SelectionChanged {
    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
    selected: bool,
}

#[derive(Clone, Debug)]
struct ActiveTransform {
    mode: TransformMode,
    /// Elements that follow the transform, fixed when it begins.
    moving: Vec<ElementId>,
    steps: u32,
    requested: Vec2,
    applied: Vec2,
}

/// A surface of rectangular elements that can be selected, moved, and resized.
///
/// `Arrangement` owns the element table and runs at most one transform at a
/// time:
///
/// 1. [`begin_transform`](Self::begin_transform) fixes what moves.
/// 2. [`step`](Self::step) is called for each pointer move or key repeat with
///    the raw delta. Moving geometry and obstacles are snapshotted from the
///    table, the solver clamps the delta, and the result is written back.
/// 3. [`end_transform`](Self::end_transform) releases the session.
///
/// ```rust
/// use kurbo::{Rect, Size, Vec2};
/// use understory_arrange::{Arrangement, Element, StepOutcome, TransformMode};
///
/// let mut arrangement = Arrangement::new(Size::new(100.0, 100.0));
/// let a = arrangement.insert(Element::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
/// let _wall = arrangement.insert(Element::new(Rect::new(30.0, 0.0, 40.0, 10.0)));
///
/// arrangement.select_only(a);
/// arrangement.begin_transform(TransformMode::Move).unwrap();
/// let outcome = arrangement.step(Vec2::new(25.0, 0.0)).unwrap();
/// arrangement.end_transform();
///
/// let StepOutcome::Moved { delta } = outcome else { unreachable!() };
/// assert!((delta.x - 20.0).abs() < 1e-9);
/// assert!((arrangement.get(a).unwrap().rect.x1 - 30.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Arrangement {
    slots: Vec<Slot>,
    free: Vec<u32>,
    selection: Vec<ElementId>,
    surface: Size,
    options: ArrangeOptions,
    active: Option<ActiveTransform>,
}

impl Arrangement {
    /// Creates an empty arrangement over a surface of the given size, with default options.
    #[must_use]
    pub fn new(surface: Size) -> Self {
        Self::with_options(surface, ArrangeOptions::default())
    }

    /// Creates an empty arrangement with explicit options.
    #[must_use]
    pub fn with_options(surface: Size, options: ArrangeOptions) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            selection: Vec::new(),
            surface,
            options,
            active: None,
        }
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> ArrangeOptions {
        self.options
    }

    /// Replaces the options. Takes effect from the next step.
    pub fn set_options(&mut self, options: ArrangeOptions) {
        self.options = options;
    }

    /// Size of the surface; the bounds are `(0, 0)` to this size.
    #[must_use]
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Resizes the surface.
    pub fn set_surface(&mut self, surface: Size) {
        self.surface = surface;
    }

    /// The rectangle transforms are confined to, or `None` when bounds limiting is off.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.options
            .limit_to_bounds
            .then(|| Rect::from_origin_size(Point::ZERO, self.surface))
    }

    // --- elements ---

    /// Adds an element and returns its id.
    pub fn insert(&mut self, element: Element) -> ElementId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.element = Some(element);
            slot.selected = false;
            ElementId::new(idx, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 1,
                element: Some(element),
                selected: false,
            });
            slot_id(self.slots.len() - 1, 1)
        }
    }

    /// Removes an element, dropping it from the selection. Returns the removed element.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        if !self.is_alive(id) {
            return None;
        }
        let slot = &mut self.slots[id.idx()];
        let element = slot.element.take();
        if slot.selected {
            slot.selected = false;
            self.selection.retain(|s| *s != id);
        }
        self.free.push(id.0);
        element
    }

    /// Returns `true` if `id` refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.slots
            .get(id.idx())
            .is_some_and(|s| s.generation == id.generation() && s.element.is_some())
    }

    /// Returns the element for `id`, if live.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.slots
            .get(id.idx())
            .filter(|s| s.generation == id.generation())
            .and_then(|s| s.element.as_ref())
    }

    /// Returns the element for `id` mutably, if live.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.slots
            .get_mut(id.idx())
            .filter(|s| s.generation == id.generation())
            .and_then(|s| s.element.as_mut())
    }

    /// Overwrites the geometry of an element. The rectangle is normalized.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) -> Result<(), TransformError> {
        let element = self
            .get_mut(id)
            .ok_or(TransformError::UnknownElement(id))?;
        element.rect = rect.abs();
        Ok(())
    }

    /// Iterates over live elements in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.element
                .as_ref()
                .map(|e| (slot_id(idx, slot.generation), e))
        })
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if there are no live elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- selection ---

    /// Selected elements in selection order.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Returns `true` if `id` is live and selected.
    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.is_alive(id) && self.slots[id.idx()].selected
    }

    /// Adds `id` to the selection.
    pub fn select(&mut self, id: ElementId) -> SelectionChanged {
        if !self.is_alive(id) || self.is_selected(id) {
            return SelectionChanged::default();
        }
        self.slots[id.idx()].selected = true;
        self.selection.push(id);
        SelectionChanged {
            added: alloc::vec![id],
            removed: Vec::new(),
        }
    }

    /// Removes `id` from the selection.
    pub fn deselect(&mut self, id: ElementId) -> SelectionChanged {
        if !self.is_selected(id) {
            return SelectionChanged::default();
        }
        self.slots[id.idx()].selected = false;
        self.selection.retain(|s| *s != id);
        SelectionChanged {
            added: Vec::new(),
            removed: alloc::vec![id],
        }
    }

    /// Flips the selection state of `id`.
    pub fn toggle(&mut self, id: ElementId) -> SelectionChanged {
        if self.is_selected(id) {
            self.deselect(id)
        } else {
            self.select(id)
        }
    }

    /// Replaces the selection with just `id`. Stale ids leave the selection untouched.
    pub fn select_only(&mut self, id: ElementId) -> SelectionChanged {
        if !self.is_alive(id) {
            return SelectionChanged::default();
        }
        self.replace_selection([id])
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) -> SelectionChanged {
        self.replace_selection([])
    }

    /// Replaces the selection with `ids`, skipping stale ids and duplicates.
    pub fn replace_selection<I>(&mut self, ids: I) -> SelectionChanged
    where
        I: IntoIterator<Item = ElementId>,
    {
        let mut next: Vec<ElementId> = Vec::new();
        for id in ids {
            if self.is_alive(id) && !next.contains(&id) {
                next.push(id);
            }
        }

        let removed: Vec<ElementId> = self
            .selection
            .iter()
            .copied()
            .filter(|id| !next.contains(id))
            .collect();
        let added: Vec<ElementId> = next
            .iter()
            .copied()
            .filter(|id| !self.slots[id.idx()].selected)
            .collect();

        for id in &removed {
            self.slots[id.idx()].selected = false;
        }
        for id in &added {
            self.slots[id.idx()].selected = true;
        }
        if !(added.is_empty() && removed.is_empty()) {
            self.selection = next;
        }
        SelectionChanged { added, removed }
    }

    /// Rubber-band selection: picks visible elements covered by `region` at
    /// least as much as [`ArrangeOptions::selection_threshold`].
    ///
    /// With `extend` set the picked elements are added to the current
    /// selection; otherwise they replace it.
    pub fn select_in_region(&mut self, region: Rect, extend: bool) -> SelectionChanged {
        let region = region.abs();
        let threshold = self.options.selection_threshold;
        let picked: Vec<ElementId> = self
            .iter()
            .filter(|(_, e)| e.is_visible())
            .filter(|(_, e)| {
                let covered = coverage(e.rect, region);
                if threshold > 0.0 {
                    covered >= threshold
                } else {
                    covered > 0.0
                }
            })
            .map(|(id, _)| id)
            .collect();

        if extend {
            let current = self.selection.clone();
            self.replace_selection(current.into_iter().chain(picked))
        } else {
            self.replace_selection(picked)
        }
    }

    // --- transforms ---

    /// Returns `true` while a transform is active.
    #[must_use]
    pub fn is_transforming(&self) -> bool {
        self.active.is_some()
    }

    /// The active transform mode, if any.
    #[must_use]
    pub fn active_mode(&self) -> Option<TransformMode> {
        self.active.as_ref().map(|a| a.mode)
    }

    /// Starts a transform.
    ///
    /// For [`TransformMode::Move`], the moving set is the current selection
    /// filtered to elements that accept [`ArrangeMode::MOVE`]. Selected
    /// elements that do not accept it stay put and act as obstacles.
    pub fn begin_transform(&mut self, mode: TransformMode) -> Result<(), TransformError> {
        if self.active.is_some() {
            return Err(TransformError::TransformInProgress);
        }
        let moving = match mode {
            TransformMode::Move => self
                .selection
                .iter()
                .copied()
                .filter(|id| {
                    self.get(*id)
                        .is_some_and(|e| e.mode.contains(ArrangeMode::MOVE))
                })
                .collect(),
            TransformMode::Resize { target, .. } => {
                if !self.is_alive(target) {
                    return Err(TransformError::UnknownElement(target));
                }
                alloc::vec![target]
            }
        };
        self.active = Some(ActiveTransform {
            mode,
            moving,
            steps: 0,
            requested: Vec2::ZERO,
            applied: Vec2::ZERO,
        });
        Ok(())
    }

    /// Applies one raw delta to the active transform.
    pub fn step(&mut self, raw_delta: Vec2) -> Result<StepOutcome, TransformError> {
        self.step_with_trace(raw_delta, &mut ())
    }

    /// Like [`step`](Self::step), reporting what limited the motion to `trace`.
    pub fn step_with_trace<T>(
        &mut self,
        raw_delta: Vec2,
        trace: &mut T,
    ) -> Result<StepOutcome, TransformError>
    where
        T: ConstraintTrace<ElementId> + ?Sized,
    {
        let mut active = self.active.take().ok_or(TransformError::NoActiveTransform)?;
        let result = match active.mode {
            TransformMode::Move => Ok(self.step_move(&active.moving, raw_delta, trace)),
            TransformMode::Resize { target, handle } => {
                self.step_resize(target, handle, raw_delta, trace)
            }
        };
        if let Ok((_, applied)) = result {
            active.steps = active.steps.saturating_add(1);
            active.requested += raw_delta;
            active.applied += applied;
        }
        self.active = Some(active);
        result.map(|(outcome, _)| outcome)
    }

    /// Ends the active transform and returns its totals, or `None` if none was active.
    pub fn end_transform(&mut self) -> Option<TransformSummary> {
        self.active.take().map(|a| TransformSummary {
            mode: a.mode,
            steps: a.steps,
            requested: a.requested,
            applied: a.applied,
        })
    }

    /// Moves the selection by a discrete keyboard step and returns the applied delta.
    ///
    /// Equivalent to a one-step [`TransformMode::Move`] transform.
    pub fn nudge(&mut self, delta: Vec2) -> Result<Vec2, TransformError> {
        self.begin_transform(TransformMode::Move)?;
        let outcome = self.step(delta);
        self.end_transform();
        match outcome? {
            StepOutcome::Moved { delta } => Ok(delta),
            StepOutcome::Resized { .. } => Ok(Vec2::ZERO),
        }
    }

    fn step_move<T>(&mut self, moving: &[ElementId], raw: Vec2, trace: &mut T) -> (StepOutcome, Vec2)
    where
        T: ConstraintTrace<ElementId> + ?Sized,
    {
        let epsilon = self.options.tolerance;
        let bounds = self.bounds();

        let mut blocking = RectSnapshot::new();
        let mut exempt = RectSnapshot::new();
        for e in moving.iter().filter_map(|id| self.get(*id)) {
            if !e.is_visible() {
                continue;
            }
            if e.flags.contains(ElementFlags::OVERLAP_EXEMPT) {
                exempt.push(e.rect);
            } else {
                blocking.push(e.rect);
            }
        }
        if blocking.is_empty() && exempt.is_empty() {
            return (StepOutcome::Moved { delta: Vec2::ZERO }, Vec2::ZERO);
        }

        let mut delta = raw;
        // Exempt members only answer to the bounds, which do not depend on the path.
        if !exempt.is_empty() {
            let constraints = Constraints::new(epsilon).with_bounds(bounds);
            let mut mapped = MapKeys::new(&[], &mut *trace);
            delta = solve_move_with_trace(&exempt, &constraints, delta, &mut mapped);
        }
        if !blocking.is_empty() {
            let (obstacles, ids) = if self.options.prevent_overlap {
                self.snapshot_obstacles(moving)
            } else {
                (RectSnapshot::new(), IdSnapshot::new())
            };
            let constraints = Constraints::new(epsilon)
                .with_bounds(bounds)
                .with_obstacles(&obstacles);
            let mut mapped = MapKeys::new(&ids, &mut *trace);
            delta = solve_move_with_trace(&blocking, &constraints, delta, &mut mapped);
        }

        if delta != Vec2::ZERO {
            for id in moving {
                if let Some(e) = self.get_mut(*id) {
                    if e.is_visible() {
                        e.rect = e.rect + delta;
                    }
                }
            }
        }
        (StepOutcome::Moved { delta }, delta)
    }

    fn step_resize<T>(
        &mut self,
        target: ElementId,
        handle: Edges,
        raw: Vec2,
        trace: &mut T,
    ) -> Result<(StepOutcome, Vec2), TransformError>
    where
        T: ConstraintTrace<ElementId> + ?Sized,
    {
        let element = *self
            .get(target)
            .ok_or(TransformError::UnknownElement(target))?;
        let before = element.rect;
        if !element.is_visible() || !element.mode.contains(ArrangeMode::RESIZE) {
            let outcome = StepOutcome::Resized {
                id: target,
                rect: before,
            };
            return Ok((outcome, Vec2::ZERO));
        }

        let request = ResizeRequest::new(before, handle, raw)
            .with_min_size(element.min_size)
            .with_max_size(element.max_size)
            .with_uniform(element.flags.contains(ElementFlags::UNIFORM));
        let (obstacles, ids) = if self.options.prevent_overlap && element.blocks() {
            self.snapshot_obstacles(&[target])
        } else {
            (RectSnapshot::new(), IdSnapshot::new())
        };
        let constraints = Constraints::new(self.options.tolerance)
            .with_bounds(self.bounds())
            .with_obstacles(&obstacles);
        let mut mapped = MapKeys::new(&ids, &mut *trace);
        let rect = solve_resize_with_trace(&request, &constraints, &mut mapped);

        if let Some(e) = self.get_mut(target) {
            e.rect = rect;
        }
        let outcome = StepOutcome::Resized { id: target, rect };
        Ok((outcome, handle_displacement(handle, before, rect)))
    }

    /// Visible, non-exempt, non-degenerate elements outside `moving`, with their ids.
    fn snapshot_obstacles(&self, moving: &[ElementId]) -> (RectSnapshot, IdSnapshot) {
        let mut rects = RectSnapshot::new();
        let mut ids = IdSnapshot::new();
        for (id, e) in self.iter() {
            if moving.contains(&id) || !e.blocks() || is_empty(e.rect) {
                continue;
            }
            rects.push(e.rect);
            ids.push(id);
        }
        (rects, ids)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "element counts stay far below u32::MAX"
)]
fn slot_id(idx: usize, generation: u32) -> ElementId {
    ElementId::new(idx as u32, generation)
}

/// How far the dragged edges moved between `before` and `after`.
fn handle_displacement(handle: Edges, before: Rect, after: Rect) -> Vec2 {
    use crate::edges::AxisEdge;

    let along = |edge: AxisEdge, b0: f64, b1: f64, a0: f64, a1: f64| match edge {
        AxisEdge::Min => a0 - b0,
        AxisEdge::Max => a1 - b1,
        AxisEdge::Fixed => 0.0,
    };
    Vec2::new(
        along(handle.x_edge(), before.x0, before.x1, after.x0, after.x1),
        along(handle.y_edge(), before.y0, before.y1, after.y0, after.y1),
    )
}

/// Forwards solver events to a caller's sink, translating obstacle indices into element ids.
struct MapKeys<'a, T: ?Sized> {
    ids: &'a [ElementId],
    inner: &'a mut T,
}

impl<'a, T: ?Sized> MapKeys<'a, T> {
    fn new(ids: &'a [ElementId], inner: &'a mut T) -> Self {
        Self { ids, inner }
    }
}

impl<T> ConstraintTrace<usize> for MapKeys<'_, T>
where
    T: ConstraintTrace<ElementId> + ?Sized,
{
    fn bounds_limited(&mut self, axis: Axis, limit: f64) {
        self.inner.bounds_limited(axis, limit);
    }

    fn obstacle_hit(&mut self, key: usize, hit: SweepHit) {
        if let Some(id) = self.ids.get(key) {
            self.inner.obstacle_hit(*id, hit);
        }
    }
}
