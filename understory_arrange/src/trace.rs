// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explainability hooks for constraint solving.
//!
//! The solvers only return the clamped result. When an embedder wants to know
//! *why* a drag stopped short (to flash the obstacle that blocked it, or to
//! show a boundary guide) it can pass a [`ConstraintTrace`] sink to the
//! `*_with_trace` entry points. The unit type `()` is a no-op sink.
//!
//! Solvers identify obstacles by their index in [`Constraints::obstacles`](crate::Constraints::obstacles).
//! [`Arrangement`](crate::Arrangement) maps those indices back to
//! [`ElementId`](crate::ElementId)s before forwarding to a caller's sink.

use alloc::vec::Vec;

use crate::SweepHit;

/// A coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// A callback sink for constraint events.
///
/// Both methods default to doing nothing, so sinks only implement what they care about.
pub trait ConstraintTrace<K> {
    /// Called when the bounds stopped motion on `axis` at the boundary coordinate `limit`.
    fn bounds_limited(&mut self, axis: Axis, limit: f64) {
        let _ = (axis, limit);
    }

    /// Called when the transform would have driven into the obstacle identified by `key`.
    fn obstacle_hit(&mut self, key: K, hit: SweepHit) {
        let _ = (key, hit);
    }
}

impl<K> ConstraintTrace<K> for () {}

/// A single recorded constraint event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstraintEvent<K> {
    /// See [`ConstraintTrace::bounds_limited`].
    BoundsLimited {
        /// Axis that was limited.
        axis: Axis,
        /// Boundary coordinate that stopped the motion.
        limit: f64,
    },
    /// See [`ConstraintTrace::obstacle_hit`].
    ObstacleHit {
        /// The obstacle.
        key: K,
        /// Contact details.
        hit: SweepHit,
    },
}

/// Records every constraint event in order.
#[derive(Clone, Debug)]
pub struct TraceRecorder<K> {
    events: Vec<ConstraintEvent<K>>,
}

impl<K> Default for TraceRecorder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TraceRecorder<K> {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// All recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[ConstraintEvent<K>] {
        &self.events
    }

    /// Keys of the obstacles that were hit, in the order they were reported.
    pub fn hit_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.events.iter().filter_map(|e| match e {
            ConstraintEvent::ObstacleHit { key, .. } => Some(key),
            ConstraintEvent::BoundsLimited { .. } => None,
        })
    }

    /// Returns `true` if the bounds limited motion on `axis`.
    #[must_use]
    pub fn bounds_limited_on(&self, axis: Axis) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, ConstraintEvent::BoundsLimited { axis: a, .. } if *a == axis))
    }

    /// Forgets all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<K> ConstraintTrace<K> for TraceRecorder<K> {
    fn bounds_limited(&mut self, axis: Axis, limit: f64) {
        self.events
            .push(ConstraintEvent::BoundsLimited { axis, limit });
    }

    fn obstacle_hit(&mut self, key: K, hit: SweepHit) {
        self.events.push(ConstraintEvent::ObstacleHit { key, hit });
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, ConstraintEvent, ConstraintTrace, TraceRecorder};
    use crate::{Edges, SweepHit};

    #[test]
    fn recorder_keeps_order_and_filters_hits() {
        let mut rec = TraceRecorder::<u32>::new();
        let hit = SweepHit {
            time: 0.5,
            edges: Edges::RIGHT,
        };
        rec.bounds_limited(Axis::Y, 100.0);
        rec.obstacle_hit(7, hit);

        assert_eq!(rec.events().len(), 2);
        assert_eq!(
            rec.events()[0],
            ConstraintEvent::BoundsLimited {
                axis: Axis::Y,
                limit: 100.0
            }
        );
        assert!(rec.hit_keys().copied().eq([7]));
        assert!(rec.bounds_limited_on(Axis::Y));
        assert!(!rec.bounds_limited_on(Axis::X));

        rec.clear();
        assert!(rec.events().is_empty());
    }

    #[test]
    fn unit_sink_accepts_everything() {
        ConstraintTrace::<u32>::bounds_limited(&mut (), Axis::X, 1.0);
        ConstraintTrace::<u32>::obstacle_hit(
            &mut (),
            1,
            SweepHit {
                time: 0.0,
                edges: Edges::LEFT,
            },
        );
    }
}
