// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::DEFAULT_TOLERANCE;
use crate::constraints::sanitize_tolerance;

/// Behavior knobs for an [`Arrangement`](crate::Arrangement).
///
/// The defaults limit elements to the surface, prevent overlap, use
/// [`DEFAULT_TOLERANCE`], and require rubber-band selection to fully cover an
/// element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrangeOptions {
    /// Keep transformed elements inside the surface rectangle.
    pub limit_to_bounds: bool,
    /// Stop transformed elements at obstacles instead of letting them overlap.
    pub prevent_overlap: bool,
    /// Tolerance in surface units for overlaps and motions.
    pub tolerance: f64,
    /// Fraction of an element's area a selection region must cover to pick it, in `[0, 1]`.
    ///
    /// `0.0` picks anything the region touches with positive area.
    pub selection_threshold: f64,
}

impl Default for ArrangeOptions {
    fn default() -> Self {
        Self {
            limit_to_bounds: true,
            prevent_overlap: true,
            tolerance: DEFAULT_TOLERANCE,
            selection_threshold: 1.0,
        }
    }
}

impl ArrangeOptions {
    /// Sets [`Self::limit_to_bounds`].
    #[must_use]
    pub fn with_limit_to_bounds(mut self, enabled: bool) -> Self {
        self.limit_to_bounds = enabled;
        self
    }

    /// Sets [`Self::prevent_overlap`].
    #[must_use]
    pub fn with_prevent_overlap(mut self, enabled: bool) -> Self {
        self.prevent_overlap = enabled;
        self
    }

    /// Sets [`Self::tolerance`]. Non-finite or negative values fall back to [`DEFAULT_TOLERANCE`].
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = sanitize_tolerance(tolerance);
        self
    }

    /// Sets [`Self::selection_threshold`], clamped to `[0, 1]`. NaN becomes `1.0`.
    #[must_use]
    pub fn with_selection_threshold(mut self, threshold: f64) -> Self {
        self.selection_threshold = if threshold.is_nan() {
            1.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }
}
