// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element records stored by an [`Arrangement`](crate::Arrangement).

use kurbo::{Rect, Size};

/// Identifier for an element in an [`Arrangement`](crate::Arrangement).
///
/// A slot index plus a generation counter. Removing an element frees its slot;
/// reusing the slot bumps the generation, so stale ids never alias a newer
/// element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Per-element flags consulted while transforming.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is visible. Hidden elements neither move nor block.
        const VISIBLE        = 0b0000_0001;
        /// Element may overlap others: it never blocks, and is never blocked.
        const OVERLAP_EXEMPT = 0b0000_0010;
        /// Element keeps its aspect ratio when resized.
        const UNIFORM        = 0b0000_0100;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

bitflags::bitflags! {
    /// Which transforms an element accepts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ArrangeMode: u8 {
        /// Element follows move transforms.
        const MOVE   = 0b01;
        /// Element follows resize transforms.
        const RESIZE = 0b10;
    }
}

impl Default for ArrangeMode {
    fn default() -> Self {
        Self::MOVE | Self::RESIZE
    }
}

/// Geometry and transform rules for one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Element {
    /// Current geometry in surface coordinates.
    pub rect: Rect,
    /// Smallest size a resize may produce.
    pub min_size: Size,
    /// Largest size a resize may produce.
    pub max_size: Size,
    /// Visibility, overlap, and aspect flags.
    pub flags: ElementFlags,
    /// Transforms the element accepts.
    pub mode: ArrangeMode,
}

impl Element {
    /// A visible, movable, resizable element with no size limits.
    ///
    /// `rect` is normalized so that `x0 <= x1` and `y0 <= y1`.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: rect.abs(),
            min_size: Size::ZERO,
            max_size: Size::new(f64::INFINITY, f64::INFINITY),
            flags: ElementFlags::default(),
            mode: ArrangeMode::default(),
        }
    }

    /// Sets the size limits.
    #[must_use]
    pub fn with_size_limits(mut self, min_size: Size, max_size: Size) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Sets the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the accepted transforms.
    #[must_use]
    pub fn with_mode(mut self, mode: ArrangeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns `true` if the element is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(ElementFlags::VISIBLE)
    }

    /// Returns `true` if the element takes part in overlap prevention.
    #[must_use]
    pub fn blocks(&self) -> bool {
        self.is_visible() && !self.flags.contains(ElementFlags::OVERLAP_EXEMPT)
    }
}
