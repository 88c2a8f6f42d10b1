// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

bitflags::bitflags! {
    /// A set of rectangle edges.
    ///
    /// Used both as a resize handle (which edges the pointer is dragging) and
    /// as the result of a sweep (which edges of the moving rectangle made
    /// contact). The empty set stands for a whole-rectangle move.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// The minimum-x edge (`x0`).
        const LEFT   = 0b0001;
        /// The maximum-x edge (`x1`).
        const RIGHT  = 0b0010;
        /// The minimum-y edge (`y0`).
        const TOP    = 0b0100;
        /// The maximum-y edge (`y1`).
        const BOTTOM = 0b1000;

        /// Top-left corner handle.
        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        /// Top-right corner handle.
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        /// Bottom-left corner handle.
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        /// Bottom-right corner handle.
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();

        /// Both horizontal-axis edges.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Both vertical-axis edges.
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl Default for Edges {
    fn default() -> Self {
        Self::empty()
    }
}

/// Which edge of one axis a handle moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AxisEdge {
    /// Neither edge moves.
    Fixed,
    /// The minimum edge moves; the maximum edge is the anchor.
    Min,
    /// The maximum edge moves; the minimum edge is the anchor.
    Max,
}

impl AxisEdge {
    fn from_pair(min: bool, max: bool) -> Self {
        match (min, max) {
            (true, false) => Self::Min,
            (false, true) => Self::Max,
            _ => Self::Fixed,
        }
    }

    pub(crate) fn is_fixed(self) -> bool {
        self == Self::Fixed
    }
}

impl Edges {
    /// Returns `true` if any horizontal-axis edge is in the set.
    #[inline]
    #[must_use]
    pub fn has_horizontal(self) -> bool {
        self.intersects(Self::HORIZONTAL)
    }

    /// Returns `true` if any vertical-axis edge is in the set.
    #[inline]
    #[must_use]
    pub fn has_vertical(self) -> bool {
        self.intersects(Self::VERTICAL)
    }

    /// Returns `true` if the set names a corner: one horizontal and one vertical edge.
    #[must_use]
    pub fn is_corner(self) -> bool {
        !self.x_edge().is_fixed() && !self.y_edge().is_fixed()
    }

    /// The edge that moves on the x axis. Opposing pairs cancel out.
    pub(crate) fn x_edge(self) -> AxisEdge {
        AxisEdge::from_pair(self.contains(Self::LEFT), self.contains(Self::RIGHT))
    }

    /// The edge that moves on the y axis. Opposing pairs cancel out.
    pub(crate) fn y_edge(self) -> AxisEdge {
        AxisEdge::from_pair(self.contains(Self::TOP), self.contains(Self::BOTTOM))
    }
}
