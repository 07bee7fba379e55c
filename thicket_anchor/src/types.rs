// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry shared by every Thicket crate.

use kurbo::{Point, Rect};

/// An integer rectangle: origin plus extent.
///
/// Controls store their rectangle in the coordinate space of their parent's
/// client area. Widths and heights are never negative once they pass through
/// [`resolve`](crate::resolve); callers constructing a `Bounds` by hand are
/// expected to do the same.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Bounds {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a rectangle from its origin and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// The extent of this rectangle.
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether either extent is zero or negative.
    pub const fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// The same rectangle moved by `(dx, dy)`.
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink the rectangle by `margins` on each side.
    ///
    /// The result never has a negative extent; over-inset rectangles collapse
    /// to zero width or height at the inset origin.
    pub fn inset(self, margins: Margins) -> Self {
        Self::new(
            self.x + margins.left,
            self.y + margins.top,
            (self.width - margins.horizontal()).max(0),
            (self.height - margins.vertical()).max(0),
        )
    }

    /// Whether `point` lies inside this rectangle.
    ///
    /// Left and top edges are inclusive, right and bottom edges are exclusive,
    /// so two rectangles sharing an edge never both contain a point on it.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= f64::from(self.x)
            && point.y >= f64::from(self.y)
            && point.x < f64::from(self.right())
            && point.y < f64::from(self.bottom())
    }

    /// Intersection of two rectangles, or `None` when they do not overlap.
    pub fn intersect(&self, other: Self) -> Option<Self> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x1 > x0 && y1 > y0).then(|| Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Convert to a Kurbo rectangle for hand-off to a rendering backend.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

/// An integer extent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Size {
    /// The zero size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Spacing on the four sides of a rectangle.
///
/// Used both for a control's outer margins (the distance it keeps from the
/// parent edges it is anchored to) and for client margins (the inset of a
/// container's client area inside its own rectangle).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Margins {
    /// Left spacing.
    pub left: i32,
    /// Top spacing.
    pub top: i32,
    /// Right spacing.
    pub right: i32,
    /// Bottom spacing.
    pub bottom: i32,
}

impl Margins {
    /// No spacing on any side.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create margins from the four sides.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same spacing on every side.
    pub const fn all(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Left plus right.
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Top plus bottom.
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

bitflags::bitflags! {
    /// Parent client edges a control keeps a fixed distance to when the parent resizes.
    ///
    /// On an axis where neither edge is anchored the control keeps its size
    /// and its position scales with the parent.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Anchors: u8 {
        /// Keep the distance to the parent's left edge.
        const LEFT   = 0b0001;
        /// Keep the distance to the parent's top edge.
        const TOP    = 0b0010;
        /// Keep the distance to the parent's right edge.
        const RIGHT  = 0b0100;
        /// Keep the distance to the parent's bottom edge.
        const BOTTOM = 0b1000;
    }
}

impl Anchors {
    /// Stretch with the parent on both axes.
    pub const ALL: Self = Self::all();
}

impl Default for Anchors {
    fn default() -> Self {
        Self::LEFT | Self::TOP
    }
}
