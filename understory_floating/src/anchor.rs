// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchors: the thing a floating panel is positioned against.

use kurbo::{Point, Rect};

/// A synthetic anchor at a single point, such as a right-click location.
///
/// Its bounding rectangle has zero size, so the panel's edge meets the point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VirtualPoint {
    /// X in viewport (client) coordinates.
    pub x: f64,
    /// Y in viewport (client) coordinates.
    pub y: f64,
}

impl VirtualPoint {
    /// Create a virtual point at client coordinates `(x, y)`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The zero-size rectangle at this point.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        Rect::from_points(self.point(), self.point())
    }

    /// This point as a [`Point`].
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<Point> for VirtualPoint {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// What a panel is anchored to for one show cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AnchorRef<K> {
    /// A host element, resolved to a rectangle through
    /// [`FloatingEnv::anchor_rect`](crate::FloatingEnv::anchor_rect).
    Element(K),
    /// A synthetic point.
    Point(VirtualPoint),
}

impl<K> AnchorRef<K> {
    /// Anchor at client coordinates `(x, y)`.
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Self {
        Self::Point(VirtualPoint::new(x, y))
    }

    /// The element key, if this anchor is an element.
    #[must_use]
    pub fn element(&self) -> Option<&K> {
        match self {
            Self::Element(k) => Some(k),
            Self::Point(_) => None,
        }
    }

    /// Resolve the anchor to a bounding rectangle.
    ///
    /// `lookup` is consulted for element anchors; it returns `None` when the
    /// element is not laid out or no longer exists.
    pub fn resolve(&self, lookup: impl FnOnce(&K) -> Option<Rect>) -> Option<Rect> {
        match self {
            Self::Element(k) => lookup(k),
            Self::Point(p) => Some(p.bounding_rect()),
        }
    }
}
