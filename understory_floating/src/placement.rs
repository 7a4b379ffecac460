// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placements: where a floating panel sits relative to its anchor.

use core::fmt;
use core::str::FromStr;

/// The side of the anchor a panel is placed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above the anchor.
    Top,
    /// Right of the anchor.
    Right,
    /// Below the anchor.
    Bottom,
    /// Left of the anchor.
    Left,
}

impl Side {
    /// The side across the anchor.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns `true` for [`Side::Top`] and [`Side::Bottom`].
    ///
    /// Panels on a vertical side move along the x axis when aligned or shifted.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Alignment of a panel along the anchor's edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Align with the anchor's leading edge (left or top).
    Start,
    /// Align with the anchor's trailing edge (right or bottom).
    End,
}

/// One of the twelve compass placements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Above, centered.
    Top,
    /// Above, aligned to the leading edge.
    TopStart,
    /// Above, aligned to the trailing edge.
    TopEnd,
    /// Right, centered.
    Right,
    /// Right, aligned to the top edge.
    RightStart,
    /// Right, aligned to the bottom edge.
    RightEnd,
    /// Below, centered.
    Bottom,
    /// Below, aligned to the leading edge.
    BottomStart,
    /// Below, aligned to the trailing edge.
    BottomEnd,
    /// Left, centered.
    Left,
    /// Left, aligned to the top edge.
    LeftStart,
    /// Left, aligned to the bottom edge.
    LeftEnd,
}

impl Placement {
    /// Every placement, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Top,
        Self::TopStart,
        Self::TopEnd,
        Self::Right,
        Self::RightStart,
        Self::RightEnd,
        Self::Bottom,
        Self::BottomStart,
        Self::BottomEnd,
        Self::Left,
        Self::LeftStart,
        Self::LeftEnd,
    ];

    /// Build a placement from a side and optional alignment.
    #[must_use]
    pub const fn from_parts(side: Side, alignment: Option<Alignment>) -> Self {
        match (side, alignment) {
            (Side::Top, None) => Self::Top,
            (Side::Top, Some(Alignment::Start)) => Self::TopStart,
            (Side::Top, Some(Alignment::End)) => Self::TopEnd,
            (Side::Right, None) => Self::Right,
            (Side::Right, Some(Alignment::Start)) => Self::RightStart,
            (Side::Right, Some(Alignment::End)) => Self::RightEnd,
            (Side::Bottom, None) => Self::Bottom,
            (Side::Bottom, Some(Alignment::Start)) => Self::BottomStart,
            (Side::Bottom, Some(Alignment::End)) => Self::BottomEnd,
            (Side::Left, None) => Self::Left,
            (Side::Left, Some(Alignment::Start)) => Self::LeftStart,
            (Side::Left, Some(Alignment::End)) => Self::LeftEnd,
        }
    }

    /// The anchor side this placement sits on.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::Top | Self::TopStart | Self::TopEnd => Side::Top,
            Self::Right | Self::RightStart | Self::RightEnd => Side::Right,
            Self::Bottom | Self::BottomStart | Self::BottomEnd => Side::Bottom,
            Self::Left | Self::LeftStart | Self::LeftEnd => Side::Left,
        }
    }

    /// The alignment along the anchor's edge; `None` means centered.
    #[must_use]
    pub const fn alignment(self) -> Option<Alignment> {
        match self {
            Self::Top | Self::Right | Self::Bottom | Self::Left => None,
            Self::TopStart | Self::RightStart | Self::BottomStart | Self::LeftStart => {
                Some(Alignment::Start)
            }
            Self::TopEnd | Self::RightEnd | Self::BottomEnd | Self::LeftEnd => Some(Alignment::End),
        }
    }

    /// The same alignment on the opposite side. Used by the flip middleware.
    #[must_use]
    pub const fn flipped(self) -> Self {
        Self::from_parts(self.side().opposite(), self.alignment())
    }

    /// The kebab-case name, e.g. `"bottom-start"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::Right => "right",
            Self::RightStart => "right-start",
            Self::RightEnd => "right-end",
            Self::Bottom => "bottom",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
            Self::Left => "left",
            Self::LeftStart => "left-start",
            Self::LeftEnd => "left-end",
        }
    }

    /// The transform origin a scale/fade transition should grow from.
    #[must_use]
    pub const fn transform_origin(self) -> TransformOrigin {
        match self.side() {
            Side::Top => TransformOrigin::CenterBottom,
            Side::Bottom => TransformOrigin::CenterTop,
            Side::Left => TransformOrigin::RightCenter,
            Side::Right => TransformOrigin::LeftCenter,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown placement name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown placement name")]
pub struct ParsePlacementError;

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(ParsePlacementError)
    }
}

/// The point a panel's show/hide transition scales from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransformOrigin {
    /// `center`, used before any placement has been computed.
    #[default]
    Center,
    /// `center bottom`, for panels above their anchor.
    CenterBottom,
    /// `center top`, for panels below their anchor.
    CenterTop,
    /// `right center`, for panels left of their anchor.
    RightCenter,
    /// `left center`, for panels right of their anchor.
    LeftCenter,
}

impl TransformOrigin {
    /// Map an optional placement to its origin; no placement yields [`TransformOrigin::Center`].
    #[must_use]
    pub fn for_placement(placement: Option<Placement>) -> Self {
        placement.map_or(Self::Center, Placement::transform_origin)
    }

    /// The CSS `transform-origin` value.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::CenterBottom => "center bottom",
            Self::CenterTop => "center top",
            Self::RightCenter => "right center",
            Self::LeftCenter => "left center",
        }
    }
}
