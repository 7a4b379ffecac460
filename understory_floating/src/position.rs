// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference geometry engine: place a floating box next to a reference box.
//!
//! The engine is a pure function of its inputs. It takes the reference
//! rectangle, the floating panel's measured size, the viewport and a set of
//! [`PositionOptions`], and returns one [`PlacementResult`].
//!
//! Middleware runs in a fixed order:
//!
//! 1. [`Offset`] moves each candidate away from (main axis) and along (cross
//!    axis) the reference edge.
//! 2. Candidate selection. With [`AutoPlacement`] the candidates are the
//!    allowed placements and the one with the least overflow wins (first wins
//!    ties). Otherwise the preferred placement is used, and with [`Flip`] its
//!    mirror is tried when the preferred side overflows on its main axis.
//! 3. [`Shift`] clamps the winner along the cross axis so it stays inside the
//!    viewport.
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_floating::{Placement, PositionOptions, compute_position};
//!
//! let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let button = Rect::new(100.0, 100.0, 180.0, 130.0);
//! let options = PositionOptions::new(Placement::BottomStart);
//!
//! let r = compute_position(button, Size::new(160.0, 200.0), viewport, &options).unwrap();
//! assert_eq!((r.x, r.y), (100.0, 130.0));
//! assert_eq!(r.placement, Placement::BottomStart);
//! ```

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::placement::{Alignment, Placement, Side, TransformOrigin};

/// CSS positioning strategy for a floating panel.
///
/// `Fixed` escapes the clipping and scroll context of ancestors; use it for
/// context menus and for submenus inside scrollable menus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `position: absolute`.
    #[default]
    Absolute,
    /// `position: fixed`.
    Fixed,
}

/// Distance between the panel and its reference.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Offset {
    /// Gap away from the reference edge.
    pub main_axis: f64,
    /// Slide along the reference edge, towards the aligned edge's interior.
    pub cross_axis: f64,
}

/// Try the opposite side when the preferred side overflows.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Flip {
    /// Viewport inset treated as overflow.
    pub padding: f64,
}

/// Keep the panel inside the viewport along the cross axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Shift {
    /// Viewport inset to keep clear.
    pub padding: f64,
}

/// Choose the best placement among an allowed set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutoPlacement {
    /// Allowed placements, in preference order.
    pub allowed: SmallVec<[Placement; 4]>,
}

impl AutoPlacement {
    /// Allow exactly these placements.
    pub fn new(allowed: impl IntoIterator<Item = Placement>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// The four corner placements used for pointer-anchored menus.
    #[must_use]
    pub fn corners() -> Self {
        Self::new([
            Placement::BottomStart,
            Placement::BottomEnd,
            Placement::TopStart,
            Placement::TopEnd,
        ])
    }
}

/// Configuration passed through to the geometry engine.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionOptions {
    /// Positioning strategy the host should apply.
    pub strategy: Strategy,
    /// Preferred placement. Ignored when `auto_placement` is set.
    pub placement: Placement,
    /// Offset middleware.
    pub offset: Offset,
    /// Flip middleware.
    pub flip: Option<Flip>,
    /// Shift middleware.
    pub shift: Option<Shift>,
    /// Auto-placement middleware.
    pub auto_placement: Option<AutoPlacement>,
}

impl PositionOptions {
    /// Options with only a preferred placement and no middleware.
    #[must_use]
    pub fn new(placement: Placement) -> Self {
        Self {
            strategy: Strategy::Absolute,
            placement,
            offset: Offset::default(),
            flip: None,
            shift: None,
            auto_placement: None,
        }
    }

    /// Set the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the offset.
    #[must_use]
    pub fn with_offset(mut self, main_axis: f64, cross_axis: f64) -> Self {
        self.offset = Offset {
            main_axis,
            cross_axis,
        };
        self
    }

    /// Enable flipping.
    #[must_use]
    pub fn with_flip(mut self, padding: f64) -> Self {
        self.flip = Some(Flip { padding });
        self
    }

    /// Enable shifting.
    #[must_use]
    pub fn with_shift(mut self, padding: f64) -> Self {
        self.shift = Some(Shift { padding });
        self
    }

    /// Enable auto-placement.
    #[must_use]
    pub fn with_auto_placement(mut self, auto: AutoPlacement) -> Self {
        self.auto_placement = Some(auto);
        self
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::new(Placement::BottomStart)
    }
}

/// One geometry computation: where to put the panel and on which side it ended up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementResult {
    /// Left edge, in the coordinate space of the reference rectangle.
    pub x: f64,
    /// Top edge, in the coordinate space of the reference rectangle.
    pub y: f64,
    /// The placement actually used after flip/auto-placement.
    pub placement: Placement,
}

impl PlacementResult {
    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The panel rectangle for a panel of `size`.
    #[must_use]
    pub fn rect(&self, size: Size) -> Rect {
        Rect::from_origin_size(self.origin(), size)
    }

    /// Transform origin derived from the placement.
    #[must_use]
    pub fn transform_origin(&self) -> TransformOrigin {
        self.placement.transform_origin()
    }
}

/// Failures of the geometry engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The reference rectangle has a NaN or infinite coordinate.
    #[error("reference rectangle is not finite")]
    NonFiniteReference,
    /// The floating size has a NaN, infinite or negative dimension.
    #[error("floating size is not finite and non-negative")]
    InvalidFloatingSize,
    /// Auto-placement was requested with an empty allowed set.
    #[error("auto-placement has no allowed placements")]
    NoAllowedPlacement,
}

/// Compute where a panel of size `floating` goes relative to `reference`.
///
/// See the [module documentation](self) for the middleware order.
pub fn compute_position(
    reference: Rect,
    floating: Size,
    viewport: Rect,
    options: &PositionOptions,
) -> Result<PlacementResult, PositionError> {
    let finite_ref = [reference.x0, reference.y0, reference.x1, reference.y1]
        .iter()
        .all(|v| v.is_finite());
    if !finite_ref {
        return Err(PositionError::NonFiniteReference);
    }
    let valid_size = floating.width.is_finite()
        && floating.height.is_finite()
        && floating.width >= 0.0
        && floating.height >= 0.0;
    if !valid_size {
        return Err(PositionError::InvalidFloatingSize);
    }

    let (placement, origin) = if let Some(auto) = &options.auto_placement {
        if auto.allowed.is_empty() {
            return Err(PositionError::NoAllowedPlacement);
        }
        let padding = options.flip.map_or(0.0, |f| f.padding);
        best_of(auto.allowed.iter().copied(), |p| {
            let origin = base_origin(reference, floating, p, options.offset);
            let o = overflow(Rect::from_origin_size(origin, floating), viewport, padding);
            (origin, o.total())
        })
    } else if let Some(flip) = options.flip {
        let preferred = options.placement;
        best_of([preferred, preferred.flipped()], |p| {
            let origin = base_origin(reference, floating, p, options.offset);
            let o = overflow(Rect::from_origin_size(origin, floating), viewport, flip.padding);
            (origin, o.main_axis(p.side()))
        })
    } else {
        let p = options.placement;
        (p, base_origin(reference, floating, p, options.offset))
    };

    let origin = match options.shift {
        Some(shift) => shift_into(origin, floating, placement.side(), viewport, shift.padding),
        None => origin,
    };

    Ok(PlacementResult {
        x: origin.x,
        y: origin.y,
        placement,
    })
}

/// Pick the first candidate with zero overflow, else the one with the least.
fn best_of(
    candidates: impl IntoIterator<Item = Placement>,
    mut eval: impl FnMut(Placement) -> (Point, f64),
) -> (Placement, Point) {
    let mut best: Option<(Placement, Point, f64)> = None;
    for p in candidates {
        let (origin, o) = eval(p);
        if o <= 0.0 {
            return (p, origin);
        }
        if best.is_none_or(|(_, _, b)| o < b) {
            best = Some((p, origin, o));
        }
    }
    match best {
        Some((p, origin, _)) => (p, origin),
        // Callers always pass at least one candidate.
        None => (Placement::BottomStart, Point::ZERO),
    }
}

fn base_origin(reference: Rect, floating: Size, placement: Placement, offset: Offset) -> Point {
    let side = placement.side();
    let alignment = placement.alignment();
    let cross_offset = match alignment {
        Some(Alignment::End) => -offset.cross_axis,
        _ => offset.cross_axis,
    };
    if side.is_vertical() {
        let x = match alignment {
            None => reference.center().x - floating.width / 2.0,
            Some(Alignment::Start) => reference.x0,
            Some(Alignment::End) => reference.x1 - floating.width,
        } + cross_offset;
        let y = match side {
            Side::Top => reference.y0 - floating.height - offset.main_axis,
            _ => reference.y1 + offset.main_axis,
        };
        Point::new(x, y)
    } else {
        let y = match alignment {
            None => reference.center().y - floating.height / 2.0,
            Some(Alignment::Start) => reference.y0,
            Some(Alignment::End) => reference.y1 - floating.height,
        } + cross_offset;
        let x = match side {
            Side::Left => reference.x0 - floating.width - offset.main_axis,
            _ => reference.x1 + offset.main_axis,
        };
        Point::new(x, y)
    }
}

/// Per-side overflow of a rectangle past the padded viewport. Positive means clipped.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Overflow {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Overflow {
    fn total(&self) -> f64 {
        self.top + self.right + self.bottom + self.left
    }

    fn main_axis(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

fn overflow(rect: Rect, viewport: Rect, padding: f64) -> Overflow {
    Overflow {
        top: (viewport.y0 + padding - rect.y0).max(0.0),
        right: (rect.x1 - (viewport.x1 - padding)).max(0.0),
        bottom: (rect.y1 - (viewport.y1 - padding)).max(0.0),
        left: (viewport.x0 + padding - rect.x0).max(0.0),
    }
}

fn shift_into(origin: Point, floating: Size, side: Side, viewport: Rect, padding: f64) -> Point {
    // When the panel is larger than the viewport the leading edge wins.
    if side.is_vertical() {
        let x = origin
            .x
            .min(viewport.x1 - padding - floating.width)
            .max(viewport.x0 + padding);
        Point::new(x, origin.y)
    } else {
        let y = origin
            .y
            .min(viewport.y1 - padding - floating.height)
            .max(viewport.y0 + padding);
        Point::new(origin.x, y)
    }
}
