// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_floating --heading-base-level=0

//! Understory Floating: headless anchored panels for popovers, menus and tooltips.
//!
//! A floating panel is an element positioned against an anchor: a trigger
//! button, a parent menu item, or a synthetic point such as a right-click
//! location. This crate owns the bookkeeping such a panel needs and leaves
//! everything platform-specific to the host:
//!
//! - [`compute_position`]: a reference geometry engine with offset, flip,
//!   shift and auto-placement middleware over Kurbo rectangles.
//! - [`FloatingPanel`]: per-panel state. One placement per `show`, at most one
//!   live position tracker, and visibility that flips on the next animation
//!   frame rather than synchronously.
//! - [`Positionable`]: the show/hide/reposition capability that menu-like
//!   components compose.
//! - [`FloatingEnv`]: the host trait supplying geometry, animation frames and
//!   tracker subscriptions.
//! - [`OverlayHost`]: an explicit registry of mounted overlays grouped by
//!   [`OverlayLayer`].
//!
//! ## Host-driven time
//!
//! Nothing here blocks or spawns. When the panel needs an animation frame it
//! asks the host for a [`FrameId`] and waits for the host to call
//! [`FloatingPanel::on_frame`]. When it needs position tracking it asks for a
//! [`TrackerId`] and waits for the host to call
//! [`FloatingPanel::reposition`]. Every handle is handed back for
//! cancellation, and the panel cancels superseded work itself, so overlapping
//! `show` calls leave exactly one tracker alive.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_floating::{
//!     AnchorRef, FloatingEnv, FloatingPanel, FrameId, Placement, PositionOptions, TrackerId,
//! };
//!
//! #[derive(Default)]
//! struct Host {
//!     frames: Vec<FrameId>,
//!     next: u64,
//! }
//!
//! impl FloatingEnv<u32> for Host {
//!     fn anchor_rect(&self, _element: &u32) -> Option<Rect> {
//!         Some(Rect::new(100.0, 100.0, 180.0, 130.0))
//!     }
//!     fn floating_size(&self, _panel: &u32) -> Size {
//!         Size::new(160.0, 120.0)
//!     }
//!     fn viewport(&self) -> Rect {
//!         Rect::new(0.0, 0.0, 800.0, 600.0)
//!     }
//!     fn request_frame(&mut self) -> FrameId {
//!         self.next += 1;
//!         self.frames.push(FrameId(self.next));
//!         FrameId(self.next)
//!     }
//!     fn cancel_frame(&mut self, frame: FrameId) {
//!         self.frames.retain(|f| *f != frame);
//!     }
//!     fn start_auto_update(&mut self, _panel: &u32, _anchor: &AnchorRef<u32>) -> TrackerId {
//!         self.next += 1;
//!         TrackerId(self.next)
//!     }
//!     fn stop_auto_update(&mut self, _tracker: TrackerId) {}
//! }
//!
//! let mut host = Host::default();
//! let mut panel = FloatingPanel::new(1, PositionOptions::new(Placement::BottomStart));
//!
//! assert!(panel.show(Some(AnchorRef::Element(2)), true, &mut host));
//! // Positioned immediately, visible only once the frame runs.
//! assert_eq!(panel.style().top, 130.0);
//! assert!(!panel.is_visible());
//!
//! for frame in std::mem::take(&mut host.frames) {
//!     panel.on_frame(frame);
//! }
//! assert!(panel.is_visible());
//! assert_eq!(panel.transform_origin().as_css(), "center top");
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod anchor;
mod env;
mod overlay;
mod panel;
mod placement;
pub mod position;

pub use anchor::{AnchorRef, VirtualPoint};
pub use env::{FloatingEnv, FrameId, TrackerId};
pub use overlay::{OverlayError, OverlayHost, OverlayLayer};
pub use panel::{FloatingPanel, PanelStyle, Positionable};
pub use placement::{Alignment, ParsePlacementError, Placement, Side, TransformOrigin};
pub use position::{
    AutoPlacement, Flip, Offset, PlacementResult, PositionError, PositionOptions, Shift, Strategy,
    compute_position,
};
