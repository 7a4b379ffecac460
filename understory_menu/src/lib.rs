// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_menu --heading-base-level=0

//! Understory Menu: headless menus with nested submenus.
//!
//! A [`MenuTree`] holds menus, their items, and the submenus items own. It
//! owns the behavior that makes menus feel right and leaves rendering and
//! event plumbing to the host:
//!
//! - Selection modes ([`SelectMode`]): plain actions, single selection, or
//!   checkable items.
//! - Keyboard traversal over enabled items, with submenu entry and exit.
//! - One explicit [`SubmenuState`] machine per item, with a hover-intent
//!   delay so the pointer can travel diagonally into a submenu.
//! - Derived accessibility attributes ([`AriaState`]).
//!
//! [`Dropdown`] and [`ContextMenu`] bind a top-level menu to a trigger
//! element and handle outside dismissal.
//!
//! ## Host contract
//!
//! The host implements [`MenuEnv`] (on top of
//! [`FloatingEnv`](understory_floating::FloatingEnv)) and feeds the tree:
//!
//! - animation frames to [`MenuTree::on_frame`],
//! - the clock to [`MenuTree::tick`], ideally at [`MenuTree::next_deadline`],
//! - tracker notifications to [`MenuTree::reposition`],
//! - pointer and focus transitions, with the related target, to
//!   [`MenuTree::pointer_enter`]/[`MenuTree::pointer_leave`] and
//!   [`MenuTree::focus_in`]/[`MenuTree::focus_out`],
//! - listener callbacks to the bindings' `on_*` methods.
//!
//! Operations push [`MenuEvent`]s into a caller-provided `Vec`. Forward them
//! to the bindings' `on_menu_events` so select-to-close and listener cleanup
//! happen.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_floating::{AnchorRef, FloatingEnv, FrameId, TrackerId};
//! use understory_menu::{
//!     ListenerId, ListenerKind, ListenerTarget, MenuEnv, MenuEvent, MenuKey, MenuTree, SelectMode,
//! };
//!
//! #[derive(Default)]
//! struct Host {
//!     next: u64,
//!     frames: Vec<FrameId>,
//! }
//!
//! impl FloatingEnv<u32> for Host {
//!     fn anchor_rect(&self, _element: &u32) -> Option<Rect> {
//!         Some(Rect::new(20.0, 20.0, 120.0, 44.0))
//!     }
//!     fn floating_size(&self, _panel: &u32) -> Size {
//!         Size::new(160.0, 96.0)
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
//! impl MenuEnv<u32> for Host {
//!     fn add_listener(&mut self, _target: ListenerTarget<u32>, _kind: ListenerKind) -> ListenerId {
//!         self.next += 1;
//!         ListenerId(self.next)
//!     }
//!     fn remove_listener(&mut self, _listener: ListenerId) {}
//!     fn focus(&mut self, _element: &u32) {}
//! }
//!
//! let mut host = Host::default();
//! let mut tree = MenuTree::default();
//! tree.add_menu(1, SelectMode::Single).unwrap();
//! tree.add_item(1, 10, "cut").unwrap();
//! tree.add_item(1, 11, "copy").unwrap();
//!
//! let mut events = Vec::new();
//! tree.show_menu(1, Some(AnchorRef::Element(99)), true, &mut host).unwrap();
//! for frame in std::mem::take(&mut host.frames) {
//!     tree.on_frame(frame, &mut host, &mut events);
//! }
//! assert!(tree.is_open(1));
//!
//! tree.key_down(1, MenuKey::End, 0, &mut host, &mut events);
//! tree.key_down(1, MenuKey::Enter, 0, &mut host, &mut events);
//! assert_eq!(
//!     events.last(),
//!     Some(&MenuEvent::Select { menu: 1, item: 11, value: "copy".into() })
//! );
//! assert!(tree.item(11).unwrap().is_selected());
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std` and `understory_floating/std`.
//! - `libm`: forwards to the `libm` features for `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod context_menu;
mod dropdown;
mod env;
mod error;
mod event;
mod item;
mod menu;
mod tree;

pub use config::{CONTEXT_MENU_LAYER, DEFAULT_HOVER_CLOSE_DELAY_MS, DROPDOWN_LAYER, MenuConfig};
pub use context_menu::ContextMenu;
pub use dropdown::Dropdown;
pub use env::{ListenerId, ListenerKind, ListenerTarget, MenuEnv};
pub use error::MenuError;
pub use event::{MenuEvent, MenuKey, PointerButton};
pub use item::{AriaState, ItemFilter, MenuItem, SubmenuState, SubmenuTrigger};
pub use menu::{Menu, SelectMode};
pub use tree::MenuTree;
