// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless host for driving menus from a terminal.
//!
//! Elements are named by `&'static str`. Frames, trackers and listeners are
//! recorded rather than scheduled; [`HeadlessHost::run_frames`] and
//! [`HeadlessHost::advance`] stand in for the browser's event loop.

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use understory_floating::{AnchorRef, FloatingEnv, FrameId, TrackerId};
use understory_menu::{ListenerId, ListenerKind, ListenerTarget, MenuEnv, MenuEvent, MenuTree};

/// Element key used by the demos.
pub type Key = &'static str;

/// A recording host.
#[derive(Debug)]
pub struct HeadlessHost {
    now: u64,
    next: u64,
    frames: Vec<FrameId>,
    trackers: HashMap<TrackerId, Key>,
    listeners: HashMap<ListenerId, (ListenerTarget<Key>, ListenerKind)>,
    rects: HashMap<Key, Rect>,
    viewport: Rect,
    panel_size: Size,
    focused: Option<Key>,
}

impl HeadlessHost {
    /// Create a host with the given viewport and a default panel size.
    pub fn new(viewport: Rect) -> Self {
        Self {
            now: 0,
            next: 0,
            frames: Vec::new(),
            trackers: HashMap::new(),
            listeners: HashMap::new(),
            rects: HashMap::new(),
            viewport,
            panel_size: Size::new(180.0, 120.0),
            focused: None,
        }
    }

    /// Lay out `element` at `rect`.
    pub fn place(&mut self, element: Key, rect: Rect) {
        self.rects.insert(element, rect);
    }

    /// Size every panel measures at.
    pub fn set_panel_size(&mut self, size: Size) {
        self.panel_size = size;
    }

    /// Current time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// The element holding keyboard focus.
    pub fn focused(&self) -> Option<Key> {
        self.focused
    }

    /// Number of live position trackers.
    pub fn active_trackers(&self) -> usize {
        self.trackers.len()
    }

    /// Number of installed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run animation frames until none are pending, returning the events they produced.
    pub fn run_frames(&mut self, tree: &mut MenuTree<Key>) -> Vec<MenuEvent<Key>> {
        let mut out = Vec::new();
        while !self.frames.is_empty() {
            for frame in core::mem::take(&mut self.frames) {
                tree.on_frame(frame, self, &mut out);
            }
        }
        out
    }

    /// Let `ms` milliseconds pass, firing due hover-intent timers.
    pub fn advance(&mut self, ms: u64, tree: &mut MenuTree<Key>) -> bool {
        self.now += ms;
        let now = self.now;
        tree.tick(now, self)
    }

    fn bump(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

impl FloatingEnv<Key> for HeadlessHost {
    fn anchor_rect(&self, element: &Key) -> Option<Rect> {
        self.rects.get(element).copied()
    }

    fn floating_size(&self, _panel: &Key) -> Size {
        self.panel_size
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.bump());
        self.frames.push(id);
        id
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.frames.retain(|f| *f != frame);
    }

    fn start_auto_update(&mut self, panel: &Key, _anchor: &AnchorRef<Key>) -> TrackerId {
        let id = TrackerId(self.bump());
        self.trackers.insert(id, *panel);
        id
    }

    fn stop_auto_update(&mut self, tracker: TrackerId) {
        self.trackers.remove(&tracker);
    }
}

impl MenuEnv<Key> for HeadlessHost {
    fn add_listener(&mut self, target: ListenerTarget<Key>, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.bump());
        self.listeners.insert(id, (target, kind));
        id
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }

    fn focus(&mut self, element: &Key) {
        self.focused = Some(*element);
    }
}

/// Print events, one per line.
pub fn print_events(events: &[MenuEvent<Key>]) {
    for event in events {
        println!("  event: {event:?}");
    }
}
