// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording host shared by the integration tests.

#![allow(dead_code, reason = "not every test file uses every helper")]

use std::collections::{HashMap, HashSet};

use kurbo::{Rect, Size};
use understory_floating::{AnchorRef, FloatingEnv, FrameId, TrackerId};
use understory_menu::{
    ListenerId, ListenerKind, ListenerTarget, MenuEnv, MenuEvent, MenuTree, SelectMode,
};

/// A host that records every frame, tracker, listener and focus call.
#[derive(Debug)]
pub struct Host {
    next: u64,
    pub frames: Vec<FrameId>,
    pub trackers: HashMap<TrackerId, u32>,
    pub listeners: HashMap<ListenerId, (ListenerTarget<u32>, ListenerKind)>,
    pub focused: Option<u32>,
    pub rects: HashMap<u32, Rect>,
    pub missing: HashSet<u32>,
    pub viewport: Rect,
    pub panel_size: Size,
}

impl Default for Host {
    fn default() -> Self {
        Self {
            next: 0,
            frames: Vec::new(),
            trackers: HashMap::new(),
            listeners: HashMap::new(),
            focused: None,
            rects: HashMap::new(),
            missing: HashSet::new(),
            viewport: Rect::new(0.0, 0.0, 800.0, 600.0),
            panel_size: Size::new(160.0, 200.0),
        }
    }
}

impl Host {
    fn bump(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    /// Trackers currently active for `panel`.
    pub fn trackers_for(&self, panel: u32) -> usize {
        self.trackers.values().filter(|p| **p == panel).count()
    }

    /// Whether a listener of `kind` on `target` is installed.
    pub fn has_listener(&self, target: ListenerTarget<u32>, kind: ListenerKind) -> bool {
        self.listeners.values().any(|l| *l == (target, kind))
    }
}

impl FloatingEnv<u32> for Host {
    fn anchor_rect(&self, element: &u32) -> Option<Rect> {
        if self.missing.contains(element) {
            return None;
        }
        Some(
            self.rects
                .get(element)
                .copied()
                .unwrap_or(Rect::new(40.0, 40.0, 200.0, 64.0)),
        )
    }

    fn floating_size(&self, _panel: &u32) -> Size {
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

    fn start_auto_update(&mut self, panel: &u32, _anchor: &AnchorRef<u32>) -> TrackerId {
        let id = TrackerId(self.bump());
        self.trackers.insert(id, *panel);
        id
    }

    fn stop_auto_update(&mut self, tracker: TrackerId) {
        self.trackers.remove(&tracker);
    }
}

impl MenuEnv<u32> for Host {
    fn add_listener(&mut self, target: ListenerTarget<u32>, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.bump());
        self.listeners.insert(id, (target, kind));
        id
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }

    fn focus(&mut self, element: &u32) {
        self.focused = Some(*element);
    }
}

/// Run animation frames until none are pending.
pub fn flush(tree: &mut MenuTree<u32>, host: &mut Host) -> Vec<MenuEvent<u32>> {
    let mut out = Vec::new();
    while !host.frames.is_empty() {
        for frame in std::mem::take(&mut host.frames) {
            tree.on_frame(frame, host, &mut out);
        }
    }
    out
}

pub const ROOT: u32 = 1;
pub const SUB: u32 = 2;
pub const SUB_SUB: u32 = 3;
pub const TRIGGER: u32 = 100;

pub const ITEM_1: u32 = 10;
pub const ITEM_2: u32 = 11;
pub const ITEM_3: u32 = 12;
pub const SUB_1: u32 = 20;
pub const SUB_2: u32 = 21;
pub const SUB_SUB_1: u32 = 30;

/// Three levels: root 1 (items 10, 11, 12), submenu 2 under item 10
/// (items 20, 21), and submenu 3 under item 21 (item 30).
pub fn three_levels(mode: SelectMode) -> MenuTree<u32> {
    let mut tree = MenuTree::default();
    tree.add_menu(ROOT, mode).unwrap();
    tree.add_item(ROOT, ITEM_1, "one").unwrap();
    tree.add_item(ROOT, ITEM_2, "two").unwrap();
    tree.add_item(ROOT, ITEM_3, "three").unwrap();
    tree.add_menu(SUB, mode).unwrap();
    tree.add_item(SUB, SUB_1, "sub one").unwrap();
    tree.add_item(SUB, SUB_2, "sub two").unwrap();
    tree.add_menu(SUB_SUB, mode).unwrap();
    tree.add_item(SUB_SUB, SUB_SUB_1, "deep").unwrap();
    tree.set_submenu(ITEM_1, SUB).unwrap();
    tree.set_submenu(SUB_2, SUB_SUB).unwrap();
    tree
}
