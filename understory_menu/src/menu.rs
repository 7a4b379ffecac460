// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu containers and their selection modes.

use alloc::vec::Vec;
use core::fmt::Debug;

use understory_floating::{FloatingPanel, OverlayLayer, PositionOptions};

/// How a menu reacts to item activation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectMode {
    /// Emit `Select` and change nothing.
    #[default]
    None,
    /// Select the activated item and deselect its siblings.
    Single,
    /// Toggle `checked` on the activated item.
    Multiple,
}

/// A menu container: an ordered list of items shown in a floating panel.
#[derive(Clone, Debug)]
pub struct Menu<K> {
    pub(crate) mode: SelectMode,
    pub(crate) items: Vec<K>,
    pub(crate) parent_item: Option<K>,
    pub(crate) panel: FloatingPanel<K>,
    pub(crate) layer: Option<OverlayLayer>,
}

impl<K: Copy + Debug> Menu<K> {
    pub(crate) fn new(key: K, mode: SelectMode, options: PositionOptions) -> Self {
        Self {
            mode,
            items: Vec::new(),
            parent_item: None,
            panel: FloatingPanel::new(key, options),
            layer: None,
        }
    }

    /// Selection mode.
    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    /// Items in display order.
    pub fn items(&self) -> &[K] {
        &self.items
    }

    /// The item owning this menu, if it is a submenu.
    pub fn parent_item(&self) -> Option<K> {
        self.parent_item
    }

    /// Whether this menu is some item's submenu.
    pub fn is_submenu(&self) -> bool {
        self.parent_item.is_some()
    }

    /// The floating panel presenting this menu.
    pub fn panel(&self) -> &FloatingPanel<K> {
        &self.panel
    }

    /// The `open` flag: set on the frame after showing, cleared on the frame after hiding.
    pub fn is_open(&self) -> bool {
        self.panel.is_visible()
    }

    /// Overlay layer the menu mounts into while shown, if any.
    pub fn overlay_layer(&self) -> Option<OverlayLayer> {
        self.layer
    }
}
