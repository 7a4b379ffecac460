// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for a [`MenuTree`](crate::MenuTree).

use understory_floating::{AutoPlacement, OverlayLayer, Placement, PositionOptions, Strategy};

/// Default hover-intent delay before a left submenu closes, in milliseconds.
pub const DEFAULT_HOVER_CLOSE_DELAY_MS: u64 = 150;

/// Overlay layer dropdown menus mount into while shown.
pub const DROPDOWN_LAYER: OverlayLayer = OverlayLayer::new(0);

/// Overlay layer context menus mount into while shown.
///
/// At most one menu in this layer is visible at a time.
pub const CONTEXT_MENU_LAYER: OverlayLayer = OverlayLayer::new(1);

/// Configuration shared by every menu in a tree.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuConfig {
    /// Delay between leaving an item's subtree and its submenu closing.
    pub hover_close_delay_ms: u64,
    /// Positioning for new top-level menus.
    pub menu: PositionOptions,
    /// Positioning for menus attached as submenus.
    pub submenu: PositionOptions,
    /// Positioning applied by [`ContextMenu`](crate::ContextMenu).
    pub context_menu: PositionOptions,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            hover_close_delay_ms: DEFAULT_HOVER_CLOSE_DELAY_MS,
            menu: PositionOptions::new(Placement::BottomStart)
                .with_offset(4.0, 0.0)
                .with_flip(8.0)
                .with_shift(8.0),
            // Fixed so a submenu escapes a scrolling parent menu.
            submenu: PositionOptions::new(Placement::RightStart)
                .with_strategy(Strategy::Fixed)
                .with_flip(8.0)
                .with_shift(8.0),
            context_menu: PositionOptions::new(Placement::BottomStart)
                .with_strategy(Strategy::Fixed)
                .with_auto_placement(AutoPlacement::corners()),
        }
    }
}
