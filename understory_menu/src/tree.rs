// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The menu tree: menus, items and their submenu state machines.
//!
//! ## Structure
//!
//! Menus own an ordered list of items; an item owns at most one submenu.
//! Removing an item removes its submenu, and removing a submenu degrades its
//! owning item back to a plain item. Every node is addressed by a host key.
//!
//! ## Hover and focus
//!
//! Pointer and focus movement is reported as enter/leave pairs with the
//! related target, like DOM `mouseover`/`mouseout`. A leave applies to the
//! left node's item and every ancestor item whose subtree the related target
//! is outside of, so travelling from an item into its submenu never starts a
//! close. A leave arms the item's hover-intent timer; re-entry before
//! [`MenuTree::tick`] observes it expire cancels the close.
//!
//! Focus moves made through [`MenuTree::focus_item`] (keyboard traversal)
//! update the focused item before the host echoes the focus change, so the
//! echo is ignored and keyboard traversal never opens a submenu by itself.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use log::{debug, trace};
use smallvec::SmallVec;
use understory_floating::{AnchorRef, FrameId, OverlayHost, OverlayLayer, PositionOptions};
use understory_timing::earliest_deadline;

use crate::config::MenuConfig;
use crate::env::MenuEnv;
use crate::error::MenuError;
use crate::event::{MenuEvent, MenuKey};
use crate::item::{AriaState, ItemFilter, MenuItem, SubmenuState, SubmenuTrigger};
use crate::menu::{Menu, SelectMode};

type Chain<K> = SmallVec<[K; 4]>;

/// A forest of menus with nested submenus.
#[derive(Debug)]
pub struct MenuTree<K> {
    config: MenuConfig,
    menus: HashMap<K, Menu<K>>,
    items: HashMap<K, MenuItem<K>>,
    focused: Option<K>,
    /// Submenus whose next `Select` closes them.
    close_on_select: HashSet<K>,
    overlays: OverlayHost<K>,
}

impl<K: Copy + Eq + Hash + Debug> Default for MenuTree<K> {
    fn default() -> Self {
        Self::new(MenuConfig::default())
    }
}

impl<K: Copy + Eq + Hash + Debug> MenuTree<K> {
    /// Create an attached tree with its own overlay host.
    pub fn new(config: MenuConfig) -> Self {
        Self::with_overlay_host(config, OverlayHost::attached())
    }

    /// Create a tree that mounts top-level menus into `overlays`.
    ///
    /// The tree is attached as long as `overlays` is.
    pub fn with_overlay_host(config: MenuConfig, overlays: OverlayHost<K>) -> Self {
        Self {
            config,
            menus: HashMap::new(),
            items: HashMap::new(),
            focused: None,
            close_on_select: HashSet::new(),
            overlays,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// The overlay host.
    pub fn overlays(&self) -> &OverlayHost<K> {
        &self.overlays
    }

    /// Whether the tree is attached.
    pub fn is_attached(&self) -> bool {
        self.overlays.is_attached()
    }

    // --- structure ---

    /// Add an empty top-level menu.
    pub fn add_menu(&mut self, key: K, mode: SelectMode) -> Result<(), MenuError<K>> {
        self.check_new_key(key)?;
        let menu = Menu::new(key, mode, self.config.menu.clone());
        self.menus.insert(key, menu);
        Ok(())
    }

    /// Append an item to `menu`.
    pub fn add_item(
        &mut self,
        menu: K,
        key: K,
        value: impl Into<String>,
    ) -> Result<(), MenuError<K>> {
        self.check_new_key(key)?;
        let container = self.menus.get_mut(&menu).ok_or(MenuError::UnknownMenu(menu))?;
        container.items.push(key);
        self.items.insert(key, MenuItem::new(menu, value.into()));
        Ok(())
    }

    /// Make `submenu` the submenu of `item`.
    ///
    /// The submenu switches to the configured submenu positioning and stops
    /// mounting as an overlay of its own.
    pub fn set_submenu(&mut self, item: K, submenu: K) -> Result<(), MenuError<K>> {
        let it = self.items.get(&item).ok_or(MenuError::UnknownItem(item))?;
        if it.submenu.is_some() {
            return Err(MenuError::SubmenuAlreadySet(item));
        }
        let sub = self
            .menus
            .get(&submenu)
            .ok_or(MenuError::UnknownMenu(submenu))?;
        if let Some(owner) = sub.parent_item {
            return Err(MenuError::SubmenuAlreadyOwned { submenu, owner });
        }
        if self.contains(submenu, item) {
            return Err(MenuError::SubmenuCycle { item, submenu });
        }

        self.overlays.unmount(&submenu);
        let options = self.config.submenu.clone();
        if let Some(sub) = self.menus.get_mut(&submenu) {
            sub.parent_item = Some(item);
            sub.layer = None;
            sub.panel.set_options(options);
        }
        if let Some(it) = self.items.get_mut(&item) {
            it.submenu = Some(submenu);
        }
        Ok(())
    }

    /// Remove `item`, and its submenu with it.
    ///
    /// A removed submenu that was visible emits `Hide`.
    pub fn remove_item<E: MenuEnv<K>>(
        &mut self,
        item: K,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> Result<(), MenuError<K>> {
        let menu = self
            .items
            .get(&item)
            .ok_or(MenuError::UnknownItem(item))?
            .menu;
        self.close_submenu(item, env);
        if let Some(m) = self.menus.get_mut(&menu) {
            m.items.retain(|k| *k != item);
        }
        self.drop_item(item, env, out);
        Ok(())
    }

    /// Remove `menu` and all of its items.
    ///
    /// If `menu` is a submenu, its owning item stays and degrades to a plain
    /// item: no popup, no expanded state, hovering does nothing.
    ///
    /// A visible menu emits `Hide` right away, since no frame will land for
    /// it anymore. A top-level menu still waiting for its show frame emits
    /// `ShowCancelled`.
    pub fn remove_menu<E: MenuEnv<K>>(
        &mut self,
        menu: K,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> Result<(), MenuError<K>> {
        let parent = self
            .menus
            .get(&menu)
            .ok_or(MenuError::UnknownMenu(menu))?
            .parent_item;
        match parent {
            Some(parent) => {
                self.close_submenu(parent, env);
                if let Some(p) = self.items.get_mut(&parent) {
                    p.degrade();
                    debug!("item {parent:?}: submenu {menu:?} removed");
                }
            }
            None => {
                self.close_menu(menu, env, out);
            }
        }
        self.drop_menu(menu, env, out);
        Ok(())
    }

    /// Enable or disable an item.
    pub fn set_disabled(&mut self, item: K, disabled: bool) -> Result<(), MenuError<K>> {
        self.item_mut(item)?.disabled = disabled;
        Ok(())
    }

    /// Set an item's checked flag.
    pub fn set_checked(&mut self, item: K, checked: bool) -> Result<(), MenuError<K>> {
        self.item_mut(item)?.checked = checked;
        Ok(())
    }

    /// Set an item's selected flag.
    ///
    /// In a `Single` mode menu, selecting an item deselects its siblings.
    pub fn set_selected(&mut self, item: K, selected: bool) -> Result<(), MenuError<K>> {
        let menu = self.item_mut(item)?.menu;
        if selected && self.menus.get(&menu).is_some_and(|m| m.mode == SelectMode::Single) {
            self.select_only(menu, item);
        } else {
            self.item_mut(item)?.selected = selected;
        }
        Ok(())
    }

    /// Change a menu's selection mode.
    ///
    /// Switching to `Single` keeps only the first selected item.
    pub fn set_mode(&mut self, menu: K, mode: SelectMode) -> Result<(), MenuError<K>> {
        let m = self.menus.get_mut(&menu).ok_or(MenuError::UnknownMenu(menu))?;
        m.mode = mode;
        if mode == SelectMode::Single {
            let mut seen = false;
            for k in &m.items {
                if let Some(it) = self.items.get_mut(k) {
                    it.selected &= !seen;
                    seen |= it.selected;
                }
            }
        }
        Ok(())
    }

    /// Replace a menu's positioning options.
    pub fn set_position_options(
        &mut self,
        menu: K,
        options: PositionOptions,
    ) -> Result<(), MenuError<K>> {
        let m = self.menus.get_mut(&menu).ok_or(MenuError::UnknownMenu(menu))?;
        m.panel.set_options(options);
        Ok(())
    }

    /// Choose the overlay layer a top-level menu mounts into while shown.
    pub fn set_overlay_layer(
        &mut self,
        menu: K,
        layer: Option<OverlayLayer>,
    ) -> Result<(), MenuError<K>> {
        let m = self.menus.get_mut(&menu).ok_or(MenuError::UnknownMenu(menu))?;
        if m.parent_item.is_some() {
            return Err(MenuError::NotTopLevel(menu));
        }
        m.layer = layer;
        Ok(())
    }

    // --- queries ---

    /// A menu by key.
    pub fn menu(&self, menu: K) -> Option<&Menu<K>> {
        self.menus.get(&menu)
    }

    /// An item by key.
    pub fn item(&self, item: K) -> Option<&MenuItem<K>> {
        self.items.get(&item)
    }

    /// Items of `menu` passing `filter`, in display order.
    ///
    /// Unknown menus have no items.
    pub fn items(&self, menu: K, filter: ItemFilter) -> Vec<K> {
        let Some(m) = self.menus.get(&menu) else {
            return Vec::new();
        };
        m.items
            .iter()
            .copied()
            .filter(|k| self.items.get(k).is_some_and(|it| filter.matches(it)))
            .collect()
    }

    /// The item the tree believes has focus.
    pub fn focused(&self) -> Option<K> {
        self.focused
    }

    /// Whether `menu`'s open flag is set.
    pub fn is_open(&self, menu: K) -> bool {
        self.menus.get(&menu).is_some_and(Menu::is_open)
    }

    /// Whether `menu` is open or about to open, and not about to close.
    pub fn is_showing(&self, menu: K) -> bool {
        self.menus.get(&menu).is_some_and(|m| m.panel.is_showing())
    }

    /// Submenu state of `item`.
    pub fn submenu_state(&self, item: K) -> Option<SubmenuState> {
        self.items.get(&item).map(|it| it.state)
    }

    /// Accessibility attributes of `item`.
    pub fn aria(&self, item: K) -> Option<AriaState> {
        let it = self.items.get(&item)?;
        let mode = self.menus.get(&it.menu).map_or(SelectMode::None, |m| m.mode);
        let has_popup = it.submenu.is_some_and(|s| self.menus.contains_key(&s));
        Some(AriaState {
            has_popup,
            expanded: has_popup.then_some(it.state.is_expanded()),
            checked: match mode {
                SelectMode::None => None,
                SelectMode::Single => Some(it.selected),
                SelectMode::Multiple => Some(it.checked),
            },
            disabled: it.disabled,
        })
    }

    /// Whether `node` (a menu or an item) is `menu` or lies inside its subtree.
    pub fn contains(&self, menu: K, node: K) -> bool {
        self.menu_chain(node).contains(&menu)
    }

    /// The top-level menu above `node`.
    pub fn root_of(&self, node: K) -> Option<K> {
        self.menu_chain(node).last().copied()
    }

    /// The earliest pending hover-intent deadline, for scheduling the next [`tick`](Self::tick).
    pub fn next_deadline(&self) -> Option<u64> {
        earliest_deadline(self.items.values().map(|it| &it.close_timer))
    }

    // --- showing and hiding ---

    /// Show a top-level menu anchored to `anchor`.
    ///
    /// Returns `Ok(false)` if the anchor is missing or cannot be resolved.
    /// The open flag flips, and `Show` is emitted, from [`on_frame`](Self::on_frame).
    pub fn show_menu<E: MenuEnv<K>>(
        &mut self,
        menu: K,
        anchor: Option<AnchorRef<K>>,
        track: bool,
        env: &mut E,
    ) -> Result<bool, MenuError<K>> {
        if !self.overlays.is_attached() {
            return Err(MenuError::Detached);
        }
        let m = self.menus.get_mut(&menu).ok_or(MenuError::UnknownMenu(menu))?;
        if m.parent_item.is_some() {
            return Err(MenuError::NotTopLevel(menu));
        }
        if !m.panel.show(anchor, track, env) {
            // A failed placement leaves the panel hiding.
            if !m.panel.is_showing() {
                self.retract(menu, env);
            }
            return Ok(false);
        }
        if let Some(layer) = m.layer {
            self.overlays
                .mount(layer, menu)
                .map_err(|_| MenuError::Detached)?;
        }
        debug!("menu {menu:?}: showing");
        Ok(true)
    }

    /// Close `menu` and every submenu below it.
    ///
    /// Closing a submenu closes it through its owning item. A top-level menu
    /// whose show frame has not landed yet never becomes visible and emits
    /// `ShowCancelled` instead of a later `Hide`. Returns `false` if there
    /// was nothing to close.
    pub fn close_menu<E: MenuEnv<K>>(
        &mut self,
        menu: K,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        let Some(m) = self.menus.get(&menu) else {
            return false;
        };
        if let Some(parent) = m.parent_item {
            return self.close_submenu(parent, env);
        }
        let cancels_show = !m.panel.is_visible() && m.panel.is_showing();
        self.retract(menu, env);
        let hidden = self
            .menus
            .get_mut(&menu)
            .is_some_and(|m| m.panel.hide(env));
        if cancels_show {
            debug!("menu {menu:?}: show cancelled");
            out.push(MenuEvent::ShowCancelled { menu });
        } else if hidden {
            debug!("menu {menu:?}: closing");
        }
        hidden
    }

    /// Deliver an animation frame.
    ///
    /// Flips the open flag of the menu waiting for `frame`, emitting `Show`
    /// or `Hide` on an actual change. A submenu that becomes visible moves its
    /// item from `Opening` to `Open` and starts tracking the item. Returns
    /// `false` if no menu was waiting for the frame.
    pub fn on_frame<E: MenuEnv<K>>(
        &mut self,
        frame: FrameId,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        let mut landed = None;
        for (key, m) in &mut self.menus {
            let was = m.panel.is_visible();
            if let Some(visible) = m.panel.on_frame(frame) {
                landed = Some((*key, was, visible, m.parent_item));
                break;
            }
        }
        let Some((menu, was, visible, parent)) = landed else {
            return false;
        };

        if visible != was {
            out.push(if visible {
                MenuEvent::Show { menu }
            } else {
                MenuEvent::Hide { menu }
            });
        }
        if let (true, Some(parent)) = (visible, parent) {
            let expanded = self.items.get_mut(&parent).is_some_and(|it| {
                if it.apply(SubmenuTrigger::Shown) {
                    trace!("item {parent:?}: submenu open");
                }
                it.state.is_expanded()
            });
            if expanded && let Some(m) = self.menus.get_mut(&menu) {
                m.panel.start_tracking(env);
            }
        }
        true
    }

    /// Recompute a menu's placement after its tracker fired.
    pub fn reposition<E: MenuEnv<K>>(&mut self, menu: K, env: &mut E) -> bool {
        self.menus
            .get_mut(&menu)
            .is_some_and(|m| m.panel.reposition(env))
    }

    /// Observe expired hover-intent timers, closing their submenus.
    ///
    /// Returns `true` if any submenu closed.
    pub fn tick<E: MenuEnv<K>>(&mut self, now: u64, env: &mut E) -> bool {
        let expired: Vec<K> = self
            .items
            .iter_mut()
            .filter_map(|(k, it)| it.close_timer.poll(now).then_some(*k))
            .collect();
        let mut closed = false;
        for item in expired {
            // An ancestor closing earlier in this loop may already have reset it.
            if self
                .items
                .get_mut(&item)
                .is_some_and(|it| it.apply(SubmenuTrigger::TimerFired))
            {
                trace!("item {item:?}: hover intent expired");
                self.collapse(item, env);
                closed = true;
            }
        }
        closed
    }

    // --- submenus ---

    /// Start opening `item`'s submenu.
    ///
    /// Closes open sibling submenus first. An item whose submenu is closing
    /// takes it back instead. Returns `true` if the submenu started opening
    /// or was taken back.
    pub fn open_submenu<E: MenuEnv<K>>(
        &mut self,
        item: K,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        let Some(it) = self.items.get(&item) else {
            return false;
        };
        if it.disabled {
            return false;
        }
        let Some(submenu) = it.submenu.filter(|s| self.menus.contains_key(s)) else {
            return false;
        };
        match it.state {
            SubmenuState::Opening | SubmenuState::Open => false,
            SubmenuState::Closing => self.reenter(item),
            SubmenuState::Idle => {
                self.close_siblings(item, env);
                let shown = self
                    .menus
                    .get_mut(&submenu)
                    .is_some_and(|m| m.panel.show(Some(AnchorRef::Element(item)), false, env));
                if !shown {
                    return false;
                }
                if let Some(it) = self.items.get_mut(&item) {
                    it.close_timer.cancel();
                    it.apply(SubmenuTrigger::Open);
                }
                self.close_on_select.insert(submenu);
                debug!("item {item:?}: opening submenu {submenu:?}");
                out.push(MenuEvent::SubmenuOpen { item, submenu });
                true
            }
        }
    }

    /// Close `item`'s submenu immediately, bypassing the hover-intent delay.
    ///
    /// Descendant submenus close first. Returns `false` if it was not open.
    pub fn close_submenu<E: MenuEnv<K>>(&mut self, item: K, env: &mut E) -> bool {
        let Some(it) = self.items.get_mut(&item) else {
            return false;
        };
        it.close_timer.cancel();
        if !it.apply(SubmenuTrigger::Close) {
            return false;
        }
        self.collapse(item, env);
        true
    }

    // --- pointer and focus ---

    /// The pointer entered `target`.
    ///
    /// Cancels pending closes on every item whose subtree contains `target`,
    /// then opens `target`'s submenu if it is an item with one. Returns `true`
    /// if a submenu started opening or was taken back.
    pub fn pointer_enter<E: MenuEnv<K>>(
        &mut self,
        target: K,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        let reentered = self.reenter_chain(target);
        let opened = self.items.contains_key(&target) && self.open_submenu(target, env, out);
        reentered || opened
    }

    /// The pointer left `target` for `related` (`None`: left the document).
    pub fn pointer_leave(&mut self, target: K, related: Option<K>, now: u64) {
        self.leave_chain(target, related, now);
    }

    /// The host moved focus to `target`.
    ///
    /// Behaves like [`pointer_enter`](Self::pointer_enter). Ignored if the
    /// tree already considers `target` focused.
    pub fn focus_in<E: MenuEnv<K>>(
        &mut self,
        target: K,
        now: u64,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        if self.focused == Some(target) {
            return false;
        }
        self.set_focus(Some(target), now);
        self.pointer_enter(target, env, out)
    }

    /// The host moved focus from `target` to `related`.
    pub fn focus_out(&mut self, target: K, related: Option<K>, now: u64) {
        if self.focused == Some(target) {
            self.focused = None;
        }
        self.leave_chain(target, related, now);
    }

    /// Move focus to `item` without opening anything.
    pub fn focus_item<E: MenuEnv<K>>(&mut self, item: K, now: u64, env: &mut E) -> bool {
        if !self.items.contains_key(&item) {
            return false;
        }
        self.set_focus(Some(item), now);
        self.reenter_chain(item);
        env.focus(&item);
        true
    }

    /// Focus the first enabled item of `menu`.
    pub fn focus_first<E: MenuEnv<K>>(&mut self, menu: K, now: u64, env: &mut E) -> Option<K> {
        let first = self.items(menu, ItemFilter::Enabled).first().copied()?;
        self.focus_item(first, now, env);
        Some(first)
    }

    // --- activation and keyboard ---

    /// Activate `item`, by click or Enter/Space.
    ///
    /// An item owning a submenu toggles it. Otherwise the owning menu's
    /// selection mode decides: `None` emits `Select`, `Single` selects the
    /// item alone and emits `Select`, `Multiple` toggles `checked` and emits
    /// `Check`. A `Select` inside a submenu closes that submenu. Disabled
    /// items ignore activation. Returns `true` if the item reacted.
    pub fn activate<E: MenuEnv<K>>(
        &mut self,
        item: K,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        let Some(it) = self.items.get(&item) else {
            return false;
        };
        if it.disabled {
            return false;
        }
        if it.submenu.is_some_and(|s| self.menus.contains_key(&s)) {
            return if it.state.is_expanded() && it.state != SubmenuState::Closing {
                self.close_submenu(item, env)
            } else {
                self.open_submenu(item, env, out)
            };
        }

        let menu = it.menu;
        let value = it.value.clone();
        match self.menus.get(&menu).map_or(SelectMode::None, |m| m.mode) {
            SelectMode::None => out.push(MenuEvent::Select { menu, item, value }),
            SelectMode::Single => {
                self.select_only(menu, item);
                out.push(MenuEvent::Select { menu, item, value });
            }
            SelectMode::Multiple => {
                let Ok(it) = self.item_mut(item) else {
                    return false;
                };
                it.checked = !it.checked;
                let checked = it.checked;
                out.push(MenuEvent::Check {
                    menu,
                    item,
                    checked,
                });
                return true;
            }
        }

        if self.close_on_select.remove(&menu)
            && let Some(parent) = self.menus.get(&menu).and_then(|m| m.parent_item)
        {
            debug!("menu {menu:?}: closing after select");
            self.close_submenu(parent, env);
        }
        true
    }

    /// Handle a key pressed while `menu` (or one of its submenus) has focus.
    ///
    /// The active container is the menu holding the focused item when that
    /// item lies inside `menu`, else `menu` itself. Returns `true` if the key
    /// was handled.
    pub fn key_down<E: MenuEnv<K>>(
        &mut self,
        menu: K,
        key: MenuKey,
        now: u64,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        let active = self
            .focused
            .filter(|f| self.items.contains_key(f) && self.contains(menu, *f));
        let container = active.and_then(|i| self.items.get(&i)).map_or(menu, |it| it.menu);
        let Some(parent) = self.menus.get(&container).map(|m| m.parent_item) else {
            return false;
        };

        match key {
            MenuKey::ArrowDown | MenuKey::ArrowUp | MenuKey::Home | MenuKey::End => {
                let enabled = self.items(container, ItemFilter::Enabled);
                let n = enabled.len();
                if n == 0 {
                    return true;
                }
                let pos = active.and_then(|a| enabled.iter().position(|k| *k == a));
                let next = match key {
                    MenuKey::ArrowDown => pos.map_or(0, |p| (p + 1) % n),
                    MenuKey::ArrowUp => pos.map_or(n - 1, |p| (p + n - 1) % n),
                    MenuKey::Home => 0,
                    _ => n - 1,
                };
                self.focus_item(enabled[next], now, env);
                true
            }
            MenuKey::ArrowRight => match active {
                Some(item) if self.has_live_submenu(item) => {
                    self.enter_submenu(item, now, env, out)
                }
                _ => false,
            },
            MenuKey::ArrowLeft => match parent {
                Some(parent) => {
                    self.focus_item(parent, now, env);
                    self.close_submenu(parent, env);
                    true
                }
                None => false,
            },
            MenuKey::Escape => {
                match parent {
                    Some(parent) => {
                        self.focus_item(parent, now, env);
                        self.close_submenu(parent, env);
                    }
                    None => {
                        self.close_menu(container, env, out);
                    }
                }
                true
            }
            MenuKey::Enter | MenuKey::Space => match active {
                Some(item) if self.has_live_submenu(item) => {
                    self.enter_submenu(item, now, env, out)
                }
                Some(item) => {
                    self.activate(item, env, out);
                    true
                }
                None => false,
            },
            MenuKey::Other => false,
        }
    }

    /// Reset `selected` and `checked` on every item of `menu` and all submenus below it.
    pub fn clear_all(&mut self, menu: K) {
        let mut stack = vec![menu];
        while let Some(m) = stack.pop() {
            let Some(container) = self.menus.get(&m) else {
                continue;
            };
            for k in &container.items {
                if let Some(it) = self.items.get_mut(k) {
                    it.selected = false;
                    it.checked = false;
                    stack.extend(it.submenu);
                }
            }
        }
    }

    // --- lifecycle ---

    /// Tear everything down: pending frames, trackers, timers and overlay mounts.
    ///
    /// Structure is kept; nothing can be shown until [`attach`](Self::attach).
    pub fn detach<E: MenuEnv<K>>(&mut self, env: &mut E) {
        for m in self.menus.values_mut() {
            m.panel.detach(env);
        }
        for it in self.items.values_mut() {
            it.close_timer.cancel();
            it.state = SubmenuState::Idle;
        }
        self.close_on_select.clear();
        self.focused = None;
        let unmounted = self.overlays.detach();
        debug!("menu tree detached, {} overlays unmounted", unmounted.len());
    }

    /// Re-attach after [`detach`](Self::detach).
    pub fn attach(&mut self) {
        self.overlays.attach();
    }

    // --- internals ---

    fn check_new_key(&self, key: K) -> Result<(), MenuError<K>> {
        if !self.overlays.is_attached() {
            return Err(MenuError::Detached);
        }
        if self.menus.contains_key(&key) || self.items.contains_key(&key) {
            return Err(MenuError::DuplicateKey(key));
        }
        Ok(())
    }

    fn item_mut(&mut self, item: K) -> Result<&mut MenuItem<K>, MenuError<K>> {
        self.items.get_mut(&item).ok_or(MenuError::UnknownItem(item))
    }

    fn has_live_submenu(&self, item: K) -> bool {
        self.items
            .get(&item)
            .and_then(|it| it.submenu)
            .is_some_and(|s| self.menus.contains_key(&s))
    }

    fn select_only(&mut self, menu: K, item: K) {
        let Some(m) = self.menus.get(&menu) else {
            return;
        };
        for k in &m.items {
            if let Some(it) = self.items.get_mut(k) {
                it.selected = *k == item;
            }
        }
    }

    /// Menus from `node`'s container (or `node` itself) up to its root.
    fn menu_chain(&self, node: K) -> Chain<K> {
        let mut chain = Chain::new();
        let mut next = if self.menus.contains_key(&node) {
            Some(node)
        } else {
            self.items.get(&node).map(|it| it.menu)
        };
        while let Some(menu) = next {
            if chain.contains(&menu) {
                break;
            }
            chain.push(menu);
            next = self
                .menus
                .get(&menu)
                .and_then(|m| m.parent_item)
                .and_then(|i| self.items.get(&i))
                .map(|it| it.menu);
        }
        chain
    }

    /// Items from `node` (or the item owning `node`) up to the root menu.
    fn ancestor_items(&self, node: K) -> Chain<K> {
        let mut chain = Chain::new();
        let mut next = if self.items.contains_key(&node) {
            Some(node)
        } else {
            self.menus.get(&node).and_then(|m| m.parent_item)
        };
        while let Some(item) = next {
            if chain.contains(&item) {
                break;
            }
            chain.push(item);
            next = self
                .items
                .get(&item)
                .and_then(|it| self.menus.get(&it.menu))
                .and_then(|m| m.parent_item);
        }
        chain
    }

    /// Whether `node` is `item` or inside `item`'s submenu subtree.
    fn is_within_item(&self, item: K, node: Option<K>) -> bool {
        node.is_some_and(|n| self.ancestor_items(n).contains(&item))
    }

    fn set_focus(&mut self, focus: Option<K>, now: u64) {
        if let Some(old) = self.focused
            && Some(old) != focus
        {
            self.leave_chain(old, focus, now);
        }
        self.focused = focus;
    }

    fn leave_chain(&mut self, node: K, related: Option<K>, now: u64) {
        let delay = self.config.hover_close_delay_ms;
        for item in self.ancestor_items(node) {
            if self.is_within_item(item, related) {
                continue;
            }
            if let Some(it) = self.items.get_mut(&item)
                && it.apply(SubmenuTrigger::Leave)
            {
                it.close_timer.arm(now, delay);
                trace!("item {item:?}: closing in {delay}ms");
            }
        }
    }

    fn reenter_chain(&mut self, node: K) -> bool {
        let mut any = false;
        for item in self.ancestor_items(node) {
            any |= self.reenter(item);
        }
        any
    }

    /// Take back a closing submenu.
    fn reenter(&mut self, item: K) -> bool {
        let visible = self
            .items
            .get(&item)
            .and_then(|it| it.submenu)
            .and_then(|s| self.menus.get(&s))
            .is_some_and(Menu::is_open);
        let Some(it) = self.items.get_mut(&item) else {
            return false;
        };
        if !it.apply(SubmenuTrigger::Reenter) {
            return false;
        }
        it.close_timer.cancel();
        if visible {
            it.apply(SubmenuTrigger::Shown);
        }
        trace!("item {item:?}: close cancelled");
        true
    }

    fn close_siblings<E: MenuEnv<K>>(&mut self, item: K, env: &mut E) {
        let Some(siblings) = self
            .items
            .get(&item)
            .and_then(|it| self.menus.get(&it.menu))
            .map(|m| m.items.clone())
        else {
            return;
        };
        for sibling in siblings {
            if sibling != item {
                self.close_submenu(sibling, env);
            }
        }
    }

    fn enter_submenu<E: MenuEnv<K>>(
        &mut self,
        item: K,
        now: u64,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        let opened = self.open_submenu(item, env, out);
        let Some(it) = self.items.get(&item) else {
            return opened;
        };
        let Some(submenu) = it.submenu.filter(|_| it.state.is_expanded()) else {
            return opened;
        };
        self.focus_first(submenu, now, env);
        true
    }

    /// Hide `item`'s submenu after its state already went idle.
    fn collapse<E: MenuEnv<K>>(&mut self, item: K, env: &mut E) {
        let Some(submenu) = self.items.get(&item).and_then(|it| it.submenu) else {
            return;
        };
        self.close_on_select.remove(&submenu);
        if self.focused.is_some_and(|f| self.contains(submenu, f)) {
            self.focused = Some(item);
            env.focus(&item);
        }
        let children = self
            .menus
            .get(&submenu)
            .map(|m| m.items.clone())
            .unwrap_or_default();
        for child in children {
            self.close_submenu(child, env);
        }
        if let Some(m) = self.menus.get_mut(&submenu) {
            m.panel.hide(env);
        }
        debug!("item {item:?}: submenu {submenu:?} closed");
    }

    /// Close the submenus of a top-level `menu`, drop focus inside it and unmount it.
    fn retract<E: MenuEnv<K>>(&mut self, menu: K, env: &mut E) {
        let items = self
            .menus
            .get(&menu)
            .map(|m| m.items.clone())
            .unwrap_or_default();
        for item in items {
            self.close_submenu(item, env);
        }
        if self.focused.is_some_and(|f| self.contains(menu, f)) {
            self.focused = None;
        }
        self.overlays.unmount(&menu);
    }

    fn drop_item<E: MenuEnv<K>>(&mut self, item: K, env: &mut E, out: &mut Vec<MenuEvent<K>>) {
        if self.focused == Some(item) {
            self.focused = None;
        }
        let Some(it) = self.items.remove(&item) else {
            return;
        };
        if let Some(submenu) = it.submenu {
            if let Some(m) = self.menus.get_mut(&submenu) {
                m.parent_item = None;
            }
            self.drop_menu(submenu, env, out);
        }
    }

    fn drop_menu<E: MenuEnv<K>>(&mut self, menu: K, env: &mut E, out: &mut Vec<MenuEvent<K>>) {
        if self.focused.is_some_and(|f| self.contains(menu, f)) {
            self.focused = None;
        }
        let Some(mut m) = self.menus.remove(&menu) else {
            return;
        };
        if m.panel.is_visible() {
            out.push(MenuEvent::Hide { menu });
        } else if m.panel.is_showing() {
            out.push(MenuEvent::ShowCancelled { menu });
        }
        m.panel.detach(env);
        self.overlays.unmount(&menu);
        self.close_on_select.remove(&menu);
        for item in m.items {
            self.drop_item(item, env, out);
        }
    }
}
