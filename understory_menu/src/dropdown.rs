// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropdown: a top-level menu bound to a trigger element.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use log::{debug, warn};
use understory_floating::AnchorRef;

use crate::config::DROPDOWN_LAYER;
use crate::env::{ListenerKind, ListenerSet, ListenerTarget, MenuEnv};
use crate::error::MenuError;
use crate::event::{MenuEvent, MenuKey, PointerButton};
use crate::tree::MenuTree;

/// Binds a top-level menu to a trigger element.
///
/// The binding holds two listener groups. Trigger listeners (`pointerdown`
/// and `keydown` on the trigger) live as long as the trigger is set.
/// Dismissal listeners (document `pointerdown`, window `blur`) live only
/// while the menu is shown. The host routes each listener's events to the
/// matching `on_*` method.
#[derive(Clone, Debug)]
pub struct Dropdown<K> {
    menu: K,
    trigger: Option<K>,
    shown_for: Option<K>,
    close_on_select: bool,
    trigger_listeners: ListenerSet,
    dismiss_listeners: ListenerSet,
}

impl<K: Copy + Eq + Hash + Debug> Dropdown<K> {
    /// Bind `menu`, a top-level menu of `tree`, as a dropdown.
    pub fn new(menu: K, tree: &mut MenuTree<K>) -> Result<Self, MenuError<K>> {
        tree.set_overlay_layer(menu, Some(DROPDOWN_LAYER))?;
        Ok(Self {
            menu,
            trigger: None,
            shown_for: None,
            close_on_select: true,
            trigger_listeners: ListenerSet::default(),
            dismiss_listeners: ListenerSet::default(),
        })
    }

    /// The bound menu.
    pub fn menu(&self) -> K {
        self.menu
    }

    /// The trigger element.
    pub fn trigger(&self) -> Option<K> {
        self.trigger
    }

    /// Whether a `Select` from the menu hides the dropdown.
    pub fn close_on_select(&self) -> bool {
        self.close_on_select
    }

    /// Set whether a `Select` from the menu hides the dropdown.
    pub fn set_close_on_select(&mut self, close: bool) {
        self.close_on_select = close;
    }

    /// Whether outside-dismissal listeners are installed.
    pub fn is_listening_for_dismissal(&self) -> bool {
        !self.dismiss_listeners.is_empty()
    }

    /// Whether the menu is shown or about to be.
    pub fn is_open(&self, tree: &MenuTree<K>) -> bool {
        tree.is_showing(self.menu)
    }

    /// Replace the trigger, moving the trigger listeners to it.
    ///
    /// A dropdown shown for the old trigger is hidden.
    pub fn set_trigger<E: MenuEnv<K>>(
        &mut self,
        trigger: Option<K>,
        tree: &mut MenuTree<K>,
        env: &mut E,
    ) {
        if trigger == self.trigger && (trigger.is_none() || !self.trigger_listeners.is_empty()) {
            return;
        }
        self.trigger_listeners.clear(env);
        if self.shown_for.is_some_and(|t| Some(t) != trigger) {
            self.hide(tree, env);
        }
        self.trigger = trigger;
        if let Some(t) = trigger {
            let target = ListenerTarget::Element(t);
            self.trigger_listeners.add(env, target, ListenerKind::PointerDown);
            self.trigger_listeners.add(env, target, ListenerKind::KeyDown);
            debug!("dropdown {:?}: bound to trigger {t:?}", self.menu);
        }
    }

    /// Show the menu anchored to the trigger.
    pub fn show<E: MenuEnv<K>>(&mut self, tree: &mut MenuTree<K>, env: &mut E) -> bool {
        let Some(trigger) = self.trigger else {
            return false;
        };
        match tree.show_menu(self.menu, Some(AnchorRef::Element(trigger)), true, env) {
            Ok(true) => {
                self.shown_for = Some(trigger);
                if self.dismiss_listeners.is_empty() {
                    self.dismiss_listeners
                        .add(env, ListenerTarget::Document, ListenerKind::PointerDown);
                    self.dismiss_listeners
                        .add(env, ListenerTarget::Window, ListenerKind::Blur);
                }
                true
            }
            Ok(false) => {
                if !tree.is_showing(self.menu) {
                    self.release(env);
                }
                false
            }
            Err(err) => {
                warn!("dropdown {:?}: {err}", self.menu);
                false
            }
        }
    }

    /// Hide the menu and drop the dismissal listeners.
    pub fn hide<E: MenuEnv<K>>(&mut self, tree: &mut MenuTree<K>, env: &mut E) -> bool {
        self.release(env);
        // Only this binding's menu closes, and its listeners are gone already.
        let mut own = Vec::new();
        tree.close_menu(self.menu, env, &mut own)
    }

    /// `pointerdown` on the trigger.
    ///
    /// The primary button toggles: hide if shown for this trigger, else show.
    pub fn on_trigger_pointer_down<E: MenuEnv<K>>(
        &mut self,
        trigger: K,
        button: PointerButton,
        tree: &mut MenuTree<K>,
        env: &mut E,
    ) -> bool {
        if button != PointerButton::Primary || Some(trigger) != self.trigger {
            return false;
        }
        if tree.is_showing(self.menu) && self.shown_for == Some(trigger) {
            self.hide(tree, env)
        } else {
            self.show(tree, env)
        }
    }

    /// `keydown` on the trigger.
    ///
    /// ArrowDown, Enter and Space open the menu if needed and focus its first
    /// enabled item. Escape hides an open menu.
    pub fn on_trigger_key_down<E: MenuEnv<K>>(
        &mut self,
        trigger: K,
        key: MenuKey,
        now: u64,
        tree: &mut MenuTree<K>,
        env: &mut E,
    ) -> bool {
        if Some(trigger) != self.trigger {
            return false;
        }
        match key {
            MenuKey::ArrowDown | MenuKey::Enter | MenuKey::Space => {
                if !tree.is_showing(self.menu) && !self.show(tree, env) {
                    return false;
                }
                tree.focus_first(self.menu, now, env);
                true
            }
            MenuKey::Escape if tree.is_showing(self.menu) => self.hide(tree, env),
            _ => false,
        }
    }

    /// `keydown` inside the menu.
    ///
    /// Delegates to [`MenuTree::key_down`]. When Escape closes the top-level
    /// menu, focus returns to the trigger.
    pub fn key_down<E: MenuEnv<K>>(
        &mut self,
        key: MenuKey,
        now: u64,
        tree: &mut MenuTree<K>,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        let start = out.len();
        let handled = tree.key_down(self.menu, key, now, env, out);
        if key == MenuKey::Escape && handled && !tree.is_showing(self.menu) {
            self.release(env);
            if let Some(t) = self.trigger {
                env.focus(&t);
            }
        }
        self.on_menu_events(&out[start..], tree, env);
        handled
    }

    /// `pointerdown` on the document, with the composed path.
    ///
    /// Hides the menu unless the path touches the trigger or the menu tree.
    pub fn on_document_pointer_down<E: MenuEnv<K>>(
        &mut self,
        path: &[K],
        tree: &mut MenuTree<K>,
        env: &mut E,
    ) -> bool {
        if !tree.is_showing(self.menu) {
            self.release(env);
            return false;
        }
        let inside = path
            .iter()
            .any(|n| Some(*n) == self.trigger || tree.contains(self.menu, *n));
        if inside {
            return false;
        }
        debug!("dropdown {:?}: outside pointerdown", self.menu);
        self.hide(tree, env)
    }

    /// `blur` on the window.
    pub fn on_window_blur<E: MenuEnv<K>>(&mut self, tree: &mut MenuTree<K>, env: &mut E) -> bool {
        if !tree.is_showing(self.menu) {
            self.release(env);
            return false;
        }
        debug!("dropdown {:?}: window blur", self.menu);
        self.hide(tree, env)
    }

    /// React to events emitted by `tree`.
    ///
    /// A `Select` from this menu or its submenus hides the dropdown when
    /// [`close_on_select`](Self::close_on_select) is set; `Check` never does.
    /// A `Hide` or `ShowCancelled` of this menu drops the dismissal listeners.
    pub fn on_menu_events<E: MenuEnv<K>>(
        &mut self,
        events: &[MenuEvent<K>],
        tree: &mut MenuTree<K>,
        env: &mut E,
    ) {
        for event in events {
            match event {
                MenuEvent::Select { menu, .. }
                    if self.close_on_select && tree.root_of(*menu) == Some(self.menu) =>
                {
                    self.hide(tree, env);
                }
                MenuEvent::Hide { menu } | MenuEvent::ShowCancelled { menu }
                    if *menu == self.menu && !tree.is_showing(self.menu) =>
                {
                    self.release(env);
                }
                _ => {}
            }
        }
    }

    /// Remove every listener this binding holds.
    pub fn detach<E: MenuEnv<K>>(&mut self, env: &mut E) {
        self.release(env);
        self.trigger_listeners.clear(env);
    }

    fn release<E: MenuEnv<K>>(&mut self, env: &mut E) {
        self.shown_for = None;
        self.dismiss_listeners.clear(env);
    }
}
