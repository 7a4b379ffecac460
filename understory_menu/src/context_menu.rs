// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context menu: a top-level menu opened at the pointer by `contextmenu`.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Point;
use log::{debug, warn};
use understory_floating::{AnchorRef, VirtualPoint};

use crate::config::CONTEXT_MENU_LAYER;
use crate::env::{ListenerKind, ListenerSet, ListenerTarget, MenuEnv};
use crate::error::MenuError;
use crate::event::MenuEvent;
use crate::tree::MenuTree;

/// Binds a top-level menu to a trigger's `contextmenu` event.
///
/// Every context menu mounts into [`CONTEXT_MENU_LAYER`]; opening one closes
/// whatever that layer holds first, so context menus never stack.
#[derive(Clone, Debug)]
pub struct ContextMenu<K> {
    menu: K,
    trigger: Option<K>,
    trigger_listeners: ListenerSet,
    dismiss_listeners: ListenerSet,
}

impl<K: Copy + Eq + Hash + Debug> ContextMenu<K> {
    /// Bind `menu`, a top-level menu of `tree`, as a context menu.
    ///
    /// Applies the tree's context-menu positioning: fixed strategy with the
    /// placement chosen among the four corner placements.
    pub fn new(menu: K, tree: &mut MenuTree<K>) -> Result<Self, MenuError<K>> {
        tree.set_overlay_layer(menu, Some(CONTEXT_MENU_LAYER))?;
        let options = tree.config().context_menu.clone();
        tree.set_position_options(menu, options)?;
        Ok(Self {
            menu,
            trigger: None,
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

    /// Whether outside-dismissal listeners are installed.
    pub fn is_listening_for_dismissal(&self) -> bool {
        !self.dismiss_listeners.is_empty()
    }

    /// Replace the trigger, moving the `contextmenu` listener to it.
    pub fn set_trigger<E: MenuEnv<K>>(&mut self, trigger: Option<K>, env: &mut E) {
        if trigger == self.trigger && (trigger.is_none() || !self.trigger_listeners.is_empty()) {
            return;
        }
        self.trigger_listeners.clear(env);
        self.trigger = trigger;
        if let Some(t) = trigger {
            self.trigger_listeners
                .add(env, ListenerTarget::Element(t), ListenerKind::ContextMenu);
            debug!("context menu {:?}: bound to trigger {t:?}", self.menu);
        }
    }

    /// `contextmenu` on the trigger at client coordinates `at`.
    ///
    /// Returns `true` if the host must call `preventDefault()`, which is
    /// always the case for this binding's trigger, even if nothing opens.
    /// Events for context menus closed on the way land in `out`.
    pub fn on_context_menu<E: MenuEnv<K>>(
        &mut self,
        trigger: K,
        at: Point,
        tree: &mut MenuTree<K>,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        if Some(trigger) != self.trigger {
            return false;
        }
        self.show_at(at, tree, env, out);
        true
    }

    /// Close every open context menu, then show this one at `at`.
    ///
    /// A replaced menu whose show frame had not landed reports
    /// `ShowCancelled` in `out`; forward it to the other bindings'
    /// [`on_menu_events`](Self::on_menu_events).
    pub fn show_at<E: MenuEnv<K>>(
        &mut self,
        at: Point,
        tree: &mut MenuTree<K>,
        env: &mut E,
        out: &mut Vec<MenuEvent<K>>,
    ) -> bool {
        let open: Vec<K> = tree.overlays().mounted(CONTEXT_MENU_LAYER).to_vec();
        for menu in open {
            // Reopening this binding's own menu must not report it as cancelled.
            if menu == self.menu {
                let mut own = Vec::new();
                tree.close_menu(menu, env, &mut own);
            } else {
                tree.close_menu(menu, env, out);
            }
        }
        let anchor = AnchorRef::Point(VirtualPoint::from(at));
        match tree.show_menu(self.menu, Some(anchor), true, env) {
            Ok(true) => {
                if self.dismiss_listeners.is_empty() {
                    self.dismiss_listeners.add(
                        env,
                        ListenerTarget::Document,
                        ListenerKind::PointerDownCapture,
                    );
                    self.dismiss_listeners
                        .add(env, ListenerTarget::Window, ListenerKind::Blur);
                }
                true
            }
            Ok(false) => {
                self.dismiss_listeners.clear(env);
                false
            }
            Err(err) => {
                warn!("context menu {:?}: {err}", self.menu);
                self.dismiss_listeners.clear(env);
                false
            }
        }
    }

    /// Hide the menu and drop the dismissal listeners.
    pub fn hide<E: MenuEnv<K>>(&mut self, tree: &mut MenuTree<K>, env: &mut E) -> bool {
        self.dismiss_listeners.clear(env);
        let mut own = Vec::new();
        tree.close_menu(self.menu, env, &mut own)
    }

    /// Capture-phase `pointerdown` on the document, with the composed path.
    ///
    /// Hides the menu unless the path touches the menu tree.
    pub fn on_document_pointer_down<E: MenuEnv<K>>(
        &mut self,
        path: &[K],
        tree: &mut MenuTree<K>,
        env: &mut E,
    ) -> bool {
        if !tree.is_showing(self.menu) {
            self.dismiss_listeners.clear(env);
            return false;
        }
        if path.iter().any(|n| tree.contains(self.menu, *n)) {
            return false;
        }
        debug!("context menu {:?}: outside pointerdown", self.menu);
        self.hide(tree, env)
    }

    /// `blur` on the window.
    pub fn on_window_blur<E: MenuEnv<K>>(&mut self, tree: &mut MenuTree<K>, env: &mut E) -> bool {
        if !tree.is_showing(self.menu) {
            self.dismiss_listeners.clear(env);
            return false;
        }
        self.hide(tree, env)
    }

    /// React to events emitted by `tree`.
    ///
    /// A `Select` from this menu or its submenus hides it. A `Hide` or
    /// `ShowCancelled` of this menu, including one caused by another context
    /// menu opening, drops the dismissal listeners.
    pub fn on_menu_events<E: MenuEnv<K>>(
        &mut self,
        events: &[MenuEvent<K>],
        tree: &mut MenuTree<K>,
        env: &mut E,
    ) {
        for event in events {
            match event {
                MenuEvent::Select { menu, .. } if tree.root_of(*menu) == Some(self.menu) => {
                    self.hide(tree, env);
                }
                MenuEvent::Hide { menu } | MenuEvent::ShowCancelled { menu }
                    if *menu == self.menu && !tree.is_showing(self.menu) =>
                {
                    self.dismiss_listeners.clear(env);
                }
                _ => {}
            }
        }
    }

    /// Remove every listener this binding holds.
    pub fn detach<E: MenuEnv<K>>(&mut self, env: &mut E) {
        self.dismiss_listeners.clear(env);
        self.trigger_listeners.clear(env);
    }
}
