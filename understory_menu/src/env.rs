// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host services menus depend on beyond floating geometry.

use smallvec::SmallVec;
use understory_floating::FloatingEnv;

/// Handle of a registered event listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Where a listener is installed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerTarget<K> {
    /// A specific element, such as a trigger.
    Element(K),
    /// The document.
    Document,
    /// The window.
    Window,
}

/// What a listener listens for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Bubbling-phase `pointerdown`.
    PointerDown,
    /// Capture-phase `pointerdown`.
    PointerDownCapture,
    /// `keydown`.
    KeyDown,
    /// `contextmenu`.
    ContextMenu,
    /// `blur`.
    Blur,
}

/// The environment menus run in.
///
/// Listeners are bookkeeping only: the host routes the matching events back
/// to the component that registered them, for as long as the id is live.
/// `remove_listener` must be idempotent.
pub trait MenuEnv<K>: FloatingEnv<K> {
    /// Install a listener.
    fn add_listener(&mut self, target: ListenerTarget<K>, kind: ListenerKind) -> ListenerId;

    /// Remove a listener.
    fn remove_listener(&mut self, listener: ListenerId);

    /// Move keyboard focus to `element`.
    fn focus(&mut self, element: &K);
}

/// A group of listeners installed and removed together.
#[derive(Clone, Debug, Default)]
pub(crate) struct ListenerSet(SmallVec<[ListenerId; 2]>);

impl ListenerSet {
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn add<K, E: MenuEnv<K>>(
        &mut self,
        env: &mut E,
        target: ListenerTarget<K>,
        kind: ListenerKind,
    ) {
        self.0.push(env.add_listener(target, kind));
    }

    /// Remove every listener. Returns `false` if the set was already empty.
    pub(crate) fn clear<K, E: MenuEnv<K>>(&mut self, env: &mut E) -> bool {
        if self.0.is_empty() {
            return false;
        }
        for id in self.0.drain(..) {
            env.remove_listener(id);
        }
        true
    }
}
