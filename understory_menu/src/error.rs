// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors from building and driving a menu tree.

use core::fmt::Debug;

/// Errors from building or restructuring a [`MenuTree`](crate::MenuTree).
///
/// Runtime interaction never fails: a missing anchor or a stale reference
/// simply results in nothing opening.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MenuError<K: Debug> {
    /// No menu has this key.
    #[error("unknown menu {0:?}")]
    UnknownMenu(K),
    /// No item has this key.
    #[error("unknown item {0:?}")]
    UnknownItem(K),
    /// The key is already used by a menu or an item.
    #[error("key {0:?} is already in use")]
    DuplicateKey(K),
    /// The item already owns a submenu; remove it first.
    #[error("item {0:?} already owns a submenu")]
    SubmenuAlreadySet(K),
    /// The menu is already the submenu of another item.
    #[error("menu {submenu:?} is already the submenu of {owner:?}")]
    SubmenuAlreadyOwned {
        /// The menu being attached.
        submenu: K,
        /// Its current owner.
        owner: K,
    },
    /// Attaching the submenu would make the item its own descendant.
    #[error("attaching {submenu:?} under {item:?} would create a cycle")]
    SubmenuCycle {
        /// The item.
        item: K,
        /// The menu being attached.
        submenu: K,
    },
    /// The menu is a submenu; it opens through its owning item.
    #[error("menu {0:?} is a submenu")]
    NotTopLevel(K),
    /// The tree is detached.
    #[error("menu tree is detached")]
    Detached,
}
