// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications and input vocabulary.

use alloc::string::String;

/// Notifications emitted by a [`MenuTree`](crate::MenuTree).
///
/// Operations push these into a caller-provided `Vec` in the order they
/// happen. Hosts forward them to listeners and to the trigger bindings
/// ([`Dropdown::on_menu_events`](crate::Dropdown::on_menu_events),
/// [`ContextMenu::on_menu_events`](crate::ContextMenu::on_menu_events)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuEvent<K> {
    /// A menu became visible.
    Show {
        /// The menu.
        menu: K,
    },
    /// A menu became hidden.
    Hide {
        /// The menu.
        menu: K,
    },
    /// A top-level menu was closed or removed before its show frame landed.
    ///
    /// No `Show` was emitted for it, and no `Hide` will be.
    ShowCancelled {
        /// The menu.
        menu: K,
    },
    /// An item was activated in a `None` or `Single` mode menu.
    Select {
        /// The menu containing the item.
        menu: K,
        /// The activated item.
        item: K,
        /// The item's value.
        value: String,
    },
    /// An item was toggled in a `Multiple` mode menu.
    Check {
        /// The menu containing the item.
        menu: K,
        /// The toggled item.
        item: K,
        /// The new checked state.
        checked: bool,
    },
    /// An item started opening its submenu.
    SubmenuOpen {
        /// The item owning the submenu.
        item: K,
        /// The submenu.
        submenu: K,
    },
}

impl<K: Copy> MenuEvent<K> {
    /// The menu the event concerns.
    ///
    /// For [`SubmenuOpen`](Self::SubmenuOpen) this is the submenu.
    pub fn menu(&self) -> K {
        match self {
            Self::Show { menu }
            | Self::Hide { menu }
            | Self::ShowCancelled { menu }
            | Self::Select { menu, .. }
            | Self::Check { menu, .. } => *menu,
            Self::SubmenuOpen { submenu, .. } => *submenu,
        }
    }
}

/// Keys the menu system reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuKey {
    /// `ArrowDown`.
    ArrowDown,
    /// `ArrowUp`.
    ArrowUp,
    /// `ArrowLeft`.
    ArrowLeft,
    /// `ArrowRight`.
    ArrowRight,
    /// `Home`.
    Home,
    /// `End`.
    End,
    /// `Enter`.
    Enter,
    /// The space bar.
    Space,
    /// `Escape`.
    Escape,
    /// Anything else.
    Other,
}

impl MenuKey {
    /// Map a DOM `KeyboardEvent.key` value.
    ///
    /// ```
    /// use understory_menu::MenuKey;
    ///
    /// assert_eq!(MenuKey::from_key_name("ArrowDown"), MenuKey::ArrowDown);
    /// assert_eq!(MenuKey::from_key_name(" "), MenuKey::Space);
    /// assert_eq!(MenuKey::from_key_name("a"), MenuKey::Other);
    /// ```
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "Enter" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// Pointer buttons as reported by `PointerEvent.button`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the wheel button.
    Auxiliary,
    /// Usually the right button.
    Secondary,
    /// Any other button.
    Other,
}

impl PointerButton {
    /// Map a DOM `PointerEvent.button` index.
    pub fn from_index(index: i16) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            _ => Self::Other,
        }
    }
}
