// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu items and the per-item submenu state machine.

use alloc::string::String;

use understory_timing::DelayTimer;

/// Submenu lifecycle of one item.
///
/// Each item runs its own machine, independent of its siblings. Parents
/// coordinate only through explicit closes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubmenuState {
    /// No submenu shown.
    #[default]
    Idle,
    /// The submenu was asked to show; its visibility frame has not landed.
    Opening,
    /// The submenu is visible and tracking the item.
    Open,
    /// The pointer or focus left; the hover-intent timer is armed.
    Closing,
}

/// Inputs to [`SubmenuState::transition`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubmenuTrigger {
    /// Pointer enter, host focus-in, or an opening key on the item.
    Open,
    /// The submenu's visibility frame landed.
    Shown,
    /// Pointer or focus left the item and its submenu subtree.
    Leave,
    /// Pointer or focus came back before the timer fired.
    Reenter,
    /// The hover-intent timer expired.
    TimerFired,
    /// Explicit close, bypassing the delay.
    Close,
}

impl SubmenuState {
    /// The state after `trigger`, or `None` if the trigger does not apply.
    ///
    /// ```
    /// use understory_menu::{SubmenuState, SubmenuTrigger};
    ///
    /// let s = SubmenuState::Idle.transition(SubmenuTrigger::Open).unwrap();
    /// assert_eq!(s, SubmenuState::Opening);
    /// assert_eq!(s.transition(SubmenuTrigger::TimerFired), None);
    /// ```
    #[must_use]
    pub const fn transition(self, trigger: SubmenuTrigger) -> Option<Self> {
        use SubmenuTrigger as T;
        match (self, trigger) {
            (Self::Idle, T::Open) | (Self::Closing, T::Open | T::Reenter) => Some(Self::Opening),
            (Self::Opening, T::Shown) => Some(Self::Open),
            (Self::Opening | Self::Open, T::Leave) => Some(Self::Closing),
            (Self::Closing, T::TimerFired) | (Self::Opening | Self::Open | Self::Closing, T::Close) => {
                Some(Self::Idle)
            }
            _ => None,
        }
    }

    /// Whether the submenu is shown or about to be.
    #[must_use]
    pub const fn is_expanded(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Accessibility attributes of an item, derived from its state on read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AriaState {
    /// `aria-haspopup`.
    pub has_popup: bool,
    /// `aria-expanded`; `None` when the item has no submenu.
    pub expanded: Option<bool>,
    /// `aria-checked`; `None` outside selection modes.
    pub checked: Option<bool>,
    /// `aria-disabled`.
    pub disabled: bool,
}

/// Which items a query returns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ItemFilter {
    /// Every item.
    #[default]
    All,
    /// Items that are not disabled.
    Enabled,
    /// Disabled items.
    Disabled,
    /// Items with `selected` set.
    Selected,
    /// Items with `selected` clear.
    Unselected,
    /// Items with `checked` set.
    Checked,
    /// Items with `checked` clear.
    Unchecked,
}

impl ItemFilter {
    /// Returns `true` if `item` passes the filter.
    pub fn matches<K>(self, item: &MenuItem<K>) -> bool {
        match self {
            Self::All => true,
            Self::Enabled => !item.disabled,
            Self::Disabled => item.disabled,
            Self::Selected => item.selected,
            Self::Unselected => !item.selected,
            Self::Checked => item.checked,
            Self::Unchecked => !item.checked,
        }
    }
}

/// One entry of a menu.
#[derive(Clone, Debug)]
pub struct MenuItem<K> {
    pub(crate) menu: K,
    pub(crate) value: String,
    pub(crate) disabled: bool,
    pub(crate) selected: bool,
    pub(crate) checked: bool,
    pub(crate) submenu: Option<K>,
    pub(crate) state: SubmenuState,
    pub(crate) close_timer: DelayTimer,
}

impl<K: Copy> MenuItem<K> {
    pub(crate) fn new(menu: K, value: String) -> Self {
        Self {
            menu,
            value,
            disabled: false,
            selected: false,
            checked: false,
            submenu: None,
            state: SubmenuState::Idle,
            close_timer: DelayTimer::new(),
        }
    }

    /// The menu containing this item.
    pub fn menu(&self) -> K {
        self.menu
    }

    /// The value reported by `Select`.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the item ignores activation and traversal.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the item is the selection of a `Single` mode menu.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the item is checked.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// The owned submenu, if any.
    pub fn submenu(&self) -> Option<K> {
        self.submenu
    }

    /// Whether the item owns a submenu.
    pub fn has_submenu(&self) -> bool {
        self.submenu.is_some()
    }

    /// Current submenu state.
    pub fn state(&self) -> SubmenuState {
        self.state
    }

    /// The hover-intent close timer.
    pub fn close_timer(&self) -> &DelayTimer {
        &self.close_timer
    }

    /// Apply `trigger`. Returns `false` if it did not apply.
    pub(crate) fn apply(&mut self, trigger: SubmenuTrigger) -> bool {
        match self.state.transition(trigger) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Drop the submenu reference and return to idle.
    pub(crate) fn degrade(&mut self) {
        self.submenu = None;
        self.state = SubmenuState::Idle;
        self.close_timer.cancel();
    }
}
