// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: host-agnostic timer primitives for UI runtimes.
//!
//! UI state machines often need a short, cancellable delay: hover-intent
//! before collapsing a submenu, a tooltip show delay, a long-press threshold.
//! This crate models such a delay as a plain value that the owning state
//! machine stores next to the rest of its state.
//!
//! It does not own a clock and never spawns or schedules anything. The host
//! passes its own monotonic timestamps (milliseconds, like the timestamps
//! used by `understory_event_state`) into [`DelayTimer::arm`] and
//! [`DelayTimer::poll`], and is free to use [`DelayTimer::deadline`] to decide
//! when to wake up next.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_timing::DelayTimer;
//!
//! let mut timer = DelayTimer::new();
//!
//! // Pointer left an item at t=1000; close after 150ms unless it comes back.
//! timer.arm(1_000, 150);
//! assert!(timer.is_pending());
//! assert_eq!(timer.deadline(), Some(1_150));
//!
//! // Not yet.
//! assert!(!timer.poll(1_100));
//!
//! // Fires exactly once, then clears itself.
//! assert!(timer.poll(1_150));
//! assert!(!timer.poll(1_200));
//! assert!(!timer.is_pending());
//! ```
//!
//! ## Cancellation
//!
//! [`DelayTimer::cancel`] is idempotent: cancelling an idle timer is a no-op
//! and reports `false`.
//!
//! ```rust
//! use understory_timing::DelayTimer;
//!
//! let mut timer = DelayTimer::new();
//! timer.arm(0, 100);
//! assert!(timer.cancel());
//! assert!(!timer.cancel());
//! assert!(!timer.poll(500));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

/// A single-shot, cancellable delay.
///
/// The timer is either idle or pending with a deadline. Re-arming a pending
/// timer replaces its deadline. A pending timer fires once: the first
/// [`poll`](Self::poll) at or after the deadline returns `true` and returns
/// the timer to idle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DelayTimer {
    deadline: Option<u64>,
}

impl DelayTimer {
    /// Create an idle timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer to fire `delay` milliseconds after `now`.
    ///
    /// Any previously pending deadline is replaced.
    pub fn arm(&mut self, now: u64, delay: u64) {
        self.deadline = Some(now.saturating_add(delay));
    }

    /// Cancel the pending deadline.
    ///
    /// Returns `true` if a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Returns `true` while a deadline is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Milliseconds left until the deadline at `now`, saturating at zero.
    #[must_use]
    pub fn remaining(&self, now: u64) -> Option<u64> {
        self.deadline.map(|d| d.saturating_sub(now))
    }

    /// Returns `true` once when `now` has reached the deadline, clearing it.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Return the earliest pending deadline among `timers`.
///
/// Hosts that drive many timers from one wake-up source can use this to pick
/// the next wake-up time.
pub fn earliest_deadline<'a>(timers: impl IntoIterator<Item = &'a DelayTimer>) -> Option<u64> {
    timers.into_iter().filter_map(DelayTimer::deadline).min()
}
