// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay host: an explicit registry of mounted overlays.
//!
//! Toasts, dropdowns and context menus are usually mounted into
//! document-level containers. Instead of module-level singletons, an
//! [`OverlayHost`] is an ordinary value handed to whatever needs to mount
//! overlays. Mounts are grouped by [`OverlayLayer`], and the host's own
//! [`attach`](OverlayHost::attach)/[`detach`](OverlayHost::detach) bound
//! their lifetime: detaching unmounts everything and hands the keys back so
//! the caller can tear them down.
//!
//! ```
//! use understory_floating::{OverlayHost, OverlayLayer};
//!
//! const MENUS: OverlayLayer = OverlayLayer::new(0);
//!
//! let mut host = OverlayHost::attached();
//! host.mount(MENUS, 7_u32).unwrap();
//! assert_eq!(host.mounted(MENUS), &[7]);
//!
//! let torn_down = host.detach();
//! assert_eq!(torn_down, vec![7]);
//! assert!(host.mount(MENUS, 8).is_err());
//! ```

use alloc::vec;
use alloc::vec::Vec;
use smallvec::SmallVec;

/// A named group of overlays, such as "context menus" or "top-end toasts".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayLayer(u8);

impl OverlayLayer {
    /// Create a layer with the given index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// The layer index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Errors from [`OverlayHost`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    /// The host is not attached, so nothing can be mounted.
    #[error("overlay host is detached")]
    Detached,
}

/// Registry of overlays mounted per layer.
#[derive(Clone, Debug)]
pub struct OverlayHost<K> {
    attached: bool,
    layers: SmallVec<[(OverlayLayer, Vec<K>); 4]>,
}

impl<K> Default for OverlayHost<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> OverlayHost<K> {
    /// Create a detached host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attached: false,
            layers: SmallVec::new(),
        }
    }

    /// Create an attached host.
    #[must_use]
    pub fn attached() -> Self {
        let mut host = Self::new();
        host.attach();
        host
    }

    /// Whether the host is attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Attach the host so overlays can be mounted.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Detach the host, unmounting every overlay.
    ///
    /// Returns the unmounted keys, layer by layer in layer order.
    pub fn detach(&mut self) -> Vec<K> {
        self.attached = false;
        let mut layers = core::mem::take(&mut self.layers);
        layers.sort_by_key(|(layer, _)| *layer);
        layers.into_iter().flat_map(|(_, keys)| keys).collect()
    }

    /// Keys mounted in `layer`, oldest first.
    pub fn mounted(&self, layer: OverlayLayer) -> &[K] {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, keys)| keys.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of mounted overlays.
    pub fn len(&self) -> usize {
        self.layers.iter().map(|(_, keys)| keys.len()).sum()
    }

    /// Returns `true` if nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: PartialEq> OverlayHost<K> {
    /// Mount `key` in `layer`. Mounting an already mounted key moves it to `layer`'s end.
    pub fn mount(&mut self, layer: OverlayLayer, key: K) -> Result<(), OverlayError> {
        if !self.attached {
            return Err(OverlayError::Detached);
        }
        self.unmount(&key);
        match self.layers.iter_mut().find(|(l, _)| *l == layer) {
            Some((_, keys)) => keys.push(key),
            None => self.layers.push((layer, vec![key])),
        }
        Ok(())
    }

    /// Unmount `key` from whichever layer holds it. Returns `false` if not mounted.
    pub fn unmount(&mut self, key: &K) -> bool {
        for (_, keys) in &mut self.layers {
            if let Some(pos) = keys.iter().position(|k| k == key) {
                keys.remove(pos);
                return true;
            }
        }
        false
    }

    /// The layer holding `key`, if mounted.
    pub fn layer_of(&self, key: &K) -> Option<OverlayLayer> {
        self.layers
            .iter()
            .find(|(_, keys)| keys.contains(key))
            .map(|(l, _)| *l)
    }

    /// Returns `true` if `key` is mounted anywhere.
    pub fn contains(&self, key: &K) -> bool {
        self.layer_of(key).is_some()
    }
}
