// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floating panel: anchor tracking and frame-deferred visibility.
//!
//! ## Lifecycle
//!
//! 1) [`FloatingPanel::show`] resolves the anchor, computes one placement,
//!    optionally starts a tracker, and requests an animation frame.
//! 2) The host calls [`FloatingPanel::on_frame`] when that frame runs; the
//!    visible flag flips there, so a CSS transition sees a real state change.
//! 3) While tracking, the host calls [`FloatingPanel::reposition`] whenever
//!    the tracker reports movement.
//! 4) [`FloatingPanel::hide`] stops the tracker and requests the frame that
//!    clears the visible flag.
//! 5) [`FloatingPanel::detach`] cancels everything when the element leaves
//!    the document.
//!
//! A panel holds at most one tracker and at most one pending frame. Every
//! `show` cancels both before starting new ones, so overlapping calls can
//! never leave two trackers alive.

use core::fmt::Debug;

use log::{debug, trace, warn};

use crate::anchor::AnchorRef;
use crate::env::{FloatingEnv, FrameId, TrackerId};
use crate::placement::{Placement, TransformOrigin};
use crate::position::{PlacementResult, PositionOptions, Strategy};

/// Show/hide/reposition capability shared by anything that floats.
///
/// [`FloatingPanel`] is the shared implementation; components compose a
/// panel and forward to it rather than inheriting from a common base.
pub trait Positionable<K> {
    /// Anchor and reveal. Returns `false` if nothing was scheduled.
    fn show<E: FloatingEnv<K>>(
        &mut self,
        anchor: Option<AnchorRef<K>>,
        track: bool,
        env: &mut E,
    ) -> bool;

    /// Stop tracking and conceal. Returns `false` if already hidden.
    fn hide<E: FloatingEnv<K>>(&mut self, env: &mut E) -> bool;

    /// Recompute placement against the current anchor. Returns `true` if it moved.
    fn reposition<E: FloatingEnv<K>>(&mut self, env: &mut E) -> bool;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct PendingFrame {
    id: FrameId,
    visible: bool,
}

/// Derived presentation values a host writes onto the panel element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanelStyle {
    /// `position` value.
    pub strategy: Strategy,
    /// `left`, in pixels.
    pub left: f64,
    /// `top`, in pixels.
    pub top: f64,
    /// `transform-origin` for the fade/scale transition.
    pub transform_origin: TransformOrigin,
    /// Whether the visible state (opacity 1, scale 1) applies.
    pub visible: bool,
}

/// Positioning and visibility state of one floating element.
#[derive(Clone, Debug)]
pub struct FloatingPanel<K> {
    element: K,
    options: PositionOptions,
    anchor: Option<AnchorRef<K>>,
    position: Option<PlacementResult>,
    visible: bool,
    pending: Option<PendingFrame>,
    tracker: Option<TrackerId>,
}

impl<K: Copy + Debug> FloatingPanel<K> {
    /// Create a hidden panel for `element`.
    pub fn new(element: K, options: PositionOptions) -> Self {
        Self {
            element,
            options,
            anchor: None,
            position: None,
            visible: false,
            pending: None,
            tracker: None,
        }
    }

    /// The panel element.
    pub fn element(&self) -> K {
        self.element
    }

    /// Positioning options.
    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Replace the positioning options; takes effect on the next computation.
    pub fn set_options(&mut self, options: PositionOptions) {
        self.options = options;
    }

    /// The anchor of the current show cycle.
    pub fn anchor(&self) -> Option<&AnchorRef<K>> {
        self.anchor.as_ref()
    }

    /// The last applied placement result.
    pub fn position(&self) -> Option<PlacementResult> {
        self.position
    }

    /// The placement actually used, if positioned.
    pub fn placement(&self) -> Option<Placement> {
        self.position.map(|p| p.placement)
    }

    /// Transform origin derived from the current placement.
    pub fn transform_origin(&self) -> TransformOrigin {
        TransformOrigin::for_placement(self.placement())
    }

    /// Whether the visible flag is set.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the panel is visible or about to become visible, and not about to hide.
    pub fn is_showing(&self) -> bool {
        match self.pending {
            Some(p) => p.visible,
            None => self.visible,
        }
    }

    /// The frame the panel is waiting for, if any.
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending.map(|p| p.id)
    }

    /// The active tracker, if any.
    pub fn tracker(&self) -> Option<TrackerId> {
        self.tracker
    }

    /// Whether a tracker is active.
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_some()
    }

    /// Presentation values for the host.
    pub fn style(&self) -> PanelStyle {
        let (left, top) = self.position.map_or((0.0, 0.0), |p| (p.x, p.y));
        PanelStyle {
            strategy: self.options.strategy,
            left,
            top,
            transform_origin: self.transform_origin(),
            visible: self.visible,
        }
    }

    /// Anchor the panel and schedule it to become visible.
    ///
    /// A missing anchor, or an element anchor the host cannot resolve, is a
    /// silent no-op returning `false` with no state change. If the geometry
    /// engine fails, any in-flight work is cancelled and the panel is left
    /// hidden.
    pub fn show<E: FloatingEnv<K>>(
        &mut self,
        anchor: Option<AnchorRef<K>>,
        track: bool,
        env: &mut E,
    ) -> bool {
        let Some(anchor) = anchor else {
            debug!("panel {:?}: show without anchor ignored", self.element);
            return false;
        };
        let Some(reference) = anchor.resolve(|k| env.anchor_rect(k)) else {
            debug!("panel {:?}: anchor {anchor:?} has no geometry", self.element);
            return false;
        };

        self.stop_tracking(env);
        self.cancel_pending(env);

        let size = env.floating_size(&self.element);
        match env.compute_position(reference, size, &self.options) {
            Ok(result) => {
                trace!("panel {:?}: placed at {result:?}", self.element);
                self.position = Some(result);
                self.anchor = Some(anchor);
                if track {
                    self.tracker = Some(env.start_auto_update(&self.element, &anchor));
                }
                self.schedule(true, env);
                true
            }
            Err(err) => {
                warn!("panel {:?}: positioning failed: {err}", self.element);
                self.position = None;
                self.anchor = None;
                if self.visible {
                    self.schedule(false, env);
                }
                false
            }
        }
    }

    /// Stop tracking and schedule the panel to become hidden.
    ///
    /// Hiding a panel whose show frame has not run yet cancels that frame, so
    /// the panel never becomes visible. Returns `false` if there was nothing
    /// to hide.
    pub fn hide<E: FloatingEnv<K>>(&mut self, env: &mut E) -> bool {
        self.stop_tracking(env);
        let had_pending = self.cancel_pending(env);
        if self.visible {
            self.schedule(false, env);
            true
        } else {
            had_pending
        }
    }

    /// Apply the pending visibility flip if `frame` is the one this panel waits for.
    ///
    /// Returns the visibility set by the frame, or `None` if the frame belongs
    /// to someone else or was superseded. Compare with
    /// [`is_visible`](Self::is_visible) beforehand to detect an actual change:
    /// a `show` that supersedes a pending hide lands on an already visible
    /// panel.
    pub fn on_frame(&mut self, frame: FrameId) -> Option<bool> {
        let pending = self.pending.filter(|p| p.id == frame)?;
        self.pending = None;
        if self.visible != pending.visible {
            self.visible = pending.visible;
            debug!("panel {:?}: visible={}", self.element, self.visible);
        }
        Some(self.visible)
    }

    /// Recompute and reapply placement while a tracker is active.
    ///
    /// Returns `true` if the position changed.
    pub fn reposition<E: FloatingEnv<K>>(&mut self, env: &mut E) -> bool {
        if self.tracker.is_none() {
            return false;
        }
        let Some(anchor) = self.anchor else {
            return false;
        };
        let Some(reference) = anchor.resolve(|k| env.anchor_rect(k)) else {
            return false;
        };
        let size = env.floating_size(&self.element);
        match env.compute_position(reference, size, &self.options) {
            Ok(result) if self.position != Some(result) => {
                self.position = Some(result);
                true
            }
            Ok(_) => false,
            Err(err) => {
                warn!("panel {:?}: repositioning failed: {err}", self.element);
                false
            }
        }
    }

    /// Start tracking the current anchor, replacing any active tracker.
    ///
    /// Returns `false` if the panel has no anchor.
    pub fn start_tracking<E: FloatingEnv<K>>(&mut self, env: &mut E) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        self.stop_tracking(env);
        self.tracker = Some(env.start_auto_update(&self.element, &anchor));
        true
    }

    /// Stop the active tracker. Returns `false` if none was active.
    pub fn stop_tracking<E: FloatingEnv<K>>(&mut self, env: &mut E) -> bool {
        match self.tracker.take() {
            Some(t) => {
                env.stop_auto_update(t);
                true
            }
            None => false,
        }
    }

    /// Tear down when the element leaves the document.
    ///
    /// Cancels the pending frame and the tracker and resets to hidden.
    pub fn detach<E: FloatingEnv<K>>(&mut self, env: &mut E) {
        self.cancel_pending(env);
        self.stop_tracking(env);
        self.visible = false;
        self.anchor = None;
        self.position = None;
    }

    fn schedule<E: FloatingEnv<K>>(&mut self, visible: bool, env: &mut E) {
        let id = env.request_frame();
        self.pending = Some(PendingFrame { id, visible });
    }

    fn cancel_pending<E: FloatingEnv<K>>(&mut self, env: &mut E) -> bool {
        match self.pending.take() {
            Some(p) => {
                env.cancel_frame(p.id);
                true
            }
            None => false,
        }
    }
}

impl<K: Copy + Debug> Positionable<K> for FloatingPanel<K> {
    fn show<E: FloatingEnv<K>>(
        &mut self,
        anchor: Option<AnchorRef<K>>,
        track: bool,
        env: &mut E,
    ) -> bool {
        Self::show(self, anchor, track, env)
    }

    fn hide<E: FloatingEnv<K>>(&mut self, env: &mut E) -> bool {
        Self::hide(self, env)
    }

    fn reposition<E: FloatingEnv<K>>(&mut self, env: &mut E) -> bool {
        Self::reposition(self, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{AutoPlacement, PositionError};
    use alloc::vec::Vec;
    use kurbo::{Rect, Size};

    #[derive(Default)]
    struct Env {
        next: u64,
        frames: Vec<FrameId>,
        trackers: Vec<TrackerId>,
        missing: bool,
        fail: bool,
        anchor_x: f64,
    }

    impl FloatingEnv<u32> for Env {
        fn anchor_rect(&self, _element: &u32) -> Option<Rect> {
            (!self.missing).then(|| Rect::new(self.anchor_x, 10.0, self.anchor_x + 50.0, 30.0))
        }
        fn floating_size(&self, _panel: &u32) -> Size {
            Size::new(100.0, 80.0)
        }
        fn viewport(&self) -> Rect {
            Rect::new(0.0, 0.0, 800.0, 600.0)
        }
        fn request_frame(&mut self) -> FrameId {
            self.next += 1;
            let id = FrameId(self.next);
            self.frames.push(id);
            id
        }
        fn cancel_frame(&mut self, frame: FrameId) {
            self.frames.retain(|f| *f != frame);
        }
        fn start_auto_update(&mut self, _panel: &u32, _anchor: &AnchorRef<u32>) -> TrackerId {
            self.next += 1;
            let id = TrackerId(self.next);
            self.trackers.push(id);
            id
        }
        fn stop_auto_update(&mut self, tracker: TrackerId) {
            self.trackers.retain(|t| *t != tracker);
        }
        fn compute_position(
            &self,
            reference: Rect,
            floating: Size,
            options: &PositionOptions,
        ) -> Result<PlacementResult, PositionError> {
            if self.fail {
                return Err(PositionError::NonFiniteReference);
            }
            crate::compute_position(reference, floating, self.viewport(), options)
        }
    }

    fn run_frames(env: &mut Env, panel: &mut FloatingPanel<u32>) {
        for f in core::mem::take(&mut env.frames) {
            panel.on_frame(f);
        }
    }

    #[test]
    fn show_without_anchor_is_a_no_op() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        assert!(!panel.show(None, true, &mut env));
        assert!(env.frames.is_empty());
        assert!(env.trackers.is_empty());
        assert!(!panel.is_showing());
    }

    #[test]
    fn unresolvable_element_is_a_no_op() {
        let mut env = Env {
            missing: true,
            ..Env::default()
        };
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        assert!(!panel.show(Some(AnchorRef::Element(2)), true, &mut env));
        assert!(panel.anchor().is_none());
    }

    #[test]
    fn visibility_flips_on_the_frame_not_before() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        assert!(panel.show(Some(AnchorRef::Element(2)), true, &mut env));
        assert!(!panel.is_visible());
        assert!(panel.is_showing());
        assert_eq!(panel.transform_origin(), TransformOrigin::CenterTop);
        run_frames(&mut env, &mut panel);
        assert!(panel.is_visible());
        assert_eq!(panel.style().top, 30.0);
    }

    #[test]
    fn repeated_show_keeps_one_tracker_and_one_frame() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        panel.show(Some(AnchorRef::Element(2)), true, &mut env);
        panel.show(Some(AnchorRef::Element(3)), true, &mut env);
        assert_eq!(env.trackers.len(), 1);
        assert_eq!(env.frames.len(), 1);
        assert_eq!(panel.tracker(), env.trackers.first().copied());
        assert_eq!(panel.anchor(), Some(&AnchorRef::Element(3)));
    }

    #[test]
    fn hide_before_frame_cancels_show() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        panel.show(Some(AnchorRef::Element(2)), true, &mut env);
        assert!(panel.hide(&mut env));
        assert!(env.frames.is_empty());
        assert!(env.trackers.is_empty());
        assert!(!panel.is_visible());
        assert!(!panel.hide(&mut env));
    }

    #[test]
    fn hide_after_show_flips_on_next_frame() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        panel.show(Some(AnchorRef::Element(2)), true, &mut env);
        run_frames(&mut env, &mut panel);
        assert!(panel.hide(&mut env));
        assert!(panel.is_visible());
        assert!(!panel.is_showing());
        assert!(env.trackers.is_empty());
        run_frames(&mut env, &mut panel);
        assert!(!panel.is_visible());
    }

    #[test]
    fn stale_frame_is_ignored() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        panel.show(Some(AnchorRef::Element(2)), false, &mut env);
        let first = env.frames[0];
        panel.show(Some(AnchorRef::Element(2)), false, &mut env);
        assert_eq!(panel.on_frame(first), None);
        assert!(!panel.is_visible());
    }

    #[test]
    fn show_superseding_hide_lands_on_visible_panel() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        panel.show(Some(AnchorRef::Element(2)), false, &mut env);
        run_frames(&mut env, &mut panel);
        panel.hide(&mut env);
        panel.show(Some(AnchorRef::Element(2)), false, &mut env);
        let frame = env.frames[0];
        assert_eq!(panel.on_frame(frame), Some(true));
        assert!(panel.is_visible());
    }

    #[test]
    fn reposition_follows_anchor_only_while_tracking() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        panel.show(Some(AnchorRef::Element(2)), false, &mut env);
        env.anchor_x = 40.0;
        assert!(!panel.reposition(&mut env));

        panel.show(Some(AnchorRef::Element(2)), true, &mut env);
        env.anchor_x = 90.0;
        assert!(panel.reposition(&mut env));
        assert_eq!(panel.style().left, 90.0);
        assert!(!panel.reposition(&mut env));
    }

    #[test]
    fn geometry_failure_leaves_panel_hidden() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        panel.show(Some(AnchorRef::Element(2)), true, &mut env);
        run_frames(&mut env, &mut panel);

        env.fail = true;
        assert!(!panel.show(Some(AnchorRef::Element(2)), true, &mut env));
        assert!(env.trackers.is_empty());
        assert!(panel.position().is_none());
        run_frames(&mut env, &mut panel);
        assert!(!panel.is_visible());
    }

    #[test]
    fn detach_cancels_frame_and_tracker() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        panel.show(Some(AnchorRef::Element(2)), true, &mut env);
        panel.detach(&mut env);
        assert!(env.frames.is_empty());
        assert!(env.trackers.is_empty());
        assert!(panel.pending_frame().is_none());
    }

    #[test]
    fn start_tracking_replaces_existing_tracker() {
        let mut env = Env::default();
        let mut panel = FloatingPanel::new(1, PositionOptions::default());
        assert!(!panel.start_tracking(&mut env));
        panel.show(Some(AnchorRef::Element(2)), true, &mut env);
        assert!(panel.start_tracking(&mut env));
        assert_eq!(env.trackers.len(), 1);
    }

    #[test]
    fn positionable_is_usable_generically() {
        fn open<P: Positionable<u32>>(p: &mut P, env: &mut Env) -> bool {
            p.show(Some(AnchorRef::at(120.0, 80.0)), false, env)
        }
        let mut env = Env::default();
        let options = PositionOptions::default().with_auto_placement(AutoPlacement::corners());
        let mut panel = FloatingPanel::new(1, options);
        assert!(open(&mut panel, &mut env));
        assert_eq!(panel.placement(), Some(Placement::BottomStart));
    }
}
