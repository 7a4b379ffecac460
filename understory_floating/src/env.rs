// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host services a floating panel depends on.

use kurbo::{Rect, Size};

use crate::anchor::AnchorRef;
use crate::position::{PlacementResult, PositionError, PositionOptions, compute_position};

/// Handle of a requested animation frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// Handle of an active position-tracking subscription.
///
/// A tracker watches an anchor and the viewport (resize, scroll, anchor
/// mutation) and asks the host to call
/// [`FloatingPanel::reposition`](crate::FloatingPanel::reposition) whenever
/// one changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackerId(pub u64);

/// The environment a floating panel runs in.
///
/// Hosts implement this over their real document, window and scheduler. The
/// panel never keeps references into the host; everything it learns comes
/// through these calls, and everything it holds (frame and tracker handles)
/// it hands back for cancellation.
///
/// Cancel calls must be idempotent: cancelling a frame that already ran or a
/// tracker that is already stopped is a no-op.
pub trait FloatingEnv<K> {
    /// Current bounding rectangle of an element, or `None` if it is not laid out.
    fn anchor_rect(&self, element: &K) -> Option<Rect>;

    /// Measured size of a panel element.
    fn floating_size(&self, panel: &K) -> Size;

    /// The clipping viewport that placement should respect.
    fn viewport(&self) -> Rect;

    /// Request an animation frame; the host later calls back with the id.
    fn request_frame(&mut self) -> FrameId;

    /// Cancel a requested frame.
    fn cancel_frame(&mut self, frame: FrameId);

    /// Start tracking `anchor` on behalf of `panel`.
    fn start_auto_update(&mut self, panel: &K, anchor: &AnchorRef<K>) -> TrackerId;

    /// Stop a tracker.
    fn stop_auto_update(&mut self, tracker: TrackerId);

    /// Run the geometry engine.
    ///
    /// Defaults to the crate's [`compute_position`]; override to delegate to
    /// another engine.
    fn compute_position(
        &self,
        reference: Rect,
        floating: Size,
        options: &PositionOptions,
    ) -> Result<PlacementResult, PositionError> {
        compute_position(reference, floating, self.viewport(), options)
    }
}
