//! Scrubber pointer handling.
//!
//! Converts pointer positions within the track's bounding rectangle into
//! normalized positions, for both click-to-seek and press-and-drag.

use tracing::debug;

/// Horizontal extent of the scrubber track as painted on screen.
///
/// This is the actual (post-zoom) rectangle, so seek math stays correct
/// whatever stretch the track is drawn with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackBounds {
    pub left: f32,
    pub width: f32,
}

impl TrackBounds {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }
}

/// Where a pointer press landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrubTarget {
    /// The bare track
    Track,
    /// The draggable handle
    Handle,
}

/// Convert a pointer x coordinate to a fraction of the track, clamped to `[0, 1]`.
pub fn pointer_fraction(pointer_x: f32, bounds: TrackBounds) -> f32 {
    if bounds.width.is_nan() || bounds.width <= 0.0 || !pointer_x.is_finite() {
        return 0.0;
    }
    ((pointer_x - bounds.left) / bounds.width).clamp(0.0, 1.0)
}

/// A live drag on the handle.
///
/// Holding the gesture is what lets pointer movement reach the scrubber;
/// it is released exactly once, on pointer release or when the control
/// is dropped.
#[derive(Debug)]
pub struct DragGesture {
    last_fraction: Option<f32>,
}

/// Scrubber state: at most one drag gesture at a time.
#[derive(Debug, Default)]
pub struct ScrubberControl {
    gesture: Option<DragGesture>,
}

impl ScrubberControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Click-to-seek. Clicks that land on the handle are ignored.
    pub fn click(&self, target: ScrubTarget, pointer_x: f32, bounds: TrackBounds) -> Option<f32> {
        match target {
            ScrubTarget::Track => Some(pointer_fraction(pointer_x, bounds)),
            ScrubTarget::Handle => None,
        }
    }

    /// Press on the handle: start tracking pointer movement.
    pub fn begin_drag(&mut self) {
        if self.gesture.is_none() {
            debug!("scrub drag started");
            self.gesture = Some(DragGesture {
                last_fraction: None,
            });
        }
    }

    /// Pointer moved during a drag. Returns the new fraction when it changed.
    ///
    /// The pointer may be anywhere on screen; the result is still clamped.
    pub fn drag_to(&mut self, pointer_x: f32, bounds: TrackBounds) -> Option<f32> {
        let gesture = self.gesture.as_mut()?;
        let fraction = pointer_fraction(pointer_x, bounds);
        if gesture.last_fraction == Some(fraction) {
            return None;
        }
        gesture.last_fraction = Some(fraction);
        Some(fraction)
    }

    /// Pointer released: end the drag. Returns whether a gesture was released.
    pub fn end_drag(&mut self) -> bool {
        let released = self.gesture.take().is_some();
        if released {
            debug!("scrub drag ended");
        }
        released
    }
}
