//! Pointing arbitration.
//!
//! Decides which detected object, if any, the user is pointing at: the index fingertip of the
//! first visible hand is the pointing locus, and the candidate boxes are tested against it in
//! the order the detector produced them.

use crate::detection::{Detection, Detections};
use crate::gesture::{GestureResult, DEFAULT_POINTING_GESTURES};
use crate::video::Resolution;

/// Selects the detection under the user's index fingertip.
#[derive(Debug, Clone)]
pub struct PointingArbiter {
    pointing_gestures: Vec<String>,
}

impl PointingArbiter {
    /// Creates an arbiter with the given set of pointing gesture names.
    pub fn new(pointing_gestures: impl IntoIterator<Item = String>) -> Self {
        Self {
            pointing_gestures: pointing_gestures.into_iter().collect(),
        }
    }

    /// Whether `result` contains a hand currently making a pointing gesture.
    ///
    /// Every visible hand's top candidate is considered, not just the first hand's.
    pub fn is_pointing(&self, result: &GestureResult) -> bool {
        result
            .top_names()
            .any(|name| self.pointing_gestures.iter().any(|g| g == name))
    }

    /// Picks the detection being pointed at.
    ///
    /// Returns [`None`] when no gesture result is available, no pointing gesture is visible, or
    /// no box passes the geometric test. `detections` must already be in canvas coordinates.
    ///
    /// A box passes when the locus lies strictly between its left and right edges and the box
    /// sits strictly above the fingertip (`bottom < locus.y`, with the canvas Y axis pointing
    /// down). The *first* passing box in detection order wins; scores never break ties, so the
    /// result is independent of any confidence comparison.
    pub fn select<'a>(
        &self,
        gestures: Option<&GestureResult>,
        detections: &'a Detections,
        canvas: Resolution,
    ) -> Option<&'a Detection> {
        let result = gestures?;
        if !self.is_pointing(result) {
            return None;
        }
        let locus = result.pointing_locus(canvas)?;

        detections.iter().find(|det| {
            let rect = det.bounding_rect();
            rect.x() < locus.x && rect.right() > locus.x && rect.bottom() < locus.y
        })
    }
}

impl Default for PointingArbiter {
    fn default() -> Self {
        Self::new(DEFAULT_POINTING_GESTURES.iter().map(|s| s.to_string()))
    }
}
