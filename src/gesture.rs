//! Hand gesture recognition results.
//!
//! As with object detection, recognition itself is delegated to the external vision-task runtime;
//! this module defines the result types and the landmark vocabulary.

use nalgebra::Point2;

use crate::video::Resolution;
use crate::vision::Category;

/// Gesture names that count as "pointing at something".
///
/// While one of these is visible the pointing arbiter is allowed to select a detection under the
/// index fingertip. The set doubles as the list of gestures with a model mapping, so any
/// model-switching gesture keeps the pointing interaction alive.
pub const DEFAULT_POINTING_GESTURES: &[&str] = &["Pointing_Up", "Victory", "THREE", "FOUR"];

/// Names for the hand pose landmarks.
///
/// The discriminants match the landmark indices produced by the runtime's hand models;
/// [`LandmarkIdx::IndexFingerTip`] (index 8) is the pointing locus.
///
/// # Terminology
///
/// - **CMC**: Carpometacarpal joint, the lowest joint of the thumb, located near the wrist.
/// - **MCP**: Metacarpophalangeal joint, the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// The landmark positions of one detected hand.
///
/// Positions are normalized to `[0, 1]` in both axes, relative to the input frame; multiply by
/// the canvas resolution to get canvas coordinates.
#[derive(Debug, Clone)]
pub struct HandLandmarks {
    points: Box<[Point2<f32>]>,
}

impl HandLandmarks {
    pub const NUM_LANDMARKS: usize = 21;

    /// Creates a landmark set from the runtime's per-hand point list.
    ///
    /// # Panics
    ///
    /// Panics when `points` does not contain exactly [`Self::NUM_LANDMARKS`] entries.
    pub fn new(points: Vec<Point2<f32>>) -> Self {
        assert_eq!(
            points.len(),
            Self::NUM_LANDMARKS,
            "hand landmark set has wrong length",
        );
        Self {
            points: points.into_boxed_slice(),
        }
    }

    /// Returns a landmark's normalized position.
    #[inline]
    pub fn get(&self, index: LandmarkIdx) -> Point2<f32> {
        self.points[index as usize]
    }

    pub fn positions(&self) -> impl Iterator<Item = Point2<f32>> + '_ {
        self.points.iter().copied()
    }
}

/// The gesture candidates and hand landmarks recognized in one video frame.
///
/// `gestures` and `landmarks` are parallel per-hand sequences in the runtime's hand order.
#[derive(Debug, Clone, Default)]
pub struct GestureResult {
    gestures: Vec<Vec<Category>>,
    landmarks: Vec<HandLandmarks>,
}

impl GestureResult {
    /// Creates a result from the runtime's output.
    ///
    /// Each entry of `gestures` is one hand's candidate list, ordered highest-confidence first
    /// and non-empty.
    pub fn new(gestures: Vec<Vec<Category>>, landmarks: Vec<HandLandmarks>) -> Self {
        assert!(
            gestures.iter().all(|hand| !hand.is_empty()),
            "per-hand gesture candidate lists must be non-empty",
        );
        Self {
            gestures,
            landmarks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    pub fn landmarks(&self) -> &[HandLandmarks] {
        &self.landmarks
    }

    /// Yields each hand's highest-confidence gesture name.
    pub fn top_names(&self) -> impl Iterator<Item = &str> {
        self.gestures.iter().map(|hand| hand[0].name())
    }

    /// The first hand's highest-confidence gesture, if any hand is visible.
    pub fn top_gesture(&self) -> Option<&Category> {
        self.gestures.first().map(|hand| &hand[0])
    }

    /// The pointing locus: the first hand's index fingertip, scaled into canvas coordinates.
    ///
    /// Only the first hand is considered, even when several are visible.
    pub fn pointing_locus(&self, canvas: Resolution) -> Option<Point2<f32>> {
        let hand = self.landmarks.first()?;
        let tip = hand.get(LandmarkIdx::IndexFingerTip);
        Some(Point2::new(
            tip.x * canvas.width() as f32,
            tip.y * canvas.height() as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks_with_tip(x: f32, y: f32) -> HandLandmarks {
        let mut points = vec![Point2::new(0.0, 0.0); HandLandmarks::NUM_LANDMARKS];
        points[LandmarkIdx::IndexFingerTip as usize] = Point2::new(x, y);
        HandLandmarks::new(points)
    }

    #[test]
    fn index_finger_tip_is_landmark_8() {
        assert_eq!(LandmarkIdx::IndexFingerTip as usize, 8);
    }

    #[test]
    fn locus_scales_to_canvas() {
        let result = GestureResult::new(
            vec![vec![Category::new("Pointing_Up", 0.9)]],
            vec![landmarks_with_tip(0.5, 0.25)],
        );
        let locus = result.pointing_locus(Resolution::new(400, 400)).unwrap();
        assert_eq!(locus, Point2::new(200.0, 100.0));
    }

    #[test]
    fn locus_uses_first_hand() {
        let result = GestureResult::new(
            vec![
                vec![Category::new("Victory", 0.9)],
                vec![Category::new("Open_Palm", 0.8)],
            ],
            vec![landmarks_with_tip(0.1, 0.1), landmarks_with_tip(0.9, 0.9)],
        );
        let locus = result.pointing_locus(Resolution::new(100, 100)).unwrap();
        assert_eq!(locus, Point2::new(10.0, 10.0));
    }

    #[test]
    fn no_hands_no_locus() {
        let result = GestureResult::default();
        assert!(result.pointing_locus(Resolution::new(100, 100)).is_none());
        assert!(result.top_gesture().is_none());
    }
}
