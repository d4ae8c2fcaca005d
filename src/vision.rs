//! Interface to the external vision-task runtime.
//!
//! Object detection and gesture recognition are not performed by this crate. Both are delegated
//! to an external runtime that loads pretrained models and runs inference; the traits in this
//! module are the narrow seam between that runtime and the orchestration logic.

use std::time::Duration;

use crate::detection::Detections;
use crate::gesture::GestureResult;
use crate::video::Frame;

/// A classification result: a category name with a confidence score.
///
/// Used both for detection bounding boxes and for gesture candidates. Per convention, the score
/// lies between 0.0 and 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    name: String,
    score: f32,
}

impl Category {
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }
}

/// Inference acceleration preference, forwarded verbatim to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Delegate {
    Cpu,
    #[default]
    Gpu,
}

/// Whether a detector processes independent still images or a timestamped video stream.
///
/// Freshly loaded detectors start in [`RunningMode::Image`]; the session upgrades them to
/// [`RunningMode::Video`] on the first poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunningMode {
    #[default]
    Image,
    Video,
}

/// Options passed to [`DetectorLoader::load`] when a detector is created.
#[derive(Debug, Clone)]
pub struct DetectorOptions {
    delegate: Delegate,
    score_threshold: f32,
    running_mode: RunningMode,
}

impl DetectorOptions {
    pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.35;

    #[inline]
    pub fn delegate(mut self, delegate: Delegate) -> Self {
        self.delegate = delegate;
        self
    }

    /// Sets the minimum confidence a detection needs to be reported.
    #[inline]
    pub fn score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    #[inline]
    pub fn running_mode(mut self, mode: RunningMode) -> Self {
        self.running_mode = mode;
        self
    }

    #[inline]
    pub fn get_delegate(&self) -> Delegate {
        self.delegate
    }

    #[inline]
    pub fn get_score_threshold(&self) -> f32 {
        self.score_threshold
    }

    #[inline]
    pub fn get_running_mode(&self) -> RunningMode {
        self.running_mode
    }
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            delegate: Delegate::default(),
            score_threshold: Self::DEFAULT_SCORE_THRESHOLD,
            running_mode: RunningMode::default(),
        }
    }
}

/// A loaded object-detection model.
///
/// Implementations wrap a runtime handle for one model. Dropping the value must release the
/// resources held by the model; the registry relies on this when it installs a replacement.
pub trait ObjectDetector: Send {
    /// Runs detection on a video frame.
    ///
    /// `timestamp` is the frame's position on the caller's monotonic stream clock. It must be
    /// strictly increasing across calls in [`RunningMode::Video`].
    ///
    /// Returned bounding boxes are in `frame`'s coordinate space and ordered by the runtime;
    /// the order is preserved by everything downstream.
    fn detect(&mut self, frame: &Frame, timestamp: Duration) -> anyhow::Result<Detections>;

    /// Changes the minimum reported confidence without reloading the model.
    fn set_score_threshold(&mut self, threshold: f32) -> anyhow::Result<()>;

    fn set_running_mode(&mut self, mode: RunningMode) -> anyhow::Result<()>;
}

/// A loaded hand-gesture-recognition model.
pub trait GestureRecognizer {
    /// Runs gesture recognition on a video frame. See [`ObjectDetector::detect`] for the
    /// `timestamp` contract.
    fn recognize(&mut self, frame: &Frame, timestamp: Duration) -> anyhow::Result<GestureResult>;
}

/// Creates [`ObjectDetector`]s from model paths.
///
/// Loading can take noticeable wall-clock time, so the registry calls this on a worker thread.
pub trait DetectorLoader: Send + 'static {
    fn load(
        &mut self,
        model_path: &str,
        options: &DetectorOptions,
    ) -> anyhow::Result<Box<dyn ObjectDetector>>;
}
