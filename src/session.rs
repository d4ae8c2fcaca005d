//! The point-and-tell session.
//!
//! [`Session`] ties the pipeline together and is driven by two periodic callbacks on a single
//! execution context: [`poll`](Session::poll) runs once per camera frame (inference is
//! interval-gated internally), [`render`](Session::render) runs once per displayed frame.

use std::time::Duration;

use itertools::Itertools;

use crate::arbiter::PointingArbiter;
use crate::debounce::GestureDebouncer;
use crate::detection::Detections;
use crate::gesture::GestureResult;
use crate::registry::ModelRegistry;
use crate::render::{Align, Canvas, Color};
use crate::speech::{SpeechThrottle, Synthesizer};
use crate::timer::{FpsCounter, IntervalGate, Timer};
use crate::video::{Frame, Resolution};
use crate::vision::{GestureRecognizer, RunningMode};

const FINGERTIP_COLOR: Color = Color::from_rgb8(100, 150, 210);
const FINGERTIP_RADIUS: f32 = 5.0;
const GESTURE_LABEL_SIZE: f32 = 32.0;

/// Orchestrates detection polling, gesture-driven model switching, pointing arbitration, and
/// speech output.
pub struct Session {
    registry: ModelRegistry,
    recognizer: Box<dyn GestureRecognizer>,
    debouncer: GestureDebouncer,
    arbiter: PointingArbiter,
    speech: SpeechThrottle,
    gate: IntervalGate,
    /// The model the session last saw active; a change means a freshly loaded detector that is
    /// still in image mode.
    last_model: Option<String>,
    video_mode: bool,
    /// Latest detections, in the coordinate space of the producing frame.
    latest: Option<(Detections, Resolution)>,
    gestures: Option<GestureResult>,
    fps: FpsCounter,
    t_detect: Timer,
    t_recognize: Timer,
}

impl Session {
    /// Minimum wall-clock time between two inference passes.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(800);

    pub fn new<R, S>(registry: ModelRegistry, recognizer: R, synth: S) -> Self
    where
        R: GestureRecognizer + 'static,
        S: Synthesizer + 'static,
    {
        Self {
            registry,
            recognizer: Box::new(recognizer),
            debouncer: GestureDebouncer::default(),
            arbiter: PointingArbiter::default(),
            speech: SpeechThrottle::new(synth),
            gate: IntervalGate::new(Self::DEFAULT_POLL_INTERVAL),
            last_model: None,
            video_mode: false,
            latest: None,
            gestures: None,
            fps: FpsCounter::new("vision poll"),
            t_detect: Timer::new("detect"),
            t_recognize: Timer::new("recognize"),
        }
    }

    /// Sets the minimum time between inference passes.
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.gate = IntervalGate::new(interval);
    }

    /// Sets the number of consecutive frames a gesture must be recognized for before it switches
    /// the model. Resets any progress.
    pub fn set_gesture_threshold(&mut self, threshold: u32) {
        self.debouncer = GestureDebouncer::new(threshold);
    }

    /// Sets the minimum quiet time before the same label is announced again.
    pub fn set_speak_interval(&mut self, interval: Duration) {
        self.speech.set_speak_interval(interval);
    }

    /// Replaces the set of gesture names that count as pointing.
    pub fn set_pointing_gestures(&mut self, gestures: impl IntoIterator<Item = String>) {
        self.arbiter = PointingArbiter::new(gestures);
    }

    /// Forwards a confidence threshold change to the active detector.
    ///
    /// Only the currently loaded model is affected; a later model switch starts from the default
    /// threshold again.
    pub fn set_score_threshold(&mut self, threshold: f32) {
        let Some(detector) = self.registry.detector_mut() else {
            log::warn!("cannot set score threshold: no detection model loaded");
            return;
        };
        if let Err(e) = detector.set_score_threshold(threshold) {
            log::error!("failed to set score threshold: {e:#}");
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ModelRegistry {
        &mut self.registry
    }

    /// Runs one inference pass over `frame`, if one is due.
    ///
    /// `now` is the monotonic stream clock also used for [`render`](Session::render). The pass
    /// is skipped entirely when the poll interval has not elapsed, while a model switch is in
    /// flight, or before the first model finishes loading. Inference failures are logged and the
    /// results of the last successful pass stay in effect.
    pub fn poll(&mut self, frame: &Frame, now: Duration) {
        if !self.gate.admit(now) {
            return;
        }

        self.registry.poll();

        // A completed switch hands us a fresh detector that still has to be put into video mode.
        let active = self.registry.active_model().map(String::from);
        if active != self.last_model {
            self.last_model = active;
            self.video_mode = false;
        }

        if self.registry.is_switching() {
            return;
        }
        let Some(detector) = self.registry.detector_mut() else {
            log::debug!("no detection model loaded yet");
            return;
        };

        if !self.video_mode {
            match detector.set_running_mode(RunningMode::Video) {
                Ok(()) => self.video_mode = true,
                Err(e) => {
                    log::error!("failed to put detector into video mode: {e:#}");
                    return;
                }
            }
        }

        match self.t_detect.time(|| detector.detect(frame, now)) {
            Ok(detections) => {
                log::trace!("{} detections", detections.len());
                self.latest = Some((detections, frame.resolution()));
            }
            Err(e) => {
                log::error!("object detection failed: {e:#}");
                return;
            }
        }

        match self.t_recognize.time(|| self.recognizer.recognize(frame, now)) {
            Ok(result) => {
                log::trace!("gestures: [{}]", result.top_names().format(", "));
                self.gestures = Some(result);
            }
            Err(e) => log::error!("gesture recognition failed: {e:#}"),
        }

        if let Some(result) = &self.gestures {
            for name in result.top_names() {
                if self.debouncer.observe(name) {
                    self.registry.request_switch_for(name);
                }
            }
        }

        self.fps.tick_with([&self.t_detect, &self.t_recognize]);
    }

    /// Draws the overlay for one displayed frame and drives speech output.
    pub fn render(&mut self, canvas: &mut dyn Canvas, now: Duration) {
        let resolution = canvas.resolution();

        if let Some(gestures) = &self.gestures {
            if let Some(locus) = gestures.pointing_locus(resolution) {
                canvas.circle(locus.x, locus.y, FINGERTIP_RADIUS, FINGERTIP_COLOR);
            }
        }

        let scaled = self.latest.as_ref().map(|(detections, frame_res)| {
            let mut scaled = detections.clone();
            scaled.rescale(*frame_res, resolution);
            scaled
        });
        let selected = scaled.as_ref().and_then(|detections| {
            self.arbiter
                .select(self.gestures.as_ref(), detections, resolution)
        });

        match selected {
            Some(detection) => {
                detection.draw(canvas);
                self.speech
                    .announce(Some(detection.top_category().name()), now);
            }
            None => self.speech.announce(None, now),
        }

        if let Some(gesture) = self.gestures.as_ref().and_then(|g| g.top_gesture()) {
            canvas.text(
                resolution.width() as f32 / 2.0,
                resolution.height() as f32 / 2.0,
                GESTURE_LABEL_SIZE,
                Align::Center,
                gesture.name(),
                Color::WHITE,
            );
        }
    }
}
