//! Detection model registry and switching.
//!
//! The registry owns the active [`ObjectDetector`] and swaps it for another model when told to.
//! Loading a model can take noticeable wall-clock time, so it happens on a dedicated worker
//! thread; the tick loop observes completion through a non-blocking [`poll`](ModelRegistry::poll).
//!
//! At most one switch is in flight at any time. Requests arriving mid-switch are ignored, not
//! queued; the debounced gesture stream simply issues the request again a few frames later if the
//! user keeps holding the gesture.

use pawawwewism::{promise, Promise, PromiseHandle, Worker};

use crate::vision::{DetectorLoader, DetectorOptions, ObjectDetector};

type LoadResult = anyhow::Result<Box<dyn ObjectDetector>>;

/// The built-in gesture → model table.
pub const DEFAULT_GESTURE_MODELS: &[(&str, &str)] = &[
    ("Pointing_Up", "./models/hanyou.tflite"),
    ("Victory", "./models/mickey.tflite"),
    ("THREE", "./models/tempereture.tflite"),
    ("FOUR", "./models/container3.tflite"),
];

/// Maps gestures to detection models and performs asynchronous model switches.
pub struct ModelRegistry {
    gesture_models: Vec<(String, String)>,
    active: Option<String>,
    detector: Option<Box<dyn ObjectDetector>>,
    pending: Option<PendingSwitch>,
    loader: Worker<(String, Promise<LoadResult>)>,
}

struct PendingSwitch {
    target: String,
    handle: PromiseHandle<LoadResult>,
}

impl ModelRegistry {
    /// Creates a registry that loads models through `loader`.
    ///
    /// Every load uses a fresh copy of `options`, so runtime option changes (eg. a UI-set score
    /// threshold) do not survive a model switch.
    ///
    /// No model is active until the first [`request_switch`](Self::request_switch) completes.
    pub fn new<L: DetectorLoader>(mut loader: L, options: DetectorOptions) -> anyhow::Result<Self> {
        let worker = Worker::builder().name("model loader").spawn(
            move |(path, promise): (String, Promise<LoadResult>)| {
                promise.fulfill(loader.load(&path, &options));
            },
        )?;

        Ok(Self {
            gesture_models: DEFAULT_GESTURE_MODELS
                .iter()
                .map(|&(gesture, model)| (gesture.to_string(), model.to_string()))
                .collect(),
            active: None,
            detector: None,
            pending: None,
            loader: worker,
        })
    }

    /// Replaces the gesture → model table.
    pub fn set_gesture_models(&mut self, table: impl IntoIterator<Item = (String, String)>) {
        self.gesture_models = table.into_iter().collect();
    }

    /// Returns the model a gesture is mapped to, if any.
    pub fn gesture_model(&self, gesture: &str) -> Option<&str> {
        self.gesture_models
            .iter()
            .find(|(name, _)| name == gesture)
            .map(|(_, model)| model.as_str())
    }

    /// The path of the model currently serving detections.
    ///
    /// This changes only when a switch *completes*; while a switch is in flight the previous
    /// model is still reported (and still loaded).
    pub fn active_model(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Whether a model switch is currently in flight.
    ///
    /// Detection must not be attempted while this returns `true`.
    pub fn is_switching(&self) -> bool {
        self.pending.is_some()
    }

    /// The active detector, once the first load has completed.
    pub fn detector_mut(&mut self) -> Option<&mut (dyn ObjectDetector + '_)> {
        match self.detector.as_mut() {
            Some(boxed) => Some(boxed.as_mut()),
            None => None,
        }
    }

    /// Requests a switch to `model_path`.
    ///
    /// The request is dropped when a switch is already in flight or when `model_path` is already
    /// the active model.
    pub fn request_switch(&mut self, model_path: &str) {
        if self.pending.is_some() {
            log::debug!("ignoring switch to {model_path}: a switch is already in flight");
            return;
        }
        if self.active.as_deref() == Some(model_path) {
            return;
        }

        log::info!("switching model to {model_path}");
        let (promise, handle) = promise();
        self.loader.send((model_path.to_string(), promise));
        self.pending = Some(PendingSwitch {
            target: model_path.to_string(),
            handle,
        });
    }

    /// Requests a switch to the model mapped to `gesture`. Unmapped gestures are a no-op.
    pub fn request_switch_for(&mut self, gesture: &str) {
        let Some(target) = self.gesture_model(gesture).map(String::from) else {
            return;
        };
        log::debug!("gesture {gesture} requests model {target}");
        self.request_switch(&target);
    }

    /// Completes a finished switch, if any. Non-blocking.
    ///
    /// On success the previous detector is dropped, releasing its resources. On failure the
    /// error is logged and the previous model stays active; there is no retry.
    pub fn poll(&mut self) {
        let Some(pending) = &self.pending else { return };
        if pending.handle.will_block() {
            return;
        }

        let PendingSwitch { target, handle } = self.pending.take().unwrap();
        match handle.block() {
            Ok(Ok(detector)) => {
                self.detector = Some(detector);
                log::info!("model switched to {target}");
                self.active = Some(target);
            }
            Ok(Err(e)) => log::error!("failed to switch model to {target}: {e:#}"),
            Err(_) => log::error!("model loader dropped the request for {target}"),
        }
    }
}
