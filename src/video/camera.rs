//! Camera device discovery and selection.
//!
//! Actual capture is performed by an external collaborator implementing [`CameraHost`] and
//! [`VideoSource`]. This module only carries the negotiation data and the small amount of
//! device-selection logic: an environment override wins, then the persisted device id, then the
//! first enumerated device.

use std::env;

use anyhow::bail;

use super::{Frame, Resolution};

/// Forces the camera device to use, by label, overriding both the persisted selection and
/// enumeration order.
pub const ENV_VAR_CAMERA: &str = "YUBISASHI_CAMERA";

const STORE_KEY_DEVICE_ID: &str = "camera.device-id";

/// An enumerated video input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraInfo {
    device_id: String,
    label: String,
}

impl CameraInfo {
    pub fn new(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
        }
    }

    /// The host-assigned identifier of the device. Stable enough to persist across runs.
    #[inline]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Human-readable device name.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Stream negotiation options.
///
/// The defaults ask for a modest stream: at most 1280x720, a square aspect ratio if available,
/// and 3 frames per second. Detection polling is interval-gated anyway, so a faster stream would
/// only produce frames that get dropped.
#[derive(Debug, Clone)]
pub struct StreamConstraints {
    device_id: Option<String>,
    max_resolution: Resolution,
    ideal_aspect_ratio: f32,
    ideal_fps: u32,
    max_fps: u32,
}

impl StreamConstraints {
    /// Sets the device to open. If unset, the host picks its default device.
    #[inline]
    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    /// Sets the maximum acceptable resolution.
    #[inline]
    pub fn max_resolution(mut self, resolution: Resolution) -> Self {
        self.max_resolution = resolution;
        self
    }

    /// Sets the desired and maximum frame rate.
    #[inline]
    pub fn fps(mut self, ideal: u32, max: u32) -> Self {
        self.ideal_fps = ideal;
        self.max_fps = max;
        self
    }

    #[inline]
    pub fn get_device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    #[inline]
    pub fn get_max_resolution(&self) -> Resolution {
        self.max_resolution
    }

    #[inline]
    pub fn get_ideal_aspect_ratio(&self) -> f32 {
        self.ideal_aspect_ratio
    }

    #[inline]
    pub fn get_ideal_fps(&self) -> u32 {
        self.ideal_fps
    }

    #[inline]
    pub fn get_max_fps(&self) -> u32 {
        self.max_fps
    }
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            device_id: None,
            max_resolution: Resolution::new(1280, 720),
            ideal_aspect_ratio: 1.0,
            ideal_fps: 3,
            max_fps: 3,
        }
    }
}

/// An open camera stream yielding [`Frame`]s.
pub trait VideoSource {
    /// Reads the next frame, blocking until one is available.
    fn read(&mut self) -> anyhow::Result<Frame>;

    /// The negotiated stream resolution.
    fn resolution(&self) -> Resolution;
}

/// The camera collaborator: enumerates devices and opens streams.
pub trait CameraHost {
    fn enumerate(&mut self) -> anyhow::Result<Vec<CameraInfo>>;

    fn open(&mut self, constraints: &StreamConstraints) -> anyhow::Result<Box<dyn VideoSource>>;
}

/// Key-value persistence for small UI state, such as the last selected camera.
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Picks the device to open from an enumeration result.
///
/// Precedence: a [`ENV_VAR_CAMERA`] label match, then the persisted device id, then the first
/// device. Returns [`None`] when `devices` is empty.
pub fn select_device<'a>(devices: &'a [CameraInfo], store: &dyn Store) -> Option<&'a CameraInfo> {
    if let Ok(label) = env::var(ENV_VAR_CAMERA) {
        log::debug!("camera override: `{}` is set to '{}'", ENV_VAR_CAMERA, label);
        match devices.iter().find(|dev| dev.label() == label) {
            Some(dev) => return Some(dev),
            None => log::warn!("no camera labelled '{}' found, ignoring override", label),
        }
    }

    if let Some(id) = store.get(STORE_KEY_DEVICE_ID) {
        if let Some(dev) = devices.iter().find(|dev| dev.device_id() == id) {
            return Some(dev);
        }
        log::debug!("persisted camera '{}' is gone, falling back", id);
    }

    devices.first()
}

/// Persists `device` as the camera to prefer on the next run.
pub fn remember_device(store: &mut dyn Store, device: &CameraInfo) {
    store.set(STORE_KEY_DEVICE_ID, device.device_id());
}

/// Enumerates devices on `host`, selects one (see [`select_device`]), and opens it with
/// `constraints`.
///
/// Fails when no device is present or the host refuses the constraints; no fallback device is
/// attempted.
pub fn open_selected(
    host: &mut dyn CameraHost,
    store: &dyn Store,
    constraints: StreamConstraints,
) -> anyhow::Result<Box<dyn VideoSource>> {
    let devices = host.enumerate()?;
    let Some(device) = select_device(&devices, store) else {
        bail!("no video input devices found");
    };

    log::info!("opening camera {} ({})", device.label(), device.device_id());
    let constraints = constraints.device_id(device.device_id());
    host.open(&constraints)
}
