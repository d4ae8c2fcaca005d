//! Yubisashi: point at real-world objects and hear their names.
//!
//! A camera feed is periodically run through a pretrained object-detection model and a
//! pretrained hand-gesture-recognition model, both living in an external vision-task runtime.
//! Holding up specific hand gestures swaps the active detection model; pointing the index finger
//! at a detected object announces its label through an external speech synthesizer.
//!
//! The crate contains no inference, capture, or drawing code of its own. It owns the decisions
//! in between: when to poll the models ([`timer::IntervalGate`]), when a gesture is stable
//! enough to act on ([`debounce::GestureDebouncer`]), which model to switch to
//! ([`registry::ModelRegistry`]), which box the user is pointing at
//! ([`arbiter::PointingArbiter`]), and when to actually speak ([`speech::SpeechThrottle`]).
//! [`session::Session`] wires these together behind two tick entry points.
//!
//! # Environment Variables
//!
//! * `YUBISASHI_CAMERA`: Forces the video input device to use, by label, overriding both the
//!   persisted device selection and enumeration order.

use log::LevelFilter;

pub mod arbiter;
pub mod debounce;
pub mod detection;
pub mod gesture;
pub mod rect;
pub mod registry;
pub mod render;
pub mod session;
pub mod speech;
pub mod timer;
pub mod video;
pub mod vision;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this crate will log at *debug* level; `RUST_LOG` overrides the
/// configuration as usual.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
