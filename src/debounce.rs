//! Gesture debouncing.
//!
//! Raw per-frame gesture observations are noisy: a single misclassified frame must not swap the
//! detection model. [`GestureDebouncer`] turns the observation stream into "stable gesture"
//! events by requiring a minimum number of *consecutive* identical observations.

use std::collections::HashMap;

/// Counts consecutive gesture observations and fires once a gesture has been seen often enough.
///
/// Counter policy: observing gesture `g` zeroes the counters of all *other* gestures before
/// incrementing `g`'s counter, so at most one counter is non-zero at any time. A frame without
/// any observation leaves all counters untouched; only a competing observation discards progress.
///
/// When `g`'s counter reaches the threshold, [`GestureDebouncer::observe`] returns `true` exactly
/// once and `g`'s counter restarts at zero.
#[derive(Debug, Clone)]
pub struct GestureDebouncer {
    counters: HashMap<String, u32>,
    threshold: u32,
}

impl GestureDebouncer {
    /// The number of consecutive recognitions required before a gesture fires.
    ///
    /// A threshold of 1 makes every observation fire immediately.
    pub const DEFAULT_THRESHOLD: u32 = 1;

    /// Creates a debouncer that fires after `threshold` consecutive observations.
    ///
    /// # Panics
    ///
    /// Panics when `threshold` is 0.
    pub fn new(threshold: u32) -> Self {
        assert!(threshold != 0, "gesture threshold must be at least 1");
        Self {
            counters: HashMap::new(),
            threshold,
        }
    }

    /// Records one observation of `name` and reports whether it became stable.
    pub fn observe(&mut self, name: &str) -> bool {
        for (key, count) in self.counters.iter_mut() {
            if key != name {
                *count = 0;
            }
        }

        let count = self.counters.entry(name.to_string()).or_insert(0);
        *count += 1;
        log::trace!("gesture {name}: {count}/{}", self.threshold);

        if *count >= self.threshold {
            *count = 0;
            true
        } else {
            false
        }
    }

    /// Returns the current consecutive-observation count for `name`.
    pub fn count(&self, name: &str) -> u32 {
        self.counters.get(name).copied().unwrap_or(0)
    }
}

impl Default for GestureDebouncer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
