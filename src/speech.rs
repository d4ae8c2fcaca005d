//! Speech output throttling.
//!
//! The speech engine itself is external (a platform TTS service behind the [`Synthesizer`]
//! trait). The throttle decides *whether* a requested announcement actually reaches the engine:
//! never while an utterance is still playing, and the same label is repeated only after a
//! configurable quiet interval.

use std::time::Duration;

use pawawwewism::{promise, Promise, PromiseHandle};

/// The external speech engine.
pub trait Synthesizer {
    /// Starts speaking `text` and fulfills `done` when the utterance has finished playing.
    ///
    /// Called fire-and-forget: the throttle never cancels an utterance. Dropping `done`
    /// unfulfilled counts as completion.
    fn speak(&mut self, text: &str, done: Promise<()>);
}

/// Decides when a candidate label is actually spoken.
pub struct SpeechThrottle {
    synth: Box<dyn Synthesizer>,
    interval: Duration,
    last_label: Option<String>,
    last_spoken_at: Duration,
    in_flight: Option<PromiseHandle<()>>,
}

impl SpeechThrottle {
    /// Minimum quiet time before the same label is announced again.
    pub const DEFAULT_SPEAK_INTERVAL: Duration = Duration::from_millis(1000);

    pub fn new<S: Synthesizer + 'static>(synth: S) -> Self {
        Self {
            synth: Box::new(synth),
            interval: Self::DEFAULT_SPEAK_INTERVAL,
            last_label: None,
            last_spoken_at: Duration::ZERO,
            in_flight: None,
        }
    }

    pub fn set_speak_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Whether an utterance is still playing.
    pub fn is_speaking(&mut self) -> bool {
        match &self.in_flight {
            Some(handle) if handle.will_block() => true,
            Some(_) => {
                // The engine signalled completion since the last check.
                self.in_flight = None;
                false
            }
            None => false,
        }
    }

    /// Requests that `label` be announced at stream time `now`.
    ///
    /// `None` means "not pointing at anything": it clears the last-spoken label (so the next
    /// real label is announced immediately) and emits nothing.
    ///
    /// A request is dropped, without updating any state, while an utterance is in flight. A
    /// changed label is emitted immediately; an unchanged one only when more than the speak
    /// interval has passed since it was last emitted.
    pub fn announce(&mut self, label: Option<&str>, now: Duration) {
        let Some(label) = label else {
            self.last_label = None;
            return;
        };

        if self.is_speaking() {
            return;
        }

        match &self.last_label {
            Some(last) if last == label => {
                if now.saturating_sub(self.last_spoken_at) > self.interval {
                    self.emit(label, now);
                }
            }
            _ => self.emit(label, now),
        }
    }

    fn emit(&mut self, label: &str, now: Duration) {
        log::debug!("speaking '{label}' at {now:?}");
        let (done, handle) = promise();
        self.synth.speak(label, done);
        self.in_flight = Some(handle);
        self.last_label = Some(label.to_string());
        self.last_spoken_at = now;
    }
}
