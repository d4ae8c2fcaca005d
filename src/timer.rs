//! Performance measurement and rate limiting tools.

use std::{
    cell::Cell,
    fmt,
    time::{Duration, Instant},
};

use itertools::Itertools;

/// A timer that can measure and average the time an operation takes.
///
/// Collected timings are averaged and reset when the timer is displayed using `{}`
/// ([`std::fmt::Display`]).
pub struct Timer {
    name: &'static str,
    total: Cell<Duration>,
    count: Cell<usize>,
}

impl Timer {
    /// Creates a new timer.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            total: Cell::new(Duration::ZERO),
            count: Cell::new(0),
        }
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&self, timee: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        timee()
    }

    /// Starts timing an operation using a drop guard.
    ///
    /// When the returned [`TimerGuard`] is dropped, the time between the call to `start` and the
    /// drop is measured and recorded.
    pub fn start(&self) -> TimerGuard<'_> {
        TimerGuard {
            start: Instant::now(),
            timer: self,
        }
    }

    fn stop(&self, start: Instant) {
        self.total.set(self.total.get() + start.elapsed());
        self.count.set(self.count.get() + 1);
    }
}

/// Displays the average recorded time and resets it.
impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total.replace(Duration::ZERO);
        let count = self.count.replace(0);
        let avg_ms = if count == 0 {
            0.0
        } else {
            total.as_secs_f32() * 1000.0 / count as f32
        };

        write!(f, "{}: {count}x{avg_ms:.01}ms", self.name)
    }
}

/// Guard returned by [`Timer::start`]. Stops timing the operation when dropped.
pub struct TimerGuard<'a> {
    start: Instant,
    timer: &'a Timer,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.timer.stop(self.start);
    }
}

/// Logs frames per second with optional extra data.
pub struct FpsCounter {
    name: String,
    frames: u32,
    start: Instant,
}

impl FpsCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            frames: 0,
            start: Instant::now(),
        }
    }

    /// Advances the frame counter by 1 and logs FPS if one second has passed.
    pub fn tick(&mut self) {
        self.tick_with::<&Timer, [&Timer; 0]>([]);
    }

    /// Advances the frame counter by 1 and logs FPS and `extra` data if one second has passed.
    pub fn tick_with<D: fmt::Display, I: IntoIterator<Item = D>>(&mut self, extra: I) {
        self.frames += 1;
        if self.start.elapsed() > Duration::from_secs(1) {
            let mut extra = extra.into_iter().peekable();
            if extra.peek().is_none() {
                log::debug!("{}: {} FPS", self.name, self.frames);
            } else {
                log::debug!(
                    "{}: {} FPS ({})",
                    self.name,
                    self.frames,
                    extra.format(", "),
                );
            }

            self.frames = 0;
            self.start = Instant::now();
        }
    }
}

/// Rate-limits an operation to a fixed wall-clock interval.
///
/// Time is supplied by the caller as a monotonic stream clock, the same one that timestamps
/// video frames, so gating behaves deterministically in tests.
#[derive(Debug, Clone)]
pub struct IntervalGate {
    interval: Duration,
    last: Option<Duration>,
}

impl IntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Reports whether the operation may run at stream time `now`.
    ///
    /// The first call is always admitted. A call is rejected while less than the configured
    /// interval has passed since the last *admitted* call; rejected calls do not affect later
    /// decisions.
    pub fn admit(&mut self, now: Duration) -> bool {
        match self.last {
            Some(last) if now.saturating_sub(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
