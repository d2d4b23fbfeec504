//!
//! Prints progress information for procedures of unknown length, such as the
//! completion loop, without flooding the log.
//!

use std::marker::PhantomData;
use std::time::Duration;
use std::time::Instant;

/// Calls the message closure at most once per interval.
pub struct TimeProgress<F: Fn(T), T> {
    interval: Duration,
    last_update: Instant,
    message: F,
    _marker: PhantomData<T>,
}

impl<F: Fn(T), T> TimeProgress<F, T> {
    /// Creates a new progress tracker that reports at most every `interval_seconds`.
    pub fn new(message: F, interval_seconds: u64) -> TimeProgress<F, T> {
        TimeProgress {
            message,
            interval: Duration::from_secs(interval_seconds),
            last_update: Instant::now(),
            _marker: PhantomData,
        }
    }

    /// Reports the given object when the interval has passed since the last report.
    pub fn print(&mut self, object: T) {
        let now = Instant::now();
        if now.duration_since(self.last_update) >= self.interval {
            (self.message)(object);
            self.last_update = now;
        }
    }
}
