//! ## rendbench-core::time
//! **Clocks & frame-rate conversion**
//!
//! The benchmark runner never reads wall time directly: it asks a `Clock`, so a
//! stub engine can share a virtual clock with the runner and charge an exact cost
//! per frame.

use std::time::{Duration, Instant};

/// Source of monotonic timestamps, measured from an arbitrary epoch.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Converts one frame's elapsed time into a rate.
///
/// A non-positive elapsed time reports 0, not infinity: the sample is a
/// measurement guard, not a meaningful reading.
#[inline]
pub fn frames_per_second(elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        1.0 / elapsed_secs
    } else {
        0.0
    }
}

/// Arithmetic mean of the samples; NaN for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}
