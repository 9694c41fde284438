//! # Virtual Clock for Simulation
//!
//! A deterministic clock used by the offline backend and by tests. The scripted
//! engine advances it by a fixed cost per rendered frame, so the runner measures
//! exactly that cost.
//!
//! ## Expectations:
//! - Nanosecond resolution
//! - Clones share the same time line

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rendbench_core::time::Clock;

/// A simple virtual clock that advances in nanoseconds.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    // Current simulation time in nanoseconds, shared between clones.
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    /// Creates a new virtual clock starting at `start_ns`.
    pub fn new(start_ns: u64) -> Self {
        Self {
            offset: Arc::new(AtomicU64::new(start_ns)),
        }
    }

    /// Returns the current virtual time in nanoseconds.
    #[inline]
    pub fn now_ns(&self) -> u64 {
        self.offset.load(Ordering::Acquire)
    }

    /// Advances the virtual clock by the given number of nanoseconds.
    #[inline]
    pub fn advance(&self, ns: u64) {
        self.offset.fetch_add(ns, Ordering::Release);
    }

    #[inline]
    pub fn advance_by(&self, step: Duration) {
        self.advance(step.as_nanos() as u64);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.now_ns())
    }
}
