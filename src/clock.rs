//! Millisecond clock injected into the controller.
//!
//! Timers are plain comparisons against the value sampled on each loop
//! iteration, so nothing here sleeps.

use std::{cell::Cell, rc::Rc, time::Instant};

pub trait Clock {
    /// Monotonic milliseconds since an arbitrary start.
    fn millis(&self) -> u64;
}

/// Wall clock backed by [`Instant`].
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock advanced by hand, shared between the controller and whoever drives it.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get().saturating_add(millis));
    }
}

impl Clock for ManualClock {
    fn millis(&self) -> u64 {
        self.now.get()
    }
}

impl<F: Fn() -> u64> Clock for F {
    fn millis(&self) -> u64 {
        self()
    }
}
