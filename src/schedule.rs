//! Timer gates for bursty input: a trailing-edge debouncer and a throttler
//! that fires on both edges. Neither owns a timer; the host passes `now` in.

use std::time::Duration;
use wasm_timer::Instant;

/// Collapses a burst of triggers into one firing, `window` after the last one.
#[derive(Clone, Debug)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Arm, or push back an already armed deadline.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// True exactly once when the quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Lets at most one call through per `window`. A call turned away is not
/// lost: it is held and fires from [`Throttler::poll`] once the window closes.
#[derive(Clone, Debug)]
pub struct Throttler {
    window: Duration,
    last: Option<Instant>,
    pending: bool,
}

impl Throttler {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: None,
            pending: false,
        }
    }

    pub fn admit(&mut self, now: Instant) -> bool {
        if self.is_open(now) {
            self.last = Some(now);
            self.pending = false;
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// True once for a held call when its window has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.is_open(now) {
            self.last = Some(now);
            self.pending = false;
            true
        } else {
            false
        }
    }

    fn is_open(&self, now: Instant) -> bool {
        match self.last {
            Some(last) => now.duration_since(last) >= self.window,
            None => true,
        }
    }
}
