// IMACX Logistica - core/debounce.rs
//
// Timer-based debounce scheduler.
//
// The scheduler holds at most one pending value. Scheduling a new value
// replaces the pending one and restarts the delay window. Nothing runs on
// its own: the owner polls on each frame/tick and receives the value once
// the window has elapsed. Time comes from a `Clock`, so tests drive it with
// `ManualClock` instead of sleeping.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Virtual time that only moves when told to.
///
/// Clones share the same timeline, so a test can keep one handle and hand
/// another to the debouncer.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move virtual time forward. An advance past the platform's
    /// representable range leaves the clock where it is.
    pub fn advance(&self, by: Duration) {
        match self.now.get().checked_add(by) {
            Some(next) => self.now.set(next),
            None => tracing::warn!(by = ?by, "Virtual clock advance overflows Instant; ignored"),
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    /// `None` when `now + delay` is not representable: the value is never
    /// due on its own and only `flush` releases it.
    deadline: Option<Instant>,
}

/// Debounce scheduler with a single pending slot.
#[derive(Debug)]
pub struct Debouncer<T, C: Clock = SystemClock> {
    delay: Duration,
    clock: C,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T, SystemClock> {
    /// Debouncer driven by wall-clock time.
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, SystemClock)
    }
}

impl<T, C: Clock> Debouncer<T, C> {
    pub fn with_clock(delay: Duration, clock: C) -> Self {
        Self {
            delay,
            clock,
            pending: None,
        }
    }

    /// Schedule `value`, superseding anything still pending.
    pub fn schedule(&mut self, value: T) {
        let superseded = self.pending.is_some();
        self.pending = Some(Pending {
            value,
            deadline: self.clock.now().checked_add(self.delay),
        });
        tracing::trace!(superseded, delay = ?self.delay, "Debounced update scheduled");
    }

    /// Take the pending value if its window has elapsed.
    pub fn poll(&mut self) -> Option<T> {
        let due = matches!(
            &self.pending,
            Some(Pending { deadline: Some(deadline), .. }) if self.clock.now() >= *deadline
        );
        if due {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Take the pending value immediately, ignoring the window.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::trace!("Debounced update cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
