//! Owned one-shot and periodic timer slots
//!
//! A slot holds at most one deadline. Arming replaces (cancels) whatever was
//! armed before; cancelling an empty slot is a no-op. Nothing fires on its
//! own: the owner polls `take_due` with the current instant, and the service
//! loop sleeps until the earliest deadline across all slots.

use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// `now + delay`, or `None` when the deadline is past what the clock can hold
pub fn deadline_after(now: Instant, delay: Duration) -> Option<Instant> {
    let deadline = now.checked_add(delay);
    if deadline.is_none() {
        warn!("Delay of {:?} is out of range, timer will never fire", delay);
    }
    deadline
}

/// One-shot timer slot carrying a payload delivered on expiry
#[derive(Debug)]
pub struct Timer<T> {
    armed: Option<(Instant, T)>,
}

impl<T> Timer<T> {
    pub fn new() -> Self {
        Self { armed: None }
    }

    /// Arm for `deadline`, returning the payload of a replaced timer
    pub fn arm(&mut self, deadline: Instant, payload: T) -> Option<T> {
        self.armed
            .replace((deadline, payload))
            .map(|(_, previous)| previous)
    }

    /// Arm for `delay` after `now`
    ///
    /// An out-of-range delay leaves the slot empty and returns false.
    pub fn arm_after(&mut self, now: Instant, delay: Duration, payload: T) -> bool {
        match deadline_after(now, delay) {
            Some(deadline) => {
                self.arm(deadline, payload);
                true
            }
            None => {
                self.cancel();
                false
            }
        }
    }

    /// Disarm, returning the pending payload if any
    pub fn cancel(&mut self) -> Option<T> {
        self.armed.take().map(|(_, payload)| payload)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn payload(&self) -> Option<&T> {
        self.armed.as_ref().map(|(_, payload)| payload)
    }

    /// Disarm and return the payload if the deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.armed {
            Some((deadline, _)) if *deadline <= now => self.cancel(),
            _ => None,
        }
    }
}

impl<T> Default for Timer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic timer slot
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// (Re)start ticking, first tick one period from `now`
    pub fn start(&mut self, now: Instant) {
        self.next = deadline_after(now, self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Returns true once per elapsed tick, rescheduling the next one
    ///
    /// Missed ticks are coalesced: the next tick is one period after `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if next <= now => {
                self.next = deadline_after(now, self.period);
                true
            }
            _ => false,
        }
    }
}
