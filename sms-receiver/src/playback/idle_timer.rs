//! Per-state inactivity watchdog
//!
//! Re-armed on every settled transition, including re-entering the same
//! state. States absent from the timeout table disarm it.

use super::timer::Timer;
use crate::config::IdleTimeouts;
use sms_common::PlayerState;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug)]
pub struct IdleTimer {
    timeouts: IdleTimeouts,
    timer: Timer<PlayerState>,
}

impl IdleTimer {
    pub fn new(timeouts: IdleTimeouts) -> Self {
        Self {
            timeouts,
            timer: Timer::new(),
        }
    }

    /// Cancel any pending timeout and arm the one for `state`
    ///
    /// Returns the armed timeout, or `None` if `state` never times out.
    pub fn arm(&mut self, state: PlayerState, now: Instant) -> Option<Duration> {
        self.timer.cancel();
        let timeout = self.timeouts.for_state(state)?;
        debug!("setIdleTimeout: {} ms for {}", timeout.as_millis(), state);
        self.timer
            .arm_after(now, timeout, state)
            .then_some(timeout)
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// State whose timeout expired, if the deadline has passed
    pub fn take_expired(&mut self, now: Instant) -> Option<PlayerState> {
        self.timer.take_due(now)
    }
}
