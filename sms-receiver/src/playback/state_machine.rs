//! Player state bookkeeping
//!
//! Tracks the settled state, the timestamp of the most recent transition
//! request and an optional delayed transition. Side effects of settling
//! (renderer, idle timer, application state) belong to the player.

use super::timer::Timer;
use sms_common::PlayerState;
use tokio::time::Instant;

#[derive(Debug)]
pub struct StateMachine {
    current: PlayerState,
    origin: Instant,
    last_transition_ms: u64,
    deferred: Timer<DeferredTransition>,
}

/// A transition waiting for its delay to elapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredTransition {
    pub target: PlayerState,
    pub crossfade: bool,
}

impl StateMachine {
    /// Starts in LAUNCHING; `origin` anchors transition timestamps
    pub fn new(origin: Instant) -> Self {
        Self {
            current: PlayerState::Launching,
            origin,
            last_transition_ms: 0,
            deferred: Timer::new(),
        }
    }

    pub fn current(&self) -> PlayerState {
        self.current
    }

    pub fn last_transition_ms(&self) -> u64 {
        self.last_transition_ms
    }

    /// Record a transition request and return its timestamp
    ///
    /// Timestamps are milliseconds since `origin` and strictly increasing,
    /// so two requests in the same millisecond still order. Any delayed
    /// transition is superseded.
    pub fn begin(&mut self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.origin).as_millis() as u64;
        self.last_transition_ms = elapsed.max(self.last_transition_ms + 1);
        self.deferred.cancel();
        self.last_transition_ms
    }

    /// Whether a crossfade stamped `stamp` has been superseded
    pub fn is_stale(&self, stamp: u64) -> bool {
        stamp < self.last_transition_ms
    }

    /// Move to `target`, returning the previous state
    pub fn settle(&mut self, target: PlayerState) -> PlayerState {
        std::mem::replace(&mut self.current, target)
    }

    pub fn defer(&mut self, target: PlayerState, crossfade: bool, deadline: Instant) {
        self.deferred
            .arm(deadline, DeferredTransition { target, crossfade });
    }

    pub fn deferred(&self) -> Option<&DeferredTransition> {
        self.deferred.payload()
    }

    pub fn deferred_deadline(&self) -> Option<Instant> {
        self.deferred.deadline()
    }

    pub fn take_due_transition(&mut self, now: Instant) -> Option<DeferredTransition> {
        self.deferred.take_due(now)
    }
}
