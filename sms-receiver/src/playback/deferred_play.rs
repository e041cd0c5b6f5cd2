//! Deferred autoplay
//!
//! After a load completes with autoplay requested, playback starts only once
//! the media information has been on screen for a while. Any user-visible
//! playback transition in between cancels the pending start.

use super::timer::Timer;
use crate::host::{MediaSink, StreamingEngine};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct DeferredPlay {
    timer: Timer<()>,
}

impl DeferredPlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule playback start after `delay`, replacing any pending start
    pub fn schedule(&mut self, delay: Duration, now: Instant) {
        info!("schedule deferred play in {} ms", delay.as_millis());
        self.timer.arm_after(now, delay, ());
    }

    /// Cancel a pending start; returns whether one was pending
    pub fn cancel(&mut self, reason: &str) -> bool {
        let cancelled = self.timer.cancel().is_some();
        if cancelled {
            info!("cancelDeferredPlay: {}", reason);
        }
        cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn take_due(&mut self, now: Instant) -> bool {
        self.timer.take_due(now).is_some()
    }
}

/// Start playback through the streaming engine if one is bound, else the sink
///
/// Returns true when the engine was used.
pub fn start_playback(
    engine: Option<&mut Box<dyn StreamingEngine>>,
    sink: &mut dyn MediaSink,
) -> bool {
    match engine {
        Some(engine) => {
            debug!("Deferred play: waiting for sufficient buffer");
            engine.play_when_buffer_sufficient();
            true
        }
        None => {
            debug!("Deferred play: starting media sink");
            sink.play();
            false
        }
    }
}
