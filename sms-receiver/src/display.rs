//! On-screen presentation helpers
//!
//! Progress labels, application-state text, the seeking indicator and the
//! audio burn-in guard.

use crate::host::ProgressView;
use crate::media::MediaInformation;
use crate::playback::timer::{Interval, Timer};
use rand::Rng;
use sms_common::human_time::format_duration;
use std::time::Duration;
use tokio::time::Instant;

pub const READY_TO_CAST: &str = "Ready To Cast";
pub const NOW_CASTING: &str = "Now Casting";

/// Application-state text for the current media (none when idle)
pub fn application_state_text(media: Option<&MediaInformation>) -> String {
    match media {
        Some(media) => match media.title() {
            Some(title) => format!("{}: {}", NOW_CASTING, title),
            None => NOW_CASTING.to_string(),
        },
        None => READY_TO_CAST.to_string(),
    }
}

/// Progress bar contents, or `None` until both times are known
pub fn progress_view(current: Option<f64>, total: Option<f64>) -> Option<ProgressView> {
    let current = current.filter(|c| c.is_finite())?;
    let total = total.filter(|t| t.is_finite() && *t > 0.0)?;
    let percent = (100.0 * current / total).clamp(0.0, 100.0);
    Some(ProgressView {
        current_label: format_duration(current),
        total_label: format_duration(total),
        percent,
    })
}

/// Lingering "seeking" indicator
///
/// Shown when a seek starts, hidden a while after it ends.
#[derive(Debug)]
pub struct SeekingIndicator {
    linger: Duration,
    hide: Timer<()>,
}

impl SeekingIndicator {
    pub fn new(linger: Duration) -> Self {
        Self {
            linger,
            hide: Timer::new(),
        }
    }

    /// Seek started: keep the indicator up indefinitely
    pub fn seek_started(&mut self) {
        self.hide.cancel();
    }

    /// Seek finished: hide after the linger period
    pub fn seek_finished(&mut self, now: Instant) {
        self.hide.arm_after(now, self.linger, ());
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.hide.deadline()
    }

    /// True when the indicator should be hidden now
    pub fn take_due(&mut self, now: Instant) -> bool {
        self.hide.take_due(now).is_some()
    }
}

/// Moves the overlay around while audio plays on a screen
#[derive(Debug)]
pub struct BurnInGuard {
    interval: Interval,
}

impl BurnInGuard {
    pub const MAX_BOTTOM_PX: u32 = 100;
    pub const MAX_LEFT_PX: u32 = 600;

    pub fn new(period: Duration) -> Self {
        Self {
            interval: Interval::new(period),
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.interval.start(now);
    }

    pub fn stop(&mut self) {
        self.interval.stop();
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_running()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.interval.deadline()
    }

    /// New overlay margins (bottom, left) if a reposition is due
    pub fn take_due(&mut self, now: Instant) -> Option<(u32, u32)> {
        if !self.interval.take_due(now) {
            return None;
        }
        let mut rng = rand::thread_rng();
        Some((
            rng.gen_range(0..=Self::MAX_BOTTOM_PX),
            rng.gen_range(0..=Self::MAX_LEFT_PX),
        ))
    }
}
