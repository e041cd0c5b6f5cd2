//! Cast player core - construction, state transitions and timers
//!
//! **Responsibilities:**
//! - CastPlayer struct definition and construction
//! - `set_state`: immediate, crossfaded and delayed transitions
//! - Execution of actions released by the transition gate
//! - Firing of every owned timer slot

use crate::config::ReceiverConfig;
use crate::display::{self, BurnInGuard, SeekingIndicator};
use crate::error::{Error, Result};
use crate::host::{DisplayRegion, Host, StreamingEngine};
use crate::playback::deferred_play::{self, DeferredPlay};
use crate::playback::idle_timer::IdleTimer;
use crate::playback::load_gate::LoadCompletionGate;
use crate::playback::state_machine::StateMachine;
use crate::playback::timer;
use crate::playback::transition::{FadeTicket, GateOutcome, GatedAction, TransitionGate};
use crate::state::{Session, SessionSnapshot};
use sms_common::events::TeardownReason;
use sms_common::{EventBus, PlaybackCategory, PlayerState, SmsEvent};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Receiver-side media player
///
/// Single-threaded and synchronous: every handler takes the current instant
/// and runs to completion. Timers are deadline slots polled through
/// [`CastPlayer::fire_due_timers`]; [`CastPlayer::next_deadline`] tells the
/// driver when to call it next.
pub struct CastPlayer {
    pub(super) config: ReceiverConfig,
    pub(super) host: Host,
    pub(super) events: EventBus,
    pub(super) machine: StateMachine,
    pub(super) session: Session,
    pub(super) idle_timer: IdleTimer,
    pub(super) gate: TransitionGate,
    pub(super) load_gate: LoadCompletionGate,
    pub(super) deferred_play: DeferredPlay,
    /// Streaming engine bound to the current load, if any
    pub(super) engine: Option<Box<dyn StreamingEngine>>,
    pub(super) seeking: SeekingIndicator,
    pub(super) burn_in: BurnInGuard,
}

impl CastPlayer {
    /// Create the player and enter LAUNCHING
    ///
    /// On visual devices every required display region must exist.
    pub fn new(config: ReceiverConfig, host: Host, events: EventBus, now: Instant) -> Result<Self> {
        let visual = host.receiver.device_capabilities().is_visual();
        if visual {
            if let Some(missing) = DisplayRegion::REQUIRED
                .iter()
                .find(|region| !host.renderer.has_region(**region))
            {
                return Err(Error::MissingDisplayRegion(missing.selector().to_string()));
            }
        }

        let mut player = Self {
            idle_timer: IdleTimer::new(config.idle_timeouts.clone()),
            seeking: SeekingIndicator::new(config.seeking_indicator()),
            burn_in: BurnInGuard::new(config.burn_in_interval()),
            config,
            host,
            events,
            machine: StateMachine::new(now),
            session: Session::new(),
            gate: TransitionGate::new(),
            load_gate: LoadCompletionGate::new(),
            deferred_play: DeferredPlay::new(),
            engine: None,
        };

        info!("Cast player created (visual output: {})", visual);
        player.set_category(PlaybackCategory::Unknown, now);
        player.set_state(PlayerState::Launching, false, None, now);
        Ok(player)
    }

    pub fn state(&self) -> PlayerState {
        self.machine.current()
    }

    pub fn category(&self) -> PlaybackCategory {
        self.session.category
    }

    /// Whether the device renders video and visual transitions
    pub fn is_visual(&self) -> bool {
        self.host.receiver.device_capabilities().is_visual()
    }

    /// Request a transition to `target`
    ///
    /// With a non-zero `delay` the transition is re-issued after the delay.
    /// Otherwise it settles now, or after a fade-out when `crossfade` is set
    /// and unless a newer transition has been requested in the meantime.
    pub fn set_state(
        &mut self,
        target: PlayerState,
        crossfade: bool,
        delay: Option<Duration>,
        now: Instant,
    ) {
        debug!(
            "setState: state={}, crossfade={}, delay={:?}",
            target, crossfade, delay
        );
        let stamp = self.machine.begin(now);

        if let Some(delay) = delay.filter(|delay| !delay.is_zero()) {
            match timer::deadline_after(now, delay) {
                Some(deadline) => self.machine.defer(target, crossfade, deadline),
                None => warn!("setState: dropping {} with out-of-range delay", target),
            }
            return;
        }

        if crossfade {
            self.run_gated(GatedAction::SettleState { target, stamp }, now);
        } else {
            self.settle_state(target, now);
        }
    }

    fn settle_state(&mut self, target: PlayerState, now: Instant) {
        let old_state = self.machine.settle(target);
        self.host.renderer.set_state(target);
        self.update_application_state();
        self.idle_timer.arm(target, now);

        self.emit(SmsEvent::PlayerStateChanged {
            old_state,
            new_state: target,
            timestamp: sms_common::time::now(),
        });
    }

    /// Publish the application-state text if it changed
    pub(super) fn update_application_state(&mut self) {
        let media = match self.machine.current() {
            PlayerState::Idle => None,
            _ => self.host.media_manager.media_information(),
        };
        let text = display::application_state_text(media.as_ref());
        if self.session.application_state.as_deref() == Some(text.as_str()) {
            return;
        }

        info!("Application state: {}", text);
        self.host.receiver.set_application_state(&text);
        self.session.application_state = Some(text.clone());
        self.emit(SmsEvent::ApplicationStateChanged {
            text,
            timestamp: sms_common::time::now(),
        });
    }

    /// Select the playback category and the overlay behavior that goes with it
    pub(super) fn set_category(&mut self, category: PlaybackCategory, now: Instant) {
        debug!("setCategory: {}", category);
        self.session.category = category;
        self.host.renderer.set_category(category);

        self.burn_in.stop();
        if category == PlaybackCategory::Audio && self.is_visual() {
            self.burn_in.start(now);
        } else {
            self.host.renderer.reset_overlay();
        }

        self.emit(SmsEvent::CategoryChanged {
            category,
            timestamp: sms_common::time::now(),
        });
    }

    /// Forget the in-flight load
    ///
    /// A late artwork prefetch, gated settle or metadata event for it then
    /// has no effect, and no acknowledgment is owed.
    pub(super) fn abandon_load(&mut self, reason: &str) {
        if let Some(load_id) = self.session.current_load.take() {
            info!("Abandoning load {}: {}", load_id, reason);
        }
        self.load_gate.clear();
        self.deferred_play.cancel(reason);
    }

    /// Submit `action` to the transition gate, running it now if no fade applies
    pub(super) fn run_gated(&mut self, action: GatedAction, now: Instant) {
        let visual = self.is_visual();
        let outcome = self.gate.submit(
            action,
            self.config.transition_duration_secs,
            visual,
            self.host.renderer.as_mut(),
        );
        match outcome {
            GateOutcome::RunNow(action) => self.execute(action, now),
            GateOutcome::Pending(ticket) => debug!("Waiting for {}", ticket),
        }
    }

    pub(super) fn on_fade_out_complete(&mut self, ticket: FadeTicket, now: Instant) {
        if let Some(done) = self.gate.complete(ticket) {
            self.execute(done.action, now);
            self.host.renderer.fade_in(done.fade_in);
        }
    }

    fn execute(&mut self, action: GatedAction, now: Instant) {
        match action {
            GatedAction::SettleState { target, stamp } => {
                if self.machine.is_stale(stamp) {
                    info!("discarded obsolete deferred state({})", target);
                    self.emit(SmsEvent::TransitionDiscarded {
                        target,
                        timestamp: sms_common::time::now(),
                    });
                    return;
                }
                self.set_state(target, false, None, now);
            }
            GatedAction::CompleteLoad { load_id } => self.complete_load(load_id, now),
            GatedAction::FinishStop { request } => {
                self.set_state(PlayerState::Idle, false, None, now);
                self.host.media_manager.stop(&request);
            }
            GatedAction::FinishError { error } => {
                self.set_state(PlayerState::Idle, true, None, now);
                self.host.media_manager.error(&error);
                self.emit(SmsEvent::PlaybackError {
                    message: error.message,
                    timestamp: sms_common::time::now(),
                });
            }
            GatedAction::FinishLoadFailure { info } => {
                self.set_state(PlayerState::Idle, true, None, now);
                self.host.media_manager.load_metadata_error(&info);
            }
        }
    }

    /// Earliest armed deadline across all timer slots
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.idle_timer.deadline(),
            self.deferred_play.deadline(),
            self.machine.deferred_deadline(),
            self.seeking.deadline(),
            self.burn_in.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Fire every timer whose deadline is at or before `now`
    pub fn fire_due_timers(&mut self, now: Instant) {
        if let Some(state) = self.idle_timer.take_expired(now) {
            info!("Idle timeout expired in state {}", state);
            self.request_teardown(TeardownReason::IdleTimeout { state });
        }

        if self.deferred_play.take_due(now) {
            let via_engine =
                deferred_play::start_playback(self.engine.as_mut(), self.host.sink.as_mut());
            self.emit(SmsEvent::DeferredPlayStarted {
                via_engine,
                timestamp: sms_common::time::now(),
            });
        }

        if let Some(deferred) = self.machine.take_due_transition(now) {
            self.set_state(deferred.target, deferred.crossfade, None, now);
        }

        if self.seeking.take_due(now) {
            self.host.renderer.set_seeking(false);
        }

        if let Some((bottom, left)) = self.burn_in.take_due(now) {
            self.host.renderer.move_overlay(bottom, left);
        }
    }

    /// Ask the receiver manager to end the session
    pub(super) fn request_teardown(&mut self, reason: TeardownReason) {
        info!("Stopping receiver: {}", reason);
        self.host.receiver.stop();
        self.emit(SmsEvent::TeardownRequested {
            reason,
            timestamp: sms_common::time::now(),
        });
    }

    pub(super) fn emit(&self, event: SmsEvent) {
        self.events.emit_lossy(event);
    }

    /// Point-in-time view of the session
    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            state: self.machine.current(),
            last_transition_ms: self.machine.last_transition_ms(),
            category: self.session.category,
            load_id: self.session.current_load,
            engine_ready: self.load_gate.is_engine_ready(),
            metadata_observed: self.load_gate.is_metadata_observed(),
            load_acknowledged: self.load_gate.is_acknowledged(),
            engine_bound: self.engine.is_some(),
            buffering_detection: self.session.buffering_detection,
            application_state: self.session.application_state.clone(),
            idle_timeout_in: self
                .idle_timer
                .deadline()
                .map(|deadline| deadline.saturating_duration_since(now)),
            deferred_play_pending: self.deferred_play.is_pending(),
            deferred_transition: self.machine.deferred().map(|deferred| deferred.target),
            pending_fades: self.gate.pending_count(),
            visual: self.is_visual(),
        }
    }
}
