//! Fade-bracketed execution of state changes
//!
//! On visual devices a gated action runs between a fade-out and a fade-in of
//! half the configured transition duration each. The renderer reports the
//! end of the fade-out with the ticket it was handed; only then does the
//! action run. Audio-only devices and a zero duration run actions inline.
//!
//! There is no timeout: a fade-out that never completes leaves its action
//! pending. Completions for unknown tickets are ignored.

use crate::host::Renderer;
use crate::media::{EngineError, LoadInfo, StopRequest};
use serde::{Deserialize, Serialize};
use sms_common::PlayerState;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Correlates a fade-out request with its completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FadeTicket(pub u64);

impl fmt::Display for FadeTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fade#{}", self.0)
    }
}

/// Work deferred until the screen has faded out
#[derive(Debug, Clone, PartialEq)]
pub enum GatedAction {
    /// Settle a crossfaded state change issued at `stamp`
    SettleState { target: PlayerState, stamp: u64 },
    /// Enter LOADING for load `load_id` and mark the engine ready
    CompleteLoad { load_id: Uuid },
    /// Go IDLE and run the default stop path
    FinishStop { request: StopRequest },
    /// Go IDLE and forward an engine error
    FinishError { error: EngineError },
    /// Go IDLE and report a load that could not start
    FinishLoadFailure { info: LoadInfo },
}

/// Result of submitting an action to the gate
#[derive(Debug, PartialEq)]
pub enum GateOutcome {
    /// Run the action now; no fade is involved
    RunNow(GatedAction),
    /// Fade-out requested; the action runs when `ticket` completes
    Pending(FadeTicket),
}

/// A completed fade-out: run `action`, then fade in
#[derive(Debug, PartialEq)]
pub struct FadeOutDone {
    pub action: GatedAction,
    pub fade_in: Duration,
}

#[derive(Debug)]
struct PendingFade {
    action: GatedAction,
    half: Duration,
}

#[derive(Debug, Default)]
pub struct TransitionGate {
    pending: HashMap<FadeTicket, PendingFade>,
    next_ticket: u64,
}

impl TransitionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit `action` for a transition of `duration_secs` in total
    pub fn submit(
        &mut self,
        action: GatedAction,
        duration_secs: f64,
        visual: bool,
        renderer: &mut dyn Renderer,
    ) -> GateOutcome {
        if !visual || duration_secs.is_nan() || duration_secs <= 0.0 {
            return GateOutcome::RunNow(action);
        }

        let half = sms_common::time::secs_f64_to_duration(duration_secs / 2.0);
        self.next_ticket += 1;
        let ticket = FadeTicket(self.next_ticket);
        debug!("Fading out ({} ms) for {:?}", half.as_millis(), action);

        self.pending.insert(ticket, PendingFade { action, half });
        renderer.fade_out(ticket, half);
        GateOutcome::Pending(ticket)
    }

    /// Fade-out for `ticket` finished; returns the action to run
    pub fn complete(&mut self, ticket: FadeTicket) -> Option<FadeOutDone> {
        match self.pending.remove(&ticket) {
            Some(pending) => Some(FadeOutDone {
                action: pending.action,
                fade_in: pending.half,
            }),
            None => {
                debug!("Ignoring completion for unknown {}", ticket);
                None
            }
        }
    }

    /// Number of actions waiting on a fade-out
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
