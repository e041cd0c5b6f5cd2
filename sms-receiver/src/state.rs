//! Per-session playback state
//!
//! `Session` holds the player's mutable bookkeeping that is not owned by one
//! of the timer components. `SessionSnapshot` is the read-only view handed
//! out to the host and to tests.

use crate::media::TracksInfo;
use serde::Serialize;
use sms_common::{PlaybackCategory, PlayerState};
use std::time::Duration;
use uuid::Uuid;

/// Mutable session bookkeeping
#[derive(Debug, Default)]
pub struct Session {
    /// Category of the current load
    pub category: PlaybackCategory,

    /// Autoplay as requested by the current load, consumed once honored
    pub player_autoplay: bool,

    /// Receiver-assigned identity of the load in flight
    pub current_load: Option<Uuid>,

    /// Last application-state text published
    pub application_state: Option<String>,

    /// Whether stall/waiting hints may move PLAYING to BUFFERING
    pub buffering_detection: bool,

    /// Tracks description of the bound engine
    ///
    /// Outer `None`: not read yet for this load.
    pub tracks_cache: Option<Option<TracksInfo>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Point-in-time view of the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: PlayerState,
    pub last_transition_ms: u64,
    pub category: PlaybackCategory,
    pub load_id: Option<Uuid>,
    pub engine_ready: bool,
    pub metadata_observed: bool,
    pub load_acknowledged: bool,
    pub engine_bound: bool,
    pub buffering_detection: bool,
    pub application_state: Option<String>,
    /// Time until the idle timeout fires, if armed
    pub idle_timeout_in: Option<Duration>,
    pub deferred_play_pending: bool,
    pub deferred_transition: Option<PlayerState>,
    pub pending_fades: usize,
    pub visual: bool,
}
