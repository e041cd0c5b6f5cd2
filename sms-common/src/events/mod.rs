//! Status event types for the SMS receiver
//!
//! Provides the receiver's outbound status events and the EventBus that
//! distributes them to observers (console host, diagnostics, tests).

mod playback_types;

pub use playback_types::{PlaybackCategory, PlayerState, TeardownReason};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Receiver status events
///
/// Every outbound effect the playback core has on the session is mirrored
/// here, so observers see the same sequence the sender sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SmsEvent {
    /// Settled player state change (never emitted for discarded transitions)
    PlayerStateChanged {
        /// State before the transition
        old_state: PlayerState,
        /// State after the transition
        new_state: PlayerState,
        /// When the transition settled
        timestamp: DateTime<Utc>,
    },

    /// A crossfaded transition was superseded before it settled
    TransitionDiscarded {
        /// State the stale transition would have entered
        target: PlayerState,
        /// When the transition was discarded
        timestamp: DateTime<Utc>,
    },

    /// Playback category selected for a load
    CategoryChanged {
        category: PlaybackCategory,
        timestamp: DateTime<Utc>,
    },

    /// Application-state text published to the receiver manager
    ApplicationStateChanged {
        /// One of "Ready To Cast", "Now Casting", "Now Casting: <title>"
        text: String,
        timestamp: DateTime<Utc>,
    },

    /// Load-complete acknowledgment sent to the sender
    LoadCompleted {
        /// Receiver-assigned identity of the load
        load_id: Uuid,
        /// Sender that issued the LOAD
        sender_id: String,
        /// Content identifier of the loaded media
        content_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Load request rejected before reaching the engine
    LoadRejected {
        sender_id: String,
        /// Human-readable rejection reason
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Error reported by the engine and forwarded to the session
    PlaybackError {
        /// Error message as reported by the engine
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Status broadcast requested from the session layer
    StatusBroadcast {
        /// Whether the media payload was included
        include_media: bool,
        timestamp: DateTime<Utc>,
    },

    /// Deferred playback start fired
    DeferredPlayStarted {
        /// True when the streaming engine started playback, false for the raw sink
        via_engine: bool,
        timestamp: DateTime<Utc>,
    },

    /// Receiver asked the host to end the session
    TeardownRequested {
        reason: TeardownReason,
        timestamp: DateTime<Utc>,
    },
}

impl SmsEvent {
    /// Event type name, for logging
    pub fn event_type(&self) -> &str {
        match self {
            SmsEvent::PlayerStateChanged { .. } => "PlayerStateChanged",
            SmsEvent::TransitionDiscarded { .. } => "TransitionDiscarded",
            SmsEvent::CategoryChanged { .. } => "CategoryChanged",
            SmsEvent::ApplicationStateChanged { .. } => "ApplicationStateChanged",
            SmsEvent::LoadCompleted { .. } => "LoadCompleted",
            SmsEvent::LoadRejected { .. } => "LoadRejected",
            SmsEvent::PlaybackError { .. } => "PlaybackError",
            SmsEvent::StatusBroadcast { .. } => "StatusBroadcast",
            SmsEvent::DeferredPlayStarted { .. } => "DeferredPlayStarted",
            SmsEvent::TeardownRequested { .. } => "TeardownRequested",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central distribution bus for receiver status events
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block the playback core)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use sms_common::events::{EventBus, PlayerState, SmsEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit(SmsEvent::PlayerStateChanged {
///     old_state: PlayerState::Launching,
///     new_state: PlayerState::Idle,
///     timestamp: chrono::Utc::now(),
/// }).ok();
///
/// assert!(matches!(rx.try_recv(), Ok(SmsEvent::PlayerStateChanged { .. })));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SmsEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<SmsEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if nobody is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: SmsEvent) -> Result<usize, broadcast::error::SendError<SmsEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: SmsEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
