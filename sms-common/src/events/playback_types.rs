//! Playback-related type definitions
//!
//! Supporting types for the receiver state machine and load dispatch.

use serde::{Deserialize, Serialize};

/// Receiver player state
///
/// `Launching` is the initial state. `Idle` is re-entered after every
/// terminal or error condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Receiver application starting, before the session is ready
    Launching,
    /// Media accepted, waiting for playback to begin
    Loading,
    /// Playback stalled waiting for data
    Buffering,
    /// Media playing
    Playing,
    /// Media paused by the sender or the engine
    Paused,
    /// Media finished
    Done,
    /// Ready for a new load
    Idle,
}

impl PlayerState {
    /// All states, in declaration order
    pub const ALL: [PlayerState; 7] = [
        PlayerState::Launching,
        PlayerState::Loading,
        PlayerState::Buffering,
        PlayerState::Playing,
        PlayerState::Paused,
        PlayerState::Done,
        PlayerState::Idle,
    ];

    /// Lowercase name, as mirrored to the display `state` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Launching => "launching",
            PlayerState::Loading => "loading",
            PlayerState::Buffering => "buffering",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Done => "done",
            PlayerState::Idle => "idle",
        }
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playback category selected once per load
///
/// Drives which load path is taken. `Unknown` rejects the load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackCategory {
    Audio,
    Video,
    #[default]
    Unknown,
}

impl PlaybackCategory {
    /// Lowercase name, as mirrored to the display `type` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackCategory::Audio => "audio",
            PlaybackCategory::Video => "video",
            PlaybackCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PlaybackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the receiver asked the host to end the session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TeardownReason {
    /// No activity within the timeout of the given state
    IdleTimeout { state: PlayerState },
    /// The last sender disconnected on request
    SenderDisconnected,
}

impl std::fmt::Display for TeardownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeardownReason::IdleTimeout { state } => write!(f, "idle timeout in {}", state),
            TeardownReason::SenderDisconnected => write!(f, "last sender disconnected"),
        }
    }
}
