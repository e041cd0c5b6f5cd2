//! Inbound receiver events
//!
//! Everything that reaches the playback core from outside: sender commands,
//! receiver lifecycle notifications, media engine events and completions of
//! asynchronous renderer work. The console host reads these as JSON lines.

use crate::media::{EditTracksInfoRequest, EngineError, LoadInfo, PreloadRequest, StopRequest};
use crate::playback::transition::FadeTicket;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a sender went away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectReason {
    RequestedBySender,
    Error,
    #[serde(other)]
    Unknown,
}

/// Events delivered to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReceiverEvent {
    // Receiver manager
    Ready,
    SenderDisconnected {
        #[serde(default = "unknown_reason")]
        reason: DisconnectReason,
    },
    VisibilityChanged {
        visible: bool,
    },

    // Sender commands
    Load(LoadInfo),
    Stop(StopRequest),
    Preload(PreloadRequest),
    CancelPreload,
    EditTracksInfo(EditTracksInfoRequest),

    // Media engine
    Playing,
    Paused,
    Ended,
    Aborted,
    Stalled,
    Waiting,
    TimeUpdate {
        current_time: f64,
        #[serde(default)]
        duration: Option<f64>,
    },
    SeekStart,
    SeekEnd,
    MetadataLoaded,
    LoadMetadataError,
    Error(EngineError),

    // Renderer completions
    FadeOutComplete {
        ticket: FadeTicket,
    },
    ImagesPrefetched {
        ticket: Uuid,
    },
}

fn unknown_reason() -> DisconnectReason {
    DisconnectReason::Unknown
}

impl ReceiverEvent {
    /// Event name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ReceiverEvent::Ready => "ready",
            ReceiverEvent::SenderDisconnected { .. } => "sender_disconnected",
            ReceiverEvent::VisibilityChanged { .. } => "visibility_changed",
            ReceiverEvent::Load(_) => "load",
            ReceiverEvent::Stop(_) => "stop",
            ReceiverEvent::Preload(_) => "preload",
            ReceiverEvent::CancelPreload => "cancel_preload",
            ReceiverEvent::EditTracksInfo(_) => "edit_tracks_info",
            ReceiverEvent::Playing => "playing",
            ReceiverEvent::Paused => "paused",
            ReceiverEvent::Ended => "ended",
            ReceiverEvent::Aborted => "aborted",
            ReceiverEvent::Stalled => "stalled",
            ReceiverEvent::Waiting => "waiting",
            ReceiverEvent::TimeUpdate { .. } => "time_update",
            ReceiverEvent::SeekStart => "seek_start",
            ReceiverEvent::SeekEnd => "seek_end",
            ReceiverEvent::MetadataLoaded => "metadata_loaded",
            ReceiverEvent::LoadMetadataError => "load_metadata_error",
            ReceiverEvent::Error(_) => "error",
            ReceiverEvent::FadeOutComplete { .. } => "fade_out_complete",
            ReceiverEvent::ImagesPrefetched { .. } => "images_prefetched",
        }
    }
}
