//! Collaborator interfaces
//!
//! The playback core never talks to the transport, the media engine or the
//! screen directly. The host supplies these trait objects; the core drives
//! them and receives their notifications back as `ReceiverEvent`s.
//!
//! `MediaManager` is the session layer's default handler set. The player
//! decorates it: each inbound command is handled by the player first, which
//! decides when (and whether) to invoke the default behavior.

use crate::media::{
    EditTracksInfoRequest, EngineError, LoadInfo, MediaInformation, StopRequest, StreamInfo,
    StreamingProtocol, TracksInfo,
};
use crate::playback::transition::FadeTicket;
use sms_common::{PlaybackCategory, PlayerState};
use std::time::Duration;
use uuid::Uuid;

/// Receiver application lifecycle (session teardown, application state)
pub trait ReceiverManager: Send {
    /// Publish the application-state text shown to senders
    fn set_application_state(&mut self, text: &str);

    /// End the receiver session
    fn stop(&mut self);

    /// Number of currently connected senders
    fn sender_count(&self) -> usize;

    fn device_capabilities(&self) -> DeviceCapabilities;
}

/// Capabilities reported by the receiver device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// `Some(false)` on audio-only devices; unknown counts as supported
    pub display_supported: Option<bool>,
}

impl DeviceCapabilities {
    pub fn audio_only() -> Self {
        Self {
            display_supported: Some(false),
        }
    }

    /// Whether the device renders video and visual transitions
    pub fn is_visual(&self) -> bool {
        self.display_supported != Some(false)
    }
}

/// Default media session handlers
pub trait MediaManager: Send {
    /// Default LOAD path: hands the request to the media sink
    fn load(&mut self, info: &LoadInfo);

    /// Default STOP path
    fn stop(&mut self, request: &StopRequest);

    /// Send the load-complete acknowledgment for `info`
    fn load_complete(&mut self, info: &LoadInfo, tracks: Option<&TracksInfo>);

    /// Report a load that could not start
    fn load_metadata_error(&mut self, info: &LoadInfo);

    /// Report a playback error, payload unchanged
    fn error(&mut self, error: &EngineError);

    /// Default EDIT_TRACKS_INFO path
    fn edit_tracks_info(&mut self, request: &EditTracksInfoRequest);

    /// Broadcast media status to all senders
    fn broadcast_status(&mut self, include_media: bool);

    /// Media information of the current session, if any
    fn media_information(&self) -> Option<MediaInformation>;
}

/// Raw media output (the element the default load path plays into)
pub trait MediaSink: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn set_autoplay(&mut self, autoplay: bool);
    /// Playback position in seconds, `None` until known
    fn current_time(&self) -> Option<f64>;
    /// Media duration in seconds, `None` (or non-finite) until known
    fn duration(&self) -> Option<f64>;
    /// Whether enough data is buffered to play through
    fn has_enough_data(&self) -> bool;
}

/// Adaptive streaming engine instance bound to one load
pub trait StreamingEngine: Send {
    fn unload(&mut self);
    /// Start playback once the buffer is sufficient
    fn play_when_buffer_sufficient(&mut self);
    /// Whether the engine paused itself because its buffer ran dry
    fn is_underflow(&self) -> bool;
    fn stream_count(&self) -> usize;
    fn is_stream_enabled(&self, index: usize) -> bool;
    fn enable_stream(&mut self, index: usize, enabled: bool);
    fn stream_info(&self, index: usize) -> StreamInfo;
}

/// Creates streaming engine instances for adaptive manifests
pub trait EngineFactory: Send {
    /// Returns `None` to fall back to the raw media sink
    fn create(
        &mut self,
        info: &LoadInfo,
        protocol: StreamingProtocol,
    ) -> Option<Box<dyn StreamingEngine>>;
}

/// Display regions the renderer must provide on visual devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRegion {
    ProgressInner,
    ProgressThumb,
    CurrentTime,
    TotalTime,
    Overlay,
}

impl DisplayRegion {
    pub const REQUIRED: [DisplayRegion; 5] = [
        DisplayRegion::ProgressInner,
        DisplayRegion::ProgressThumb,
        DisplayRegion::CurrentTime,
        DisplayRegion::TotalTime,
        DisplayRegion::Overlay,
    ];

    pub fn selector(&self) -> &'static str {
        match self {
            DisplayRegion::ProgressInner => ".controls-progress-inner",
            DisplayRegion::ProgressThumb => ".controls-progress-thumb",
            DisplayRegion::CurrentTime => ".controls-cur-time",
            DisplayRegion::TotalTime => ".controls-total-time",
            DisplayRegion::Overlay => ".overlay",
        }
    }
}

/// Progress bar contents
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub current_label: String,
    pub total_label: String,
    /// 0.0 ..= 100.0
    pub percent: f64,
}

/// On-screen presentation
///
/// `fade_out` and `prefetch_images` complete asynchronously: the host reports
/// completion with `ReceiverEvent::FadeOutComplete` / `ReceiverEvent::ImagesPrefetched`
/// carrying the same ticket.
pub trait Renderer: Send {
    fn has_region(&self, region: DisplayRegion) -> bool;
    fn set_state(&mut self, state: PlayerState);
    fn set_category(&mut self, category: PlaybackCategory);
    fn fade_out(&mut self, ticket: FadeTicket, duration: Duration);
    fn fade_in(&mut self, duration: Duration);
    fn show_metadata(&mut self, title: &str, subtitle: &str, artwork: Option<&str>);
    fn prefetch_images(&mut self, urls: &[String], ticket: Uuid);
    fn show_progress(&mut self, progress: &ProgressView);
    /// Total-time label once metadata is known; `unbounded` for live streams
    fn show_duration(&mut self, total_label: &str, unbounded: bool);
    fn set_seeking(&mut self, seeking: bool);
    fn move_overlay(&mut self, margin_bottom_px: u32, margin_left_px: u32);
    fn reset_overlay(&mut self);
}

/// Everything the player drives
pub struct Host {
    pub receiver: Box<dyn ReceiverManager>,
    pub media_manager: Box<dyn MediaManager>,
    pub sink: Box<dyn MediaSink>,
    pub renderer: Box<dyn Renderer>,
    pub engine_factory: Option<Box<dyn EngineFactory>>,
}
