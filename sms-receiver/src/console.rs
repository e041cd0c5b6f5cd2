//! Console host collaborators
//!
//! Stand-ins for the transport, media element and screen that log what the
//! player asks of them. Asynchronous renderer work completes by posting the
//! matching `ReceiverEvent` on the notification channel.

use crate::events::ReceiverEvent;
use crate::host::{
    DeviceCapabilities, DisplayRegion, Host, MediaManager, MediaSink, ProgressView,
    ReceiverManager, Renderer,
};
use crate::media::{
    EditTracksInfoRequest, EngineError, LoadInfo, MediaInformation, StopRequest, TracksInfo,
};
use crate::playback::FadeTicket;
use sms_common::{PlaybackCategory, PlayerState};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Build a host whose collaborators log to tracing
///
/// `display` selects a visual or an audio-only device.
pub fn console_host(display: bool, notify: mpsc::UnboundedSender<ReceiverEvent>) -> Host {
    Host {
        receiver: Box::new(ConsoleReceiver { display }),
        media_manager: Box::new(ConsoleMediaManager::default()),
        sink: Box::new(ConsoleSink::default()),
        renderer: Box::new(ConsoleRenderer { notify }),
        engine_factory: None,
    }
}

struct ConsoleReceiver {
    display: bool,
}

impl ReceiverManager for ConsoleReceiver {
    fn set_application_state(&mut self, text: &str) {
        info!(target: "console::receiver", "application state: {}", text);
    }

    fn stop(&mut self) {
        info!(target: "console::receiver", "stop requested");
    }

    fn sender_count(&self) -> usize {
        0
    }

    fn device_capabilities(&self) -> DeviceCapabilities {
        DeviceCapabilities {
            display_supported: Some(self.display),
        }
    }
}

#[derive(Default)]
struct ConsoleMediaManager {
    media: Option<MediaInformation>,
}

impl MediaManager for ConsoleMediaManager {
    fn load(&mut self, info: &LoadInfo) {
        info!(
            target: "console::media",
            "load {:?} (autoplay={:?})",
            info.media().content_id(),
            info.message.autoplay
        );
        self.media = Some(info.media().clone());
    }

    fn stop(&mut self, request: &StopRequest) {
        info!(target: "console::media", "stop from {}", request.sender_id);
        self.media = None;
    }

    fn load_complete(&mut self, info: &LoadInfo, tracks: Option<&TracksInfo>) {
        let tracks = tracks.map(|t| t.tracks.len()).unwrap_or_default();
        info!(
            target: "console::media",
            "load complete for {} ({} tracks)",
            info.sender_id,
            tracks
        );
    }

    fn load_metadata_error(&mut self, info: &LoadInfo) {
        warn!(target: "console::media", "load metadata error for {}", info.sender_id);
        self.media = None;
    }

    fn error(&mut self, error: &EngineError) {
        warn!(target: "console::media", "error: {} {}", error.message, error.detail);
    }

    fn edit_tracks_info(&mut self, request: &EditTracksInfoRequest) {
        info!(
            target: "console::media",
            "edit tracks: {:?}",
            request.active_track_ids
        );
    }

    fn broadcast_status(&mut self, include_media: bool) {
        info!(target: "console::media", "broadcast status (media={})", include_media);
    }

    fn media_information(&self) -> Option<MediaInformation> {
        self.media.clone()
    }
}

#[derive(Default)]
struct ConsoleSink {
    autoplay: bool,
}

impl MediaSink for ConsoleSink {
    fn play(&mut self) {
        info!(target: "console::sink", "play");
    }

    fn pause(&mut self) {
        info!(target: "console::sink", "pause");
    }

    fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }

    fn current_time(&self) -> Option<f64> {
        None
    }

    fn duration(&self) -> Option<f64> {
        None
    }

    fn has_enough_data(&self) -> bool {
        true
    }
}

struct ConsoleRenderer {
    notify: mpsc::UnboundedSender<ReceiverEvent>,
}

impl Renderer for ConsoleRenderer {
    fn has_region(&self, _region: DisplayRegion) -> bool {
        true
    }

    fn set_state(&mut self, state: PlayerState) {
        info!(target: "console::screen", "state={}", state);
    }

    fn set_category(&mut self, category: PlaybackCategory) {
        info!(target: "console::screen", "type={}", category);
    }

    fn fade_out(&mut self, ticket: FadeTicket, duration: Duration) {
        info!(target: "console::screen", "fade out {} over {:?}", ticket, duration);
        let notify = self.notify.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = notify.send(ReceiverEvent::FadeOutComplete { ticket });
        });
    }

    fn fade_in(&mut self, duration: Duration) {
        info!(target: "console::screen", "fade in over {:?}", duration);
    }

    fn show_metadata(&mut self, title: &str, subtitle: &str, artwork: Option<&str>) {
        info!(
            target: "console::screen",
            "metadata: title={:?} subtitle={:?} artwork={:?}",
            title,
            subtitle,
            artwork
        );
    }

    fn prefetch_images(&mut self, urls: &[String], ticket: Uuid) {
        info!(target: "console::screen", "prefetch {:?}", urls);
        let _ = self.notify.send(ReceiverEvent::ImagesPrefetched { ticket });
    }

    fn show_progress(&mut self, progress: &ProgressView) {
        info!(
            target: "console::screen",
            "{} / {} ({:.0}%)",
            progress.current_label,
            progress.total_label,
            progress.percent
        );
    }

    fn show_duration(&mut self, total_label: &str, unbounded: bool) {
        info!(
            target: "console::screen",
            "total time {:?} (unbounded={})",
            total_label,
            unbounded
        );
    }

    fn set_seeking(&mut self, seeking: bool) {
        info!(target: "console::screen", "seeking={}", seeking);
    }

    fn move_overlay(&mut self, margin_bottom_px: u32, margin_left_px: u32) {
        info!(
            target: "console::screen",
            "overlay margin bottom={}px left={}px",
            margin_bottom_px,
            margin_left_px
        );
    }

    fn reset_overlay(&mut self) {
        info!(target: "console::screen", "overlay reset");
    }
}

/// Parse one JSON line into an inbound event
pub fn parse_event_line(line: &str) -> crate::Result<Option<ReceiverEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}
