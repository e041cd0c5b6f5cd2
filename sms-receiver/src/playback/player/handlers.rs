//! Event handlers
//!
//! Dispatch of inbound `ReceiverEvent`s plus the sender-facing queries
//! (status customization, preload).

use super::CastPlayer;
use crate::display;
use crate::events::{DisconnectReason, ReceiverEvent};
use crate::media::{
    self, tracks, EditTracksInfoRequest, EngineError, MediaInformation, MediaStatus,
    PreloadRequest, RemotePlayerState, StopRequest,
};
use crate::playback::transition::GatedAction;
use sms_common::events::TeardownReason;
use sms_common::{PlaybackCategory, PlayerState, SmsEvent};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

impl CastPlayer {
    /// Handle one inbound event to completion
    pub fn handle_event(&mut self, event: ReceiverEvent, now: Instant) {
        debug!("Receiver event: {}", event.name());
        match event {
            ReceiverEvent::Ready => self.on_ready(now),
            ReceiverEvent::SenderDisconnected { reason } => self.on_sender_disconnected(reason),
            ReceiverEvent::VisibilityChanged { visible } => self.on_visibility_changed(visible),

            ReceiverEvent::Load(info) => self.on_load(info, now),
            ReceiverEvent::Stop(request) => self.on_stop(request, now),
            ReceiverEvent::Preload(request) => {
                let accepted = self.on_preload(&request);
                debug!("Preload accepted: {}", accepted);
            }
            ReceiverEvent::CancelPreload => {
                self.cancel_preload();
            }
            ReceiverEvent::EditTracksInfo(request) => self.on_edit_tracks_info(&request),

            ReceiverEvent::Playing => self.on_playing(now),
            ReceiverEvent::Paused => self.on_pause(now),
            ReceiverEvent::Ended | ReceiverEvent::Aborted => self.on_ended(now),
            ReceiverEvent::Stalled | ReceiverEvent::Waiting => self.on_buffering(now),
            ReceiverEvent::TimeUpdate {
                current_time,
                duration,
            } => self.on_progress(current_time, duration, now),
            ReceiverEvent::SeekStart => self.on_seek_start(),
            ReceiverEvent::SeekEnd => self.on_seek_end(now),
            ReceiverEvent::MetadataLoaded => self.on_metadata_loaded(),
            ReceiverEvent::LoadMetadataError => match self.load_gate.current() {
                Some(pending) => {
                    let info = pending.info.clone();
                    self.on_load_metadata_error(info, now);
                }
                None => warn!("Metadata load error without a load in flight"),
            },
            ReceiverEvent::Error(error) => self.on_error(error, now),

            ReceiverEvent::FadeOutComplete { ticket } => self.on_fade_out_complete(ticket, now),
            ReceiverEvent::ImagesPrefetched { ticket } => self.on_images_prefetched(ticket, now),
        }
    }

    fn on_ready(&mut self, now: Instant) {
        info!("onReady");
        self.set_state(PlayerState::Idle, false, None, now);
    }

    fn on_sender_disconnected(&mut self, reason: DisconnectReason) {
        let senders = self.host.receiver.sender_count();
        info!("onSenderDisconnected: reason={:?}, senders={}", reason, senders);
        // The last sender tapping Disconnect ends the receiver
        if senders == 0 && reason == DisconnectReason::RequestedBySender {
            self.request_teardown(TeardownReason::SenderDisconnected);
        }
    }

    fn on_visibility_changed(&mut self, visible: bool) {
        info!("onVisibilityChanged: visible={}", visible);
        if !visible {
            self.host.sink.pause();
            self.broadcast_status(false);
        }
    }

    fn broadcast_status(&mut self, include_media: bool) {
        self.host.media_manager.broadcast_status(include_media);
        self.emit(SmsEvent::StatusBroadcast {
            include_media,
            timestamp: sms_common::time::now(),
        });
    }

    fn on_stop(&mut self, request: StopRequest, now: Instant) {
        info!("onStop: sender={}", request.sender_id);
        self.abandon_load("media is stopped");
        self.run_gated(GatedAction::FinishStop { request }, now);
    }

    fn on_error(&mut self, error: EngineError, now: Instant) {
        warn!("onError: {}", error.message);
        self.abandon_load("playback error");
        self.run_gated(GatedAction::FinishError { error }, now);
    }

    fn on_playing(&mut self, now: Instant) {
        debug!("onPlaying");
        self.deferred_play.cancel("media is already playing");
        let crossfade = self.machine.current() == PlayerState::Loading
            && self.session.category != PlaybackCategory::Audio;
        self.set_state(PlayerState::Playing, crossfade, None, now);
    }

    /// Pause from the engine: underflow means BUFFERING, otherwise PAUSED
    /// unless idle or at the end of the media
    fn on_pause(&mut self, now: Instant) {
        debug!("onPause");
        self.deferred_play.cancel("media is paused");

        let underflow = self.engine.as_ref().is_some_and(|engine| engine.is_underflow());
        if underflow {
            info!("Pause caused by buffer underflow");
            self.set_state(PlayerState::Buffering, false, None, now);
            self.broadcast_status(false);
        } else if self.machine.current() != PlayerState::Idle && !self.is_done() {
            self.set_state(PlayerState::Paused, false, None, now);
        }

        let current = self.host.sink.current_time();
        let total = self.host.sink.duration();
        self.update_progress(current, total);
    }

    fn is_done(&self) -> bool {
        match (self.host.sink.current_time(), self.host.sink.duration()) {
            (Some(current), Some(total)) => current == total,
            _ => false,
        }
    }

    fn on_ended(&mut self, now: Instant) {
        debug!("onEnded");
        self.set_state(PlayerState::Idle, true, None, now);
    }

    fn on_buffering(&mut self, now: Instant) {
        if !self.session.buffering_detection {
            return;
        }
        let enough_data = self.host.sink.has_enough_data();
        debug!("onBuffering: enough_data={}", enough_data);
        if self.machine.current() == PlayerState::Playing && !enough_data {
            self.set_state(PlayerState::Buffering, false, None, now);
        }
    }

    fn on_progress(&mut self, current: f64, total: Option<f64>, now: Instant) {
        if matches!(
            self.machine.current(),
            PlayerState::Buffering | PlayerState::Loading
        ) {
            self.set_state(PlayerState::Playing, false, None, now);
        }
        let total = total.or_else(|| self.host.sink.duration());
        self.update_progress(Some(current), total);
    }

    fn update_progress(&mut self, current: Option<f64>, total: Option<f64>) {
        if !self.is_visual() {
            return;
        }
        if let Some(view) = display::progress_view(current, total) {
            self.host.renderer.show_progress(&view);
        }
    }

    fn on_seek_start(&mut self) {
        debug!("onSeekStart");
        self.seeking.seek_started();
        self.host.renderer.set_seeking(true);
    }

    fn on_seek_end(&mut self, now: Instant) {
        debug!("onSeekEnd");
        self.seeking.seek_finished(now);
        self.host.renderer.set_seeking(true);
    }

    fn on_edit_tracks_info(&mut self, request: &EditTracksInfoRequest) {
        debug!("onEditTracksInfo");
        self.host.media_manager.edit_tracks_info(request);

        let (Some(engine), Some(active)) = (self.engine.as_mut(), request.active_track_ids.as_ref())
        else {
            return;
        };
        let changed = tracks::apply_active_tracks(&mut **engine, active);
        debug!("Changed {} streams", changed);
        self.session.tracks_cache = None;
    }

    /// Rewrite an outgoing media status for the local state
    ///
    /// The session layer reports PAUSED while the engine is refilling its
    /// buffer; senders should see BUFFERING.
    pub fn customize_status(&self, mut status: MediaStatus) -> MediaStatus {
        if status.player_state == RemotePlayerState::Paused
            && self.machine.current() == PlayerState::Buffering
        {
            status.player_state = RemotePlayerState::Buffering;
        }
        status
    }

    /// PRELOAD: prefetch artwork of playable media without changing state
    pub fn preload(&mut self, media: &MediaInformation) -> bool {
        info!("preload: contentId={:?}", media.content_id());
        let category = media::classify(media);
        if media.content_id().is_none() || category == PlaybackCategory::Unknown {
            info!("Preload rejected: unplayable media");
            return false;
        }
        if let Some(url) = media.image_url().filter(|_| self.is_visual()) {
            self.host
                .renderer
                .prefetch_images(&[url.to_string()], Uuid::new_v4());
        }
        true
    }

    /// CANCEL_PRELOAD is always acknowledged
    pub fn cancel_preload(&mut self) -> bool {
        debug!("cancelPreload");
        true
    }

    /// PRELOAD command with its sender
    pub fn on_preload(&mut self, request: &PreloadRequest) -> bool {
        debug!("onPreload: sender={}", request.sender_id);
        self.preload(&request.media)
    }
}
