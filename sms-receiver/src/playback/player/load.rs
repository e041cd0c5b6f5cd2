//! Load orchestration
//!
//! A LOAD is validated and classified, the previous engine instance is torn
//! down, the request is prepared for its category and handed to the default
//! load path. Artwork is prefetched, then a gated transition enters LOADING
//! and marks the engine ready. The acknowledgment goes out once that and the
//! engine's metadata-loaded event have both happened.

use super::CastPlayer;
use crate::media::{self, tracks, LoadInfo, MediaInformation, TracksInfo};
use crate::playback::load_gate::PendingLoad;
use crate::playback::transition::GatedAction;
use sms_common::human_time::format_duration_opt;
use sms_common::{PlaybackCategory, PlayerState, SmsEvent};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

impl CastPlayer {
    /// LOAD command entry point
    pub fn on_load(&mut self, info: LoadInfo, now: Instant) {
        info!(
            "onLoad: sender={}, contentId={:?}",
            info.sender_id,
            info.media().content_id()
        );
        self.load(info, now);
    }

    /// Load `info`, replacing whatever was loaded before
    pub fn load(&mut self, mut info: LoadInfo, now: Instant) {
        self.idle_timer.cancel();
        self.deferred_play.cancel("new media is loaded");

        let category = match media::validate(info.media()) {
            Ok(category) => category,
            Err(rejection) => {
                warn!("Load failed: {}", rejection);
                self.emit(SmsEvent::LoadRejected {
                    sender_id: info.sender_id.clone(),
                    reason: rejection.to_string(),
                    timestamp: sms_common::time::now(),
                });
                self.on_load_metadata_error(info, now);
                return;
            }
        };

        info!("Loading: {}", category);
        self.reset_media_element();
        self.set_category(category, now);
        match category {
            PlaybackCategory::Video => self.prepare_video(&mut info),
            _ => self.prepare_audio(&mut info),
        }

        let load_id = Uuid::new_v4();
        self.session.current_load = Some(load_id);
        self.load_gate.reset(load_id, info.clone());
        self.populate_metadata(info.media());
        self.host.media_manager.load(&info);

        self.prefetch_artwork(load_id, info.media(), now);
    }

    /// Unbind the engine instance and forget per-load media state
    fn reset_media_element(&mut self) {
        debug!("resetMediaElement");
        if let Some(mut engine) = self.engine.take() {
            engine.unload();
        }
        self.session.tracks_cache = None;
        self.session.buffering_detection = false;
    }

    /// Move autoplay from the sink to the player
    ///
    /// Playback then starts only after the loading screen has been shown.
    fn let_player_handle_autoplay(&mut self, info: &mut LoadInfo) {
        let autoplay = info.message.autoplay;
        debug!("letPlayerHandleAutoPlay: {:?}", autoplay);
        info.message.autoplay = Some(false);
        self.host.sink.set_autoplay(false);
        self.session.player_autoplay = autoplay.unwrap_or(true);
    }

    fn prepare_audio(&mut self, info: &mut LoadInfo) {
        debug!("loadAudio");
        self.let_player_handle_autoplay(info);
    }

    fn prepare_video(&mut self, info: &mut LoadInfo) {
        debug!("loadVideo");
        self.let_player_handle_autoplay(info);
        self.session.buffering_detection = true;

        let Some(protocol) = media::streaming_protocol(info.media()) else {
            debug!("loadVideo: using media sink");
            return;
        };
        if let Some(factory) = self.host.engine_factory.as_mut() {
            self.engine = factory.create(info, protocol);
        }
        match self.engine {
            Some(_) => info!("loadVideo: using streaming engine ({:?})", protocol),
            None => debug!("loadVideo: no engine for {:?}, using media sink", protocol),
        }
    }

    /// Title, subtitle and artwork on screen
    fn populate_metadata(&mut self, media: &MediaInformation) {
        if !self.is_visual() {
            return;
        }
        let metadata = media.metadata.as_ref();
        let title = metadata.and_then(|m| m.title.as_deref()).unwrap_or_default();
        let subtitle = metadata
            .and_then(|m| m.subtitle.as_deref())
            .unwrap_or_default();
        self.host
            .renderer
            .show_metadata(title, subtitle, media.image_url());
    }

    fn prefetch_artwork(&mut self, load_id: Uuid, media: &MediaInformation, now: Instant) {
        let artwork = match media.image_url() {
            Some(url) if self.is_visual() => url.to_string(),
            _ => {
                self.begin_load_transition(load_id, now);
                return;
            }
        };
        debug!("Prefetching artwork for load {}", load_id);
        self.host.renderer.prefetch_images(&[artwork], load_id);
    }

    /// Artwork prefetch finished
    pub(super) fn on_images_prefetched(&mut self, ticket: Uuid, now: Instant) {
        if self.session.current_load == Some(ticket) {
            self.begin_load_transition(ticket, now);
        } else {
            debug!("Ignoring prefetch completion for {}", ticket);
        }
    }

    fn begin_load_transition(&mut self, load_id: Uuid, now: Instant) {
        self.run_gated(GatedAction::CompleteLoad { load_id }, now);
    }

    /// Body of the gated load transition
    pub(super) fn complete_load(&mut self, load_id: Uuid, now: Instant) {
        if self.session.current_load != Some(load_id) {
            info!("Discarding settle of superseded load {}", load_id);
            return;
        }

        self.set_state(PlayerState::Loading, false, None, now);
        // Only acknowledge from here on, so the session is still loading and
        // the sender cannot issue PLAY before the player is ready
        if let Some(pending) = self.load_gate.mark_engine_ready() {
            self.send_load_complete(pending);
        }
        if self.session.player_autoplay {
            self.deferred_play
                .schedule(self.config.media_info_duration(), now);
            self.session.player_autoplay = false;
        }
    }

    /// Engine reported the media's metadata
    pub(super) fn on_metadata_loaded(&mut self) {
        debug!("onMetadataLoaded");
        self.show_total_time();
        if let Some(pending) = self.load_gate.mark_metadata_observed() {
            self.send_load_complete(pending);
        }
    }

    fn show_total_time(&mut self) {
        if !self.is_visual() {
            return;
        }
        let total = self.host.sink.duration().filter(|d| d.is_finite());
        self.host
            .renderer
            .show_duration(&format_duration_opt(total), total.is_none());
    }

    fn send_load_complete(&mut self, pending: PendingLoad) {
        let tracks = self.tracks_info();
        self.host
            .media_manager
            .load_complete(&pending.info, tracks.as_ref());
        info!("Sent load response, player is ready and metadata loaded");

        self.emit(SmsEvent::LoadCompleted {
            load_id: pending.load_id,
            sender_id: pending.info.sender_id.clone(),
            content_id: pending
                .info
                .media()
                .content_id()
                .unwrap_or_default()
                .to_string(),
            timestamp: sms_common::time::now(),
        });
    }

    /// Tracks of the bound engine, read once per load
    pub(super) fn tracks_info(&mut self) -> Option<TracksInfo> {
        if self.session.tracks_cache.is_none() {
            let engine = self.engine.as_deref()?;
            self.session.tracks_cache = Some(tracks::read_tracks_info(engine));
        }
        self.session.tracks_cache.clone().flatten()
    }

    /// Route a load that could not start to IDLE and report it
    pub(super) fn on_load_metadata_error(&mut self, info: LoadInfo, now: Instant) {
        debug!("onLoadMetadataError");
        self.abandon_load("load failed");
        self.run_gated(GatedAction::FinishLoadFailure { info }, now);
    }
}
