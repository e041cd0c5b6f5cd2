//! Recording mock collaborators
//!
//! Every collaborator appends to the same call log and reads the same
//! world, so tests can both script collaborator answers (sink times,
//! underflow, sender count) and assert on the exact call sequence.

use sms_common::{PlaybackCategory, PlayerState};
use sms_receiver::host::{
    DeviceCapabilities, DisplayRegion, EngineFactory, Host, MediaManager, MediaSink,
    ProgressView, ReceiverManager, Renderer, StreamingEngine,
};
use sms_receiver::media::{
    EditTracksInfoRequest, EngineError, LoadInfo, MediaInformation, StopRequest, StreamInfo,
    StreamingProtocol, TracksInfo,
};
use sms_receiver::playback::FadeTicket;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

/// One observed collaborator call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    // Receiver manager
    SetApplicationState(String),
    ReceiverStop,

    // Media manager
    Load { content_id: Option<String>, autoplay: Option<bool> },
    Stop,
    LoadComplete { content_id: Option<String>, tracks: Option<TracksInfo> },
    LoadMetadataError { content_id: Option<String> },
    Error(EngineError),
    EditTracksInfo(Option<Vec<u32>>),
    BroadcastStatus(bool),

    // Sink
    SinkPlay,
    SinkPause,
    SinkAutoplay(bool),

    // Engine
    EngineCreated(StreamingProtocol),
    EngineUnload,
    EnginePlayWhenSufficient,
    EnableStream(usize, bool),

    // Renderer
    RenderState(PlayerState),
    RenderCategory(PlaybackCategory),
    FadeOut(FadeTicket, Duration),
    FadeIn(Duration),
    ShowMetadata { title: String, subtitle: String, artwork: Option<String> },
    Prefetch(Vec<String>, Uuid),
    ShowProgress(ProgressView),
    ShowDuration(String, bool),
    Seeking(bool),
    MoveOverlay(u32, u32),
    ResetOverlay,
}

/// Scripted collaborator answers plus the call log
#[derive(Debug)]
pub struct World {
    pub calls: Vec<Call>,
    pub display_supported: Option<bool>,
    pub missing_region: Option<DisplayRegion>,
    pub senders: usize,
    pub media: Option<MediaInformation>,
    pub current_time: Option<f64>,
    pub duration: Option<f64>,
    pub enough_data: bool,
    pub underflow: bool,
    /// Engines are handed out only when set
    pub engine_streams: Option<Vec<(StreamInfo, bool)>>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            display_supported: None,
            missing_region: None,
            senders: 0,
            media: None,
            current_time: None,
            duration: None,
            enough_data: true,
            underflow: false,
            engine_streams: None,
        }
    }
}

type Shared = Arc<Mutex<World>>;

fn record(world: &Shared, call: Call) {
    world.lock().unwrap().calls.push(call);
}

/// Builder and inspector for a recording host
#[derive(Clone, Default)]
pub struct MockHost {
    world: Shared,
}

impl MockHost {
    /// Visual device with every display region present
    pub fn new() -> Self {
        Self::default()
    }

    pub fn audio_only(self) -> Self {
        self.world().display_supported = Some(false);
        self
    }

    pub fn missing_region(self, region: DisplayRegion) -> Self {
        self.world().missing_region = Some(region);
        self
    }

    /// Hand out streaming engines with the given (mime type, enabled) streams
    pub fn with_engine(self, streams: &[(&str, bool)]) -> Self {
        self.world().engine_streams = Some(
            streams
                .iter()
                .map(|(mime, enabled)| {
                    (
                        StreamInfo {
                            mime_type: mime.to_string(),
                            name: None,
                            language: None,
                        },
                        *enabled,
                    )
                })
                .collect(),
        );
        self
    }

    /// Collaborators for a new player
    pub fn host(&self) -> Host {
        Host {
            receiver: Box::new(MockReceiver(self.world.clone())),
            media_manager: Box::new(MockMediaManager(self.world.clone())),
            sink: Box::new(MockSink(self.world.clone())),
            renderer: Box::new(MockRenderer(self.world.clone())),
            engine_factory: Some(Box::new(MockEngineFactory(self.world.clone()))),
        }
    }

    pub fn world(&self) -> MutexGuard<'_, World> {
        self.world.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.world().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.world().calls.clear();
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.world().calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.world().calls.contains(call)
    }

    pub fn fade_tickets(&self) -> Vec<FadeTicket> {
        self.world()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::FadeOut(ticket, _) => Some(*ticket),
                _ => None,
            })
            .collect()
    }

    pub fn prefetch_tickets(&self) -> Vec<Uuid> {
        self.world()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Prefetch(_, ticket) => Some(*ticket),
                _ => None,
            })
            .collect()
    }

    pub fn load_completes(&self) -> usize {
        self.count(|call| matches!(call, Call::LoadComplete { .. }))
    }

    pub fn application_states(&self) -> Vec<String> {
        self.world()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::SetApplicationState(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

struct MockReceiver(Shared);

impl ReceiverManager for MockReceiver {
    fn set_application_state(&mut self, text: &str) {
        record(&self.0, Call::SetApplicationState(text.to_string()));
    }

    fn stop(&mut self) {
        record(&self.0, Call::ReceiverStop);
    }

    fn sender_count(&self) -> usize {
        self.0.lock().unwrap().senders
    }

    fn device_capabilities(&self) -> DeviceCapabilities {
        DeviceCapabilities {
            display_supported: self.0.lock().unwrap().display_supported,
        }
    }
}

struct MockMediaManager(Shared);

impl MediaManager for MockMediaManager {
    fn load(&mut self, info: &LoadInfo) {
        let mut world = self.0.lock().unwrap();
        world.media = Some(info.media().clone());
        world.calls.push(Call::Load {
            content_id: info.media().content_id.clone(),
            autoplay: info.message.autoplay,
        });
    }

    fn stop(&mut self, _request: &StopRequest) {
        let mut world = self.0.lock().unwrap();
        world.media = None;
        world.calls.push(Call::Stop);
    }

    fn load_complete(&mut self, info: &LoadInfo, tracks: Option<&TracksInfo>) {
        record(
            &self.0,
            Call::LoadComplete {
                content_id: info.media().content_id.clone(),
                tracks: tracks.cloned(),
            },
        );
    }

    fn load_metadata_error(&mut self, info: &LoadInfo) {
        record(
            &self.0,
            Call::LoadMetadataError {
                content_id: info.media().content_id.clone(),
            },
        );
    }

    fn error(&mut self, error: &EngineError) {
        record(&self.0, Call::Error(error.clone()));
    }

    fn edit_tracks_info(&mut self, request: &EditTracksInfoRequest) {
        record(&self.0, Call::EditTracksInfo(request.active_track_ids.clone()));
    }

    fn broadcast_status(&mut self, include_media: bool) {
        record(&self.0, Call::BroadcastStatus(include_media));
    }

    fn media_information(&self) -> Option<MediaInformation> {
        self.0.lock().unwrap().media.clone()
    }
}

struct MockSink(Shared);

impl MediaSink for MockSink {
    fn play(&mut self) {
        record(&self.0, Call::SinkPlay);
    }

    fn pause(&mut self) {
        record(&self.0, Call::SinkPause);
    }

    fn set_autoplay(&mut self, autoplay: bool) {
        record(&self.0, Call::SinkAutoplay(autoplay));
    }

    fn current_time(&self) -> Option<f64> {
        self.0.lock().unwrap().current_time
    }

    fn duration(&self) -> Option<f64> {
        self.0.lock().unwrap().duration
    }

    fn has_enough_data(&self) -> bool {
        self.0.lock().unwrap().enough_data
    }
}

struct MockRenderer(Shared);

impl Renderer for MockRenderer {
    fn has_region(&self, region: DisplayRegion) -> bool {
        self.0.lock().unwrap().missing_region != Some(region)
    }

    fn set_state(&mut self, state: PlayerState) {
        record(&self.0, Call::RenderState(state));
    }

    fn set_category(&mut self, category: PlaybackCategory) {
        record(&self.0, Call::RenderCategory(category));
    }

    fn fade_out(&mut self, ticket: FadeTicket, duration: Duration) {
        record(&self.0, Call::FadeOut(ticket, duration));
    }

    fn fade_in(&mut self, duration: Duration) {
        record(&self.0, Call::FadeIn(duration));
    }

    fn show_metadata(&mut self, title: &str, subtitle: &str, artwork: Option<&str>) {
        record(
            &self.0,
            Call::ShowMetadata {
                title: title.to_string(),
                subtitle: subtitle.to_string(),
                artwork: artwork.map(str::to_string),
            },
        );
    }

    fn prefetch_images(&mut self, urls: &[String], ticket: Uuid) {
        record(&self.0, Call::Prefetch(urls.to_vec(), ticket));
    }

    fn show_progress(&mut self, progress: &ProgressView) {
        record(&self.0, Call::ShowProgress(progress.clone()));
    }

    fn show_duration(&mut self, total_label: &str, unbounded: bool) {
        record(&self.0, Call::ShowDuration(total_label.to_string(), unbounded));
    }

    fn set_seeking(&mut self, seeking: bool) {
        record(&self.0, Call::Seeking(seeking));
    }

    fn move_overlay(&mut self, margin_bottom_px: u32, margin_left_px: u32) {
        record(&self.0, Call::MoveOverlay(margin_bottom_px, margin_left_px));
    }

    fn reset_overlay(&mut self) {
        record(&self.0, Call::ResetOverlay);
    }
}

struct MockEngineFactory(Shared);

impl EngineFactory for MockEngineFactory {
    fn create(
        &mut self,
        _info: &LoadInfo,
        protocol: StreamingProtocol,
    ) -> Option<Box<dyn StreamingEngine>> {
        let mut world = self.0.lock().unwrap();
        let streams = world.engine_streams.clone()?;
        world.calls.push(Call::EngineCreated(protocol));
        Some(Box::new(MockEngine {
            world: self.0.clone(),
            streams,
        }))
    }
}

struct MockEngine {
    world: Shared,
    streams: Vec<(StreamInfo, bool)>,
}

impl StreamingEngine for MockEngine {
    fn unload(&mut self) {
        record(&self.world, Call::EngineUnload);
    }

    fn play_when_buffer_sufficient(&mut self) {
        record(&self.world, Call::EnginePlayWhenSufficient);
    }

    fn is_underflow(&self) -> bool {
        self.world.lock().unwrap().underflow
    }

    fn stream_count(&self) -> usize {
        self.streams.len()
    }

    fn is_stream_enabled(&self, index: usize) -> bool {
        self.streams[index].1
    }

    fn enable_stream(&mut self, index: usize, enabled: bool) {
        self.streams[index].1 = enabled;
        record(&self.world, Call::EnableStream(index, enabled));
    }

    fn stream_info(&self, index: usize) -> StreamInfo {
        self.streams[index].0.clone()
    }
}
