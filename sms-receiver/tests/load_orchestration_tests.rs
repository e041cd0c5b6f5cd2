//! Load orchestration integration tests
//!
//! Validation and dispatch, the exactly-once load acknowledgment, deferred
//! autoplay and superseded loads.

mod helpers;

use helpers::{audio_load, hls_load, video_load, Call, Harness, MockHost};
use sms_common::{PlaybackCategory, PlayerState, SmsEvent};
use sms_receiver::media::{LoadInfo, MediaInformation, StopRequest, StreamingProtocol};
use sms_receiver::ReceiverEvent;
use std::time::Duration;

fn load_with_artwork(content_id: &str, artwork: &str) -> LoadInfo {
    LoadInfo::new(
        "sender-1",
        MediaInformation::new(content_id, "video/mp4").with_image(artwork),
    )
}

fn sink_plays(harness: &Harness) -> usize {
    harness.host.count(|call| *call == Call::SinkPlay)
}

/// Given: an idle visual receiver
/// When: an MP4 video is loaded, the engine reports metadata, then playback
/// Then: LOADING is entered, one acknowledgment is sent, and PLAYING follows
/// with a crossfade
#[test]
fn test_video_load_end_to_end() {
    let mut harness = Harness::ready(MockHost::new());
    harness.drain_events();

    harness.load(video_load());
    assert_eq!(harness.player.category(), PlaybackCategory::Video);
    assert!(harness.host.contains(&Call::RenderCategory(PlaybackCategory::Video)));
    assert!(harness.host.contains(&Call::SinkAutoplay(false)));
    assert!(harness.host.contains(&Call::ShowMetadata {
        title: "Clip".to_string(),
        subtitle: String::new(),
        artwork: None,
    }));
    assert!(harness.host.contains(&Call::Load {
        content_id: Some("https://x/a.mp4".to_string()),
        autoplay: Some(false),
    }));
    // LOADING waits for the fade-out
    assert_eq!(harness.state(), PlayerState::Idle);

    harness.settle();
    assert_eq!(harness.state(), PlayerState::Loading);
    assert!(harness.snapshot().engine_ready);
    assert_eq!(harness.host.load_completes(), 0);

    harness.event(ReceiverEvent::MetadataLoaded);
    assert_eq!(harness.host.load_completes(), 1);

    harness.event(ReceiverEvent::Playing);
    assert_eq!(harness.snapshot().pending_fades, 1);
    harness.settle();
    assert_eq!(harness.state(), PlayerState::Playing);

    let load_id = harness.snapshot().load_id.unwrap();
    let events = harness.drain_events();
    let acks: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SmsEvent::LoadCompleted {
                load_id,
                content_id,
                ..
            } => Some((*load_id, content_id.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(acks, vec![(load_id, "https://x/a.mp4".to_string())]);

    let transitions: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SmsEvent::PlayerStateChanged {
                old_state,
                new_state,
                ..
            } => Some((*old_state, *new_state)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (PlayerState::Idle, PlayerState::Loading),
            (PlayerState::Loading, PlayerState::Playing),
        ]
    );
}

#[test]
fn test_ack_when_metadata_arrives_first() {
    let mut harness = Harness::ready(MockHost::new());
    harness.load(video_load());

    harness.event(ReceiverEvent::MetadataLoaded);
    assert_eq!(harness.host.load_completes(), 0);
    assert!(harness.snapshot().metadata_observed);

    harness.settle();
    assert_eq!(harness.host.load_completes(), 1);
}

#[test]
fn test_ack_sent_exactly_once() {
    let mut harness = Harness::ready(MockHost::new());
    harness.load(video_load());
    harness.settle();

    for _ in 0..3 {
        harness.event(ReceiverEvent::MetadataLoaded);
    }
    assert_eq!(harness.host.load_completes(), 1);
    assert!(harness.snapshot().load_acknowledged);
}

#[test]
fn test_each_load_is_acknowledged() {
    let mut harness = Harness::ready(MockHost::new().audio_only());

    harness.load(audio_load());
    harness.event(ReceiverEvent::MetadataLoaded);
    harness.load(video_load());
    harness.event(ReceiverEvent::MetadataLoaded);

    assert_eq!(harness.host.load_completes(), 2);
}

/// Given: a receiver that is PLAYING
/// When: a LOAD without a content id arrives
/// Then: the load is rejected through the metadata-error path and the
/// receiver settles in IDLE
#[test]
fn test_missing_content_id_goes_idle() {
    let mut harness = Harness::ready(MockHost::new());
    harness.load(video_load());
    harness.settle();
    harness.event(ReceiverEvent::Playing);
    harness.settle();
    assert_eq!(harness.state(), PlayerState::Playing);
    harness.host.clear_calls();
    harness.drain_events();

    let media = MediaInformation {
        content_type: Some("video/mp4".to_string()),
        ..MediaInformation::default()
    };
    harness.load(LoadInfo::new("sender-2", media));
    harness.settle();

    assert_eq!(harness.state(), PlayerState::Idle);
    assert!(!harness.host.calls().iter().any(|call| matches!(call, Call::Load { .. })));
    assert_eq!(
        harness
            .host
            .count(|call| matches!(call, Call::LoadMetadataError { .. })),
        1
    );
    assert_eq!(harness.host.load_completes(), 0);
    // Failure fade, then the crossfade into IDLE
    assert_eq!(harness.host.fade_tickets().len(), 2);

    let events = harness.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        SmsEvent::LoadRejected { sender_id, reason, .. }
            if sender_id == "sender-2" && reason == "no content id"
    )));
}

#[test]
fn test_unknown_content_type_goes_idle() {
    let mut harness = Harness::ready(MockHost::new().audio_only());
    harness.drain_events();

    harness.load(LoadInfo::new(
        "sender-1",
        MediaInformation::new("https://x/doc.pdf", "application/pdf"),
    ));

    assert_eq!(harness.state(), PlayerState::Idle);
    assert_eq!(
        harness.host.count(|call| matches!(
            call,
            Call::LoadMetadataError { content_id: Some(id) } if id == "https://x/doc.pdf"
        )),
        1
    );
    let events = harness.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        SmsEvent::LoadRejected { reason, .. } if reason.contains("application/pdf")
    )));
}

#[test]
fn test_extension_classifies_without_content_type() {
    let mut harness = Harness::ready(MockHost::new().audio_only());
    harness.load(LoadInfo::new(
        "sender-1",
        MediaInformation {
            content_id: Some("https://x/track.mp3?sig=abc".to_string()),
            ..MediaInformation::default()
        },
    ));

    assert_eq!(harness.player.category(), PlaybackCategory::Audio);
    assert_eq!(harness.state(), PlayerState::Loading);
}

#[test]
fn test_autoplay_starts_after_media_info_duration() {
    let mut harness = Harness::ready(MockHost::new().audio_only());
    harness.load(audio_load());
    harness.drain_events();
    assert!(harness.snapshot().deferred_play_pending);

    harness.advance(Duration::from_millis(2999));
    assert_eq!(sink_plays(&harness), 0);

    harness.advance(Duration::from_millis(1));
    assert_eq!(sink_plays(&harness), 1);
    assert!(!harness.snapshot().deferred_play_pending);

    let events = harness.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        SmsEvent::DeferredPlayStarted {
            via_engine: false,
            ..
        }
    )));
}

#[test]
fn test_autoplay_false_never_starts() {
    let mut harness = Harness::ready(MockHost::new().audio_only());
    harness.load(audio_load().with_autoplay(false));

    assert!(!harness.snapshot().deferred_play_pending);
    harness.advance(Duration::from_secs(10));
    assert_eq!(sink_plays(&harness), 0);
}

#[test]
fn test_deferred_play_cancelled_by_playback_events() {
    let triggers = vec![
        ReceiverEvent::Paused,
        ReceiverEvent::Playing,
        ReceiverEvent::Stop(Default::default()),
    ];

    for trigger in triggers {
        let mut harness = Harness::ready(MockHost::new().audio_only());
        harness.load(audio_load());
        assert!(harness.snapshot().deferred_play_pending);

        harness.event(trigger.clone());
        assert!(
            !harness.snapshot().deferred_play_pending,
            "{} should cancel deferred play",
            trigger.name()
        );

        harness.advance(Duration::from_secs(5));
        assert_eq!(sink_plays(&harness), 0, "{}", trigger.name());
    }
}

#[test]
fn test_new_load_replaces_deferred_play() {
    let mut harness = Harness::ready(MockHost::new().audio_only());
    harness.load(audio_load());

    harness.advance(Duration::from_secs(2));
    harness.load(audio_load());

    // The first load's start would have fired at 3 s
    harness.advance(Duration::from_secs(2));
    assert_eq!(sink_plays(&harness), 0);

    harness.advance(Duration::from_secs(1));
    assert_eq!(sink_plays(&harness), 1);
}

#[test]
fn test_deferred_play_prefers_streaming_engine() {
    let host = MockHost::new()
        .audio_only()
        .with_engine(&[("video/mp4", true), ("audio/mp4", true)]);
    let mut harness = Harness::ready(host);

    harness.load(hls_load());
    assert!(harness
        .host
        .contains(&Call::EngineCreated(StreamingProtocol::Hls)));
    assert!(harness.snapshot().engine_bound);

    harness.advance(Duration::from_secs(3));
    assert!(harness.host.contains(&Call::EnginePlayWhenSufficient));
    assert_eq!(sink_plays(&harness), 0);
}

#[test]
fn test_new_load_unloads_previous_engine() {
    let host = MockHost::new()
        .audio_only()
        .with_engine(&[("video/mp4", true)]);
    let mut harness = Harness::ready(host);

    harness.load(hls_load());
    harness.load(audio_load());

    assert_eq!(harness.host.count(|call| *call == Call::EngineUnload), 1);
    assert!(!harness.snapshot().engine_bound);
}

#[test]
fn test_load_complete_carries_engine_tracks() {
    let host = MockHost::new().audio_only().with_engine(&[
        ("video/mp4", true),
        ("audio/mp4", true),
        ("text/vtt", false),
    ]);
    let mut harness = Harness::ready(host);
    harness.load(hls_load());
    harness.event(ReceiverEvent::MetadataLoaded);

    let tracks = harness
        .host
        .calls()
        .into_iter()
        .find_map(|call| match call {
            Call::LoadComplete { tracks, .. } => tracks,
            _ => None,
        })
        .unwrap();
    assert_eq!(tracks.tracks.len(), 2);
    assert_eq!(tracks.active_track_ids, vec![1, 2]);
}

#[test]
fn test_visual_load_populates_metadata_and_prefetches_artwork() {
    let mut harness = Harness::ready(MockHost::new());
    harness.load(load_with_artwork("https://x/a.mp4", "https://x/a.jpg"));

    assert!(harness.host.contains(&Call::ShowMetadata {
        title: String::new(),
        subtitle: String::new(),
        artwork: Some("https://x/a.jpg".to_string()),
    }));
    let load_id = harness.snapshot().load_id.unwrap();
    assert_eq!(harness.host.prefetch_tickets(), vec![load_id]);
    // The transition starts only once the artwork is in
    assert!(harness.host.fade_tickets().is_empty());

    harness.settle();
    assert_eq!(harness.state(), PlayerState::Loading);
}

#[test]
fn test_audio_only_load_skips_display_work() {
    let mut harness = Harness::ready(MockHost::new().audio_only());
    harness.load(LoadInfo::new(
        "sender-1",
        MediaInformation::new("https://x/song.mp3", "audio/mpeg").with_image("https://x/a.jpg"),
    ));

    assert_eq!(harness.state(), PlayerState::Loading);
    let calls = harness.host.calls();
    assert!(!calls.iter().any(|call| matches!(
        call,
        Call::ShowMetadata { .. } | Call::Prefetch(..) | Call::FadeOut(..)
    )));
}

#[test]
fn test_stale_prefetch_completion_ignored() {
    let mut harness = Harness::ready(MockHost::new());
    harness.load(load_with_artwork("https://x/a.mp4", "https://x/a.jpg"));
    harness.load(load_with_artwork("https://x/b.mp4", "https://x/b.jpg"));

    // Completion for the superseded load
    assert!(harness.complete_next_prefetch());
    assert!(harness.host.fade_tickets().is_empty());

    assert!(harness.complete_next_prefetch());
    assert_eq!(harness.host.fade_tickets().len(), 1);
    harness.settle();
    assert_eq!(harness.state(), PlayerState::Loading);
}

#[test]
fn test_superseded_load_settle_discarded() {
    let mut harness = Harness::ready(MockHost::new());
    harness.drain_events();

    harness.load(video_load());
    harness.load(video_load());
    assert_eq!(harness.host.fade_tickets().len(), 2);

    harness.complete_next_fade();
    assert_eq!(harness.state(), PlayerState::Idle);

    harness.complete_next_fade();
    assert_eq!(harness.state(), PlayerState::Loading);
    assert_eq!(
        harness.drain_transitions(),
        vec![(PlayerState::Idle, PlayerState::Loading)]
    );
}

/// Given: a visual load still waiting on its artwork
/// When: the sender stops it and the artwork arrives afterwards
/// Then: the player stays IDLE, nothing is acknowledged and nothing plays
#[test]
fn test_stop_during_prefetch_abandons_load() {
    let mut harness = Harness::ready(MockHost::new());
    harness.load(load_with_artwork("https://x/a.mp4", "https://x/a.jpg"));

    harness.event(ReceiverEvent::Stop(StopRequest::default()));
    assert!(harness.complete_next_fade());
    assert_eq!(harness.state(), PlayerState::Idle);
    assert!(harness.host.contains(&Call::Stop));
    assert_eq!(harness.snapshot().load_id, None);

    assert!(harness.complete_next_prefetch());
    harness.settle();
    harness.event(ReceiverEvent::MetadataLoaded);
    harness.advance(Duration::from_secs(10));

    assert_eq!(harness.state(), PlayerState::Idle);
    assert_eq!(harness.host.load_completes(), 0);
    assert!(!harness.host.contains(&Call::SinkPlay));
}

#[test]
fn test_rejected_load_during_prefetch_abandons_previous_load() {
    let mut harness = Harness::ready(MockHost::new());
    harness.load(load_with_artwork("https://x/a.mp4", "https://x/a.jpg"));

    harness.load(LoadInfo::new(
        "sender-2",
        MediaInformation::new("https://x/blob.bin", "application/octet-stream"),
    ));
    assert!(harness.complete_next_fade());
    assert!(harness.complete_next_prefetch());
    harness.settle();
    harness.event(ReceiverEvent::MetadataLoaded);
    harness.advance(Duration::from_secs(10));

    assert_eq!(harness.state(), PlayerState::Idle);
    let snapshot = harness.snapshot();
    assert_eq!(snapshot.load_id, None);
    assert!(!snapshot.engine_ready);
    assert_eq!(harness.host.load_completes(), 0);
    assert!(!harness.host.contains(&Call::SinkPlay));
}

#[test]
fn test_stop_before_load_settles_stays_idle() {
    let mut harness = Harness::ready(MockHost::new());
    harness.load(video_load());
    harness.event(ReceiverEvent::Stop(StopRequest::default()));

    harness.settle();
    harness.event(ReceiverEvent::MetadataLoaded);
    harness.advance(Duration::from_secs(10));

    assert_eq!(harness.state(), PlayerState::Idle);
    assert_eq!(harness.host.load_completes(), 0);
    assert!(!harness.host.contains(&Call::SinkPlay));
}

#[test]
fn test_audio_on_screen_moves_overlay() {
    let mut harness = Harness::ready(MockHost::new());
    let overlay_moves = |harness: &Harness| {
        harness
            .host
            .count(|call| matches!(call, Call::MoveOverlay(..)))
    };

    harness.load(audio_load());
    harness.advance(Duration::from_secs(30));
    assert_eq!(overlay_moves(&harness), 1);
    let (bottom, left) = harness
        .host
        .calls()
        .into_iter()
        .find_map(|call| match call {
            Call::MoveOverlay(bottom, left) => Some((bottom, left)),
            _ => None,
        })
        .unwrap();
    assert!(bottom <= 100);
    assert!(left <= 600);

    harness.host.clear_calls();
    harness.load(video_load());
    assert!(harness.host.contains(&Call::ResetOverlay));
    harness.advance(Duration::from_secs(60));
    assert_eq!(overlay_moves(&harness), 0);
}

#[test]
fn test_metadata_loaded_shows_total_time() {
    let mut harness = Harness::ready(MockHost::new());
    harness.load(video_load());
    harness.host.world().duration = Some(125.0);

    harness.event(ReceiverEvent::MetadataLoaded);
    assert!(harness
        .host
        .contains(&Call::ShowDuration("02:05".to_string(), false)));

    harness.host.world().duration = None;
    harness.event(ReceiverEvent::MetadataLoaded);
    assert!(harness.host.contains(&Call::ShowDuration(String::new(), true)));
}
