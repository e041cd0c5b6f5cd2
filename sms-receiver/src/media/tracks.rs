//! In-band track handling for streaming engine instances
//!
//! Track ids are 1-based stream indices.

use crate::host::StreamingEngine;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stream description reported by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    pub mime_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    /// Track kind from a stream mime type; text and other streams have none
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if mime_type.starts_with("video") {
            Some(TrackKind::Video)
        } else if mime_type.starts_with("audio") {
            Some(TrackKind::Audio)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub track_id: u32,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub name: Option<String>,
    pub language: Option<String>,
    pub track_content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracksInfo {
    pub tracks: Vec<Track>,
    pub active_track_ids: Vec<u32>,
}

fn track_id(index: usize) -> u32 {
    index as u32 + 1
}

/// Read the engine's streams as tracks info
///
/// Returns `None` when the engine exposes no audio or video streams.
pub fn read_tracks_info(engine: &dyn StreamingEngine) -> Option<TracksInfo> {
    let mut tracks = Vec::new();
    let mut active_track_ids = Vec::new();

    for index in 0..engine.stream_count() {
        if engine.is_stream_enabled(index) {
            active_track_ids.push(track_id(index));
        }
        let info = engine.stream_info(index);
        if let Some(kind) = TrackKind::from_mime(&info.mime_type) {
            tracks.push(Track {
                track_id: track_id(index),
                kind,
                name: info.name,
                language: info.language,
                track_content_type: info.mime_type,
            });
        }
    }

    if tracks.is_empty() {
        None
    } else {
        Some(TracksInfo {
            tracks,
            active_track_ids,
        })
    }
}

/// Enable exactly the streams listed in `active_track_ids`
///
/// Returns the number of streams whose enabled flag changed.
pub fn apply_active_tracks(engine: &mut dyn StreamingEngine, active_track_ids: &[u32]) -> usize {
    let mut changed = 0;
    for index in 0..engine.stream_count() {
        let is_active = active_track_ids.contains(&track_id(index));
        let was_active = engine.is_stream_enabled(index);
        if is_active != was_active {
            debug!(
                "Stream {} (track {}) {}",
                index,
                track_id(index),
                if is_active { "enabled" } else { "disabled" }
            );
            engine.enable_stream(index, is_active);
            changed += 1;
        }
    }
    changed
}
