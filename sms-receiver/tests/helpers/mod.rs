//! Test helper modules for sms-receiver integration tests
//!
//! Provides reusable test infrastructure components:
//! - MockHost: recording collaborators sharing one inspectable world
//! - Harness: drives a CastPlayer on a synthetic clock

#![allow(dead_code)]

pub mod harness;
pub mod mock_host;

pub use harness::Harness;
pub use mock_host::{Call, MockHost, World};

use sms_receiver::media::{LoadInfo, MediaInformation};

/// LOAD for an MP4 video
pub fn video_load() -> LoadInfo {
    LoadInfo::new(
        "sender-1",
        MediaInformation::new("https://x/a.mp4", "video/mp4").with_title("Clip"),
    )
}

/// LOAD for an MP3 track
pub fn audio_load() -> LoadInfo {
    LoadInfo::new(
        "sender-1",
        MediaInformation::new("https://x/song.mp3", "audio/mpeg").with_title("Song"),
    )
}

/// LOAD for an HLS stream
pub fn hls_load() -> LoadInfo {
    LoadInfo::new(
        "sender-1",
        MediaInformation::new("https://x/live/master.m3u8", "application/x-mpegURL"),
    )
}
