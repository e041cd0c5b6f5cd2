//! Media descriptors and session command payloads
//!
//! Field names follow the sender protocol's camelCase so payloads handed over
//! by the transport deserialize without renaming.

pub mod classifier;
pub mod tracks;

pub use classifier::{classify, streaming_protocol, validate, LoadRejection, StreamingProtocol};
pub use tracks::{StreamInfo, Track, TrackKind, TracksInfo};

use serde::{Deserialize, Serialize};

/// Artwork or thumbnail attached to media metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

/// Display metadata for a media item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Media descriptor carried by LOAD and PRELOAD
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInformation {
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub metadata: Option<MediaMetadata>,
    /// Duration in seconds, if known to the sender
    #[serde(default)]
    pub duration: Option<f64>,
}

impl MediaInformation {
    /// Convenience constructor for a content id + content type pair
    pub fn new(content_id: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content_id: Some(content_id.into()),
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }

    /// Attach a title to the metadata
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.get_or_insert_with(MediaMetadata::default).title = Some(title.into());
        self
    }

    /// Attach an artwork image to the metadata
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(MediaMetadata::default)
            .images
            .push(Image { url: url.into() });
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.subtitle.as_deref())
    }

    /// URL of the first image, used as artwork
    pub fn image_url(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.images.first())
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
    }

    /// Content id, treating the empty string as missing
    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// LOAD message body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    #[serde(default)]
    pub request_id: u64,
    pub media: MediaInformation,
    /// Autoplay as requested; absent means autoplay
    #[serde(default)]
    pub autoplay: Option<bool>,
    /// Start position in seconds
    #[serde(default)]
    pub current_time: Option<f64>,
    #[serde(default)]
    pub active_track_ids: Option<Vec<u32>>,
}

/// A LOAD request together with the sender that issued it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadInfo {
    pub sender_id: String,
    pub message: LoadRequest,
}

impl LoadInfo {
    pub fn new(sender_id: impl Into<String>, media: MediaInformation) -> Self {
        Self {
            sender_id: sender_id.into(),
            message: LoadRequest {
                media,
                ..LoadRequest::default()
            },
        }
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.message.autoplay = Some(autoplay);
        self
    }

    pub fn media(&self) -> &MediaInformation {
        &self.message.media
    }
}

/// STOP message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRequest {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub request_id: u64,
}

/// PRELOAD message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadRequest {
    #[serde(default)]
    pub sender_id: String,
    pub media: MediaInformation,
}

/// EDIT_TRACKS_INFO message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTracksInfoRequest {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub request_id: u64,
    /// 1-based ids of tracks that should be active
    #[serde(default)]
    pub active_track_ids: Option<Vec<u32>>,
}

/// Error reported by the engine, forwarded to the session layer unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineError {
    /// Human-readable description
    pub message: String,
    /// Opaque engine payload
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: serde_json::Value::Null,
        }
    }
}

/// Player state as reported to senders in media status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemotePlayerState {
    Idle,
    Playing,
    Paused,
    Buffering,
}

/// Outgoing media status, passed through the status customization hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStatus {
    pub player_state: RemotePlayerState,
    #[serde(default)]
    pub current_time: Option<f64>,
    #[serde(default)]
    pub media: Option<MediaInformation>,
}
