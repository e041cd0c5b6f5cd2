//! Content classification
//!
//! Maps a media descriptor to a playback category using an ordered rule
//! table: content-type prefixes first, then the file extension of the
//! content URL path. The first matching rule wins; no match is `Unknown`.

use super::MediaInformation;
use serde::{Deserialize, Serialize};
use sms_common::PlaybackCategory;
use thiserror::Error;
use url::Url;

/// Adaptive streaming manifest formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingProtocol {
    Hls,
    Dash,
    SmoothStreaming,
}

/// What a classification rule inspects
#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Lower-cased content type starts with the prefix
    ContentTypePrefix(&'static str),
    /// Lower-cased file extension of the URL path equals the value
    Extension(&'static str),
    /// Some segment of the URL path carries the extension (`movie.ism/Manifest`)
    SegmentExtension(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    matcher: Matcher,
    category: PlaybackCategory,
    protocol: Option<StreamingProtocol>,
}

const fn rule(matcher: Matcher, category: PlaybackCategory) -> Rule {
    Rule {
        matcher,
        category,
        protocol: None,
    }
}

const fn manifest(matcher: Matcher, protocol: StreamingProtocol) -> Rule {
    Rule {
        matcher,
        category: PlaybackCategory::Video,
        protocol: Some(protocol),
    }
}

use self::Matcher::{ContentTypePrefix as Type, Extension as Ext, SegmentExtension as Segment};
use sms_common::PlaybackCategory::{Audio, Video};

/// Rules in priority order
const RULES: &[Rule] = &[
    rule(Type("audio/"), Audio),
    rule(Type("video/"), Video),
    manifest(Type("application/x-mpegurl"), StreamingProtocol::Hls),
    manifest(Type("application/vnd.apple.mpegurl"), StreamingProtocol::Hls),
    manifest(Type("application/dash+xml"), StreamingProtocol::Dash),
    manifest(Type("application/vnd.ms-sstr+xml"), StreamingProtocol::SmoothStreaming),
    rule(Ext("mp3"), Audio),
    rule(Ext("oga"), Audio),
    rule(Ext("wav"), Audio),
    rule(Ext("mp4"), Video),
    rule(Ext("ogv"), Video),
    rule(Ext("webm"), Video),
    manifest(Ext("m3u8"), StreamingProtocol::Hls),
    manifest(Ext("mpd"), StreamingProtocol::Dash),
    manifest(Segment("ism"), StreamingProtocol::SmoothStreaming),
];

/// Why a load request was refused before reaching the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadRejection {
    #[error("no content id")]
    MissingContentId,

    #[error("unknown content type: {0}")]
    UnknownContentType(String),
}

/// Classify media into a playback category.
///
/// Pure and total: never fails, same input gives same output.
pub fn classify(media: &MediaInformation) -> PlaybackCategory {
    first_match(media)
        .map(|rule| rule.category)
        .unwrap_or(PlaybackCategory::Unknown)
}

/// Adaptive streaming protocol of the media, if it is a manifest
pub fn streaming_protocol(media: &MediaInformation) -> Option<StreamingProtocol> {
    first_match(media).and_then(|rule| rule.protocol)
}

/// Validate a load's media and return its category
pub fn validate(media: &MediaInformation) -> Result<PlaybackCategory, LoadRejection> {
    if media.content_id().is_none() {
        return Err(LoadRejection::MissingContentId);
    }
    match classify(media) {
        PlaybackCategory::Unknown => Err(LoadRejection::UnknownContentType(
            media.content_type.clone().unwrap_or_default(),
        )),
        category => Ok(category),
    }
}

fn first_match(media: &MediaInformation) -> Option<&'static Rule> {
    let content_type = media
        .content_type
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let path = media.content_id.as_deref().map(url_path).unwrap_or_default();
    let extension = file_extension(&path);

    RULES.iter().find(|rule| match rule.matcher {
        Matcher::ContentTypePrefix(prefix) => content_type.starts_with(prefix),
        Matcher::Extension(ext) => extension == ext,
        Matcher::SegmentExtension(ext) => path
            .split('/')
            .any(|segment| segment_extension(segment) == ext),
    })
}

/// Path component of a content id, without query or fragment
fn url_path(content_id: &str) -> String {
    match Url::parse(content_id) {
        Ok(url) => url.path().to_string(),
        // Relative ids: strip query and fragment by hand
        Err(_) => content_id
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Lower-cased extension of the last path segment, or empty
fn file_extension(path: &str) -> String {
    segment_extension(path.rsplit('/').next().unwrap_or_default())
}

fn segment_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        // Hidden files without an extension (".profile") have none
        Some(("", _)) | None => String::new(),
        Some((_, ext)) => ext.to_ascii_lowercase(),
    }
}
