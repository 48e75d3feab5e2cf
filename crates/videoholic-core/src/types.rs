//! Core types for Videoholic

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Unique identifier for a controller instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllerId(pub Uuid);

impl ControllerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ControllerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a rendering surface, used as the target of native events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub Uuid);

impl SurfaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery mechanism of a resolved stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaStreamType {
    Hls,
    Dash,
    Mp4,
    Webm,
    /// A pre-built media stream object (camera, screen capture, peer connection)
    MediaStreamObject,
}

impl MediaStreamType {
    /// Infer the stream type from a MIME type hint
    pub fn from_mime(mime: &str) -> Option<Self> {
        // Drop parameters such as `; codecs="avc1.42E01E"`
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/x-mpegurl" | "application/vnd.apple.mpegurl" | "audio/mpegurl" => {
                Some(MediaStreamType::Hls)
            }
            "application/dash+xml" => Some(MediaStreamType::Dash),
            "video/mp4" | "audio/mp4" => Some(MediaStreamType::Mp4),
            "video/webm" | "audio/webm" => Some(MediaStreamType::Webm),
            _ => None,
        }
    }

    /// Infer the stream type from a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "m3u8" | "m3u" => Some(MediaStreamType::Hls),
            "mpd" => Some(MediaStreamType::Dash),
            "mp4" | "m4v" => Some(MediaStreamType::Mp4),
            "webm" => Some(MediaStreamType::Webm),
            _ => None,
        }
    }

    /// Canonical MIME type, used for capability probing
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            MediaStreamType::Hls => Some("application/vnd.apple.mpegURL"),
            MediaStreamType::Dash => Some("application/dash+xml"),
            MediaStreamType::Mp4 => Some("video/mp4"),
            MediaStreamType::Webm => Some("video/webm"),
            MediaStreamType::MediaStreamObject => None,
        }
    }
}

impl fmt::Display for MediaStreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaStreamType::Hls => write!(f, "HLS"),
            MediaStreamType::Dash => write!(f, "DASH"),
            MediaStreamType::Mp4 => write!(f, "MP4"),
            MediaStreamType::Webm => write!(f, "WEBM"),
            MediaStreamType::MediaStreamObject => write!(f, "MEDIA_STREAM_OBJECT"),
        }
    }
}

/// Opaque caller-owned object (a pre-built stream, a custom source shape).
///
/// Equality is identity: two handles are equal only if they share the same
/// allocation.
#[derive(Clone)]
pub struct MediaObject(Rc<dyn Any>);

impl MediaObject {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl PartialEq for MediaObject {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MediaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MediaObject({:p})", Rc::as_ptr(&self.0))
    }
}

/// Where a resolved stream lives
#[derive(Debug, Clone, PartialEq)]
pub enum StreamLocator {
    Url(String),
    Object(MediaObject),
}

impl StreamLocator {
    pub fn as_url(&self) -> Option<&str> {
        match self {
            StreamLocator::Url(url) => Some(url),
            StreamLocator::Object(_) => None,
        }
    }
}

impl fmt::Display for StreamLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamLocator::Url(url) => write!(f, "{}", url),
            StreamLocator::Object(obj) => write!(f, "{:?}", obj),
        }
    }
}

/// Typed stream descriptor produced by a source handler
#[derive(Debug, Clone, PartialEq)]
pub struct MediaStream {
    pub stream_type: MediaStreamType,
    pub url: StreamLocator,
}

impl MediaStream {
    pub fn new(stream_type: MediaStreamType, url: impl Into<String>) -> Self {
        Self {
            stream_type,
            url: StreamLocator::Url(url.into()),
        }
    }

    pub fn object(stream_type: MediaStreamType, object: MediaObject) -> Self {
        Self {
            stream_type,
            url: StreamLocator::Object(object),
        }
    }
}

impl fmt::Display for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.stream_type, self.url)
    }
}

/// Caller-supplied media source.
///
/// Shape-agnostic: only the registered source handlers give it meaning.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    /// A URL string
    Url(String),
    /// A URL with an explicit MIME type hint
    TypedUrl { url: String, mime_type: String },
    /// An already-resolved stream descriptor
    Stream(MediaStream),
    /// Any other caller-defined shape
    Custom(MediaObject),
}

impl MediaSource {
    pub fn url(url: impl Into<String>) -> Self {
        MediaSource::Url(url.into())
    }

    pub fn typed(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        MediaSource::TypedUrl {
            url: url.into(),
            mime_type: mime_type.into(),
        }
    }
}

impl From<&str> for MediaSource {
    fn from(url: &str) -> Self {
        MediaSource::Url(url.to_string())
    }
}

impl From<String> for MediaSource {
    fn from(url: String) -> Self {
        MediaSource::Url(url)
    }
}

impl From<MediaStream> for MediaSource {
    fn from(stream: MediaStream) -> Self {
        MediaSource::Stream(stream)
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Url(url) => write!(f, "{}", url),
            MediaSource::TypedUrl { url, mime_type } => write!(f, "{} ({})", url, mime_type),
            MediaSource::Stream(stream) => write!(f, "{}", stream),
            MediaSource::Custom(obj) => write!(f, "{:?}", obj),
        }
    }
}

/// Playback status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Playing,
    #[default]
    Paused,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Paused => write!(f, "paused"),
        }
    }
}

/// Snapshot of the rendering surface's playback fields.
///
/// Never cached: always recomputed from the surface at read time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Current position in seconds
    pub current_time: f64,
    /// Duration in seconds (0 when unknown)
    pub duration: f64,
    pub muted: bool,
    pub playback_rate: f64,
    pub status: PlaybackStatus,
    /// Volume (0.0 - 1.0)
    pub volume: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            muted: false,
            playback_rate: 0.0,
            status: PlaybackStatus::Paused,
            volume: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_type_from_mime() {
        assert_eq!(
            MediaStreamType::from_mime("application/x-mpegURL"),
            Some(MediaStreamType::Hls)
        );
        assert_eq!(
            MediaStreamType::from_mime("video/mp4; codecs=\"avc1.42E01E\""),
            Some(MediaStreamType::Mp4)
        );
        assert_eq!(MediaStreamType::from_mime("text/html"), None);
    }

    #[test]
    fn test_stream_type_from_extension() {
        assert_eq!(MediaStreamType::from_extension("MPD"), Some(MediaStreamType::Dash));
        assert_eq!(MediaStreamType::from_extension("webm"), Some(MediaStreamType::Webm));
        assert_eq!(MediaStreamType::from_extension("avi"), None);
    }

    #[test]
    fn test_media_object_identity() {
        let a = MediaObject::new(42u32);
        let b = a.clone();
        let c = MediaObject::new(42u32);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.downcast_ref::<u32>(), Some(&42));
    }

    #[test]
    fn test_source_equality() {
        assert_eq!(MediaSource::from("video.mp4"), MediaSource::url("video.mp4"));
        assert_ne!(
            MediaSource::from("video.mp4"),
            MediaSource::typed("video.mp4", "video/mp4")
        );
    }

    #[test]
    fn test_default_playback_state() {
        let state = PlaybackState::default();
        assert_eq!(state.status, PlaybackStatus::Paused);
        assert_eq!(state.current_time, 0.0);
        assert_eq!(state.duration, 0.0);
    }
}
