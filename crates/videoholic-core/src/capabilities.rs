//! Capability probe
//!
//! Environment support flags consumed by the stream handlers when they are
//! constructed. Computed once, read-only afterwards, and passed explicitly so
//! several simulated environments can coexist in the same process.

use crate::types::MediaStreamType;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Host environment feature detection
pub trait CapabilityProbe {
    /// Whether Media Source Extensions are available
    fn supports_media_source(&self) -> bool;

    /// Whether the rendering surface can natively play the given MIME type
    fn can_play_type(&self, mime_type: &str) -> bool;
}

/// Environment support booleans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Media Source Extensions (required by engine-backed handlers)
    pub mse: bool,
    /// Native HLS playback
    pub hls: bool,
    /// Native DASH playback
    pub dash: bool,
    /// Native progressive MP4 playback
    pub mp4: bool,
    /// Native progressive WEBM playback
    pub webm: bool,
}

impl Capabilities {
    /// Nothing supported (the non-browser default)
    pub fn none() -> Self {
        Self::default()
    }

    /// Everything supported
    pub fn all() -> Self {
        Self {
            mse: true,
            hls: true,
            dash: true,
            mp4: true,
            webm: true,
        }
    }

    /// Run feature detection against a probe
    pub fn detect(probe: &dyn CapabilityProbe) -> Self {
        let caps = Self {
            mse: probe.supports_media_source(),
            hls: probe.can_play_type("application/x-mpegURL")
                || can_play(probe, MediaStreamType::Hls),
            dash: can_play(probe, MediaStreamType::Dash),
            mp4: can_play(probe, MediaStreamType::Mp4),
            webm: can_play(probe, MediaStreamType::Webm),
        };

        debug!(?caps, "Environment capabilities detected");
        caps
    }

    /// Native playback support for a stream type
    pub fn supports_native(&self, stream_type: MediaStreamType) -> bool {
        match stream_type {
            MediaStreamType::Hls => self.hls,
            MediaStreamType::Dash => self.dash,
            MediaStreamType::Mp4 => self.mp4,
            MediaStreamType::Webm => self.webm,
            MediaStreamType::MediaStreamObject => false,
        }
    }
}

fn can_play(probe: &dyn CapabilityProbe, stream_type: MediaStreamType) -> bool {
    stream_type
        .mime_type()
        .is_some_and(|mime| probe.can_play_type(mime))
}
