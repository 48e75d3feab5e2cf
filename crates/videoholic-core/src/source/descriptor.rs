//! Pass-through handler for sources that are already stream descriptors

use super::MediaSourceHandler;
use crate::{Error, MediaSource, MediaStream, Result};

/// Recognizes pre-built [`MediaStream`] values and hands them on unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaStreamSourceHandler;

impl MediaSourceHandler for MediaStreamSourceHandler {
    fn name(&self) -> &str {
        "media-stream"
    }

    fn can_handle_source(&self, src: &MediaSource) -> bool {
        matches!(src, MediaSource::Stream(_))
    }

    fn get_media_stream(&self, src: &MediaSource) -> Result<MediaStream> {
        match src {
            MediaSource::Stream(stream) => Ok(stream.clone()),
            other => Err(Error::NoCompatibleSourceHandler {
                src: other.to_string(),
            }),
        }
    }
}
