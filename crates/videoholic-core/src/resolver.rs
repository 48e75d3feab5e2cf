//! Resolution engine
//!
//! Source -> descriptor -> stream handler, first match wins at both stages.
//! Resolution has no side effects, so a failure leaves the current
//! attachment exactly as it was.

use crate::source::SourceHandlerRegistry;
use crate::stream::{MediaStreamHandler, StreamHandlerRegistry};
use crate::{MediaSource, MediaStream, Result};
use std::rc::Rc;
use tracing::{debug, instrument};

/// Outcome of a successful resolution
pub struct Resolution {
    /// Name of the source handler that produced the descriptor
    pub source_handler: String,
    pub stream: MediaStream,
    pub stream_handler: Rc<dyn MediaStreamHandler>,
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("source_handler", &self.source_handler)
            .field("stream", &self.stream)
            .field("stream_handler", &self.stream_handler.name())
            .finish()
    }
}

/// Resolve a source against both registries
#[instrument(skip(sources, streams), fields(src = %src))]
pub fn resolve(
    src: &MediaSource,
    sources: &SourceHandlerRegistry,
    streams: &StreamHandlerRegistry,
) -> Result<Resolution> {
    // Only the first compatible source handler is used
    let source_handler = sources.resolve(src)?;
    let stream = source_handler.get_media_stream(src)?;
    debug!(handler = source_handler.name(), stream = %stream, "Source resolved");

    // Likewise for stream handlers
    let stream_handler = streams.resolve(&stream)?;
    debug!(handler = stream_handler.name(), "Stream handler selected");

    Ok(Resolution {
        source_handler: source_handler.name().to_string(),
        stream,
        stream_handler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Capabilities;
    use crate::engine::StreamEngines;
    use crate::{Error, MediaStreamType};

    #[test]
    fn test_mp4_resolution() {
        let sources = SourceHandlerRegistry::with_builtins();
        let streams = StreamHandlerRegistry::with_builtins(&Capabilities::all(), StreamEngines::new());

        let resolution = resolve(&MediaSource::from("video.mp4"), &sources, &streams).unwrap();
        assert_eq!(resolution.source_handler, "url");
        assert_eq!(resolution.stream, MediaStream::new(MediaStreamType::Mp4, "video.mp4"));
        assert_eq!(resolution.stream_handler.name(), "native-mp4");
    }

    #[test]
    fn test_source_failure_comes_first() {
        let sources = SourceHandlerRegistry::with_builtins();
        let streams = StreamHandlerRegistry::empty();

        let err = resolve(&MediaSource::from("movie.avi"), &sources, &streams).unwrap_err();
        assert_eq!(err.error_code(), "NO_SOURCE_HANDLER");
    }

    #[test]
    fn test_stream_failure() {
        let sources = SourceHandlerRegistry::with_builtins();
        let streams = StreamHandlerRegistry::empty();

        let err = resolve(&MediaSource::from("video.webm"), &sources, &streams).unwrap_err();
        assert!(matches!(
            err,
            Error::NoCompatibleStreamHandler {
                stream_type: MediaStreamType::Webm,
                ..
            }
        ));
    }
}
