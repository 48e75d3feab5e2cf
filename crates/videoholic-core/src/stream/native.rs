//! Native playback through the surface's own source slots

use super::MediaStreamHandler;
use crate::capabilities::Capabilities;
use crate::surface::RenderingSurface;
use crate::types::StreamLocator;
use crate::{MediaStream, MediaStreamType, Result};
use tracing::debug;

/// Plays one stream type natively by handing the surface its source
#[derive(Debug, Clone)]
pub struct NativeStreamHandler {
    stream_type: MediaStreamType,
    supported: bool,
    name: String,
}

impl NativeStreamHandler {
    /// Support taken from the environment capabilities
    pub fn new(stream_type: MediaStreamType, capabilities: &Capabilities) -> Self {
        Self::with_support(stream_type, capabilities.supports_native(stream_type))
    }

    /// Support decided by the caller, e.g. for media stream objects
    pub fn with_support(stream_type: MediaStreamType, supported: bool) -> Self {
        Self {
            stream_type,
            supported,
            name: format!("native-{}", stream_type.to_string().to_lowercase().replace('_', "-")),
        }
    }
}

impl MediaStreamHandler for NativeStreamHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn can_handle_stream(&self, stream: &MediaStream) -> bool {
        stream.stream_type == self.stream_type
    }

    fn attach(&self, surface: &dyn RenderingSurface, stream: &MediaStream) -> Result<()> {
        debug!(handler = %self.name, url = %stream.url, "Native attach");
        match &stream.url {
            StreamLocator::Url(url) => surface.set_src(Some(url)),
            StreamLocator::Object(object) => surface.set_src_object(Some(object.clone())),
        }
        Ok(())
    }

    fn detach(&self, surface: &dyn RenderingSurface) {
        debug!(handler = %self.name, "Native detach");
        surface.set_src_object(None);
        surface.set_src(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use crate::MediaObject;

    #[test]
    fn test_names() {
        assert_eq!(
            NativeStreamHandler::with_support(MediaStreamType::Mp4, true).name(),
            "native-mp4"
        );
        assert_eq!(
            NativeStreamHandler::with_support(MediaStreamType::MediaStreamObject, true).name(),
            "native-media-stream-object"
        );
    }

    #[test]
    fn test_support_follows_capabilities() {
        let caps = Capabilities {
            webm: true,
            ..Capabilities::none()
        };
        assert!(NativeStreamHandler::new(MediaStreamType::Webm, &caps).is_supported());
        assert!(!NativeStreamHandler::new(MediaStreamType::Mp4, &caps).is_supported());
    }

    #[test]
    fn test_attach_sets_surface_source() {
        let surface = HeadlessSurface::new();
        let handler = NativeStreamHandler::with_support(MediaStreamType::Mp4, true);
        let stream = MediaStream::new(MediaStreamType::Mp4, "video.mp4");

        assert!(handler.can_handle_stream(&stream));
        handler.attach(&surface, &stream).unwrap();
        assert_eq!(surface.src().as_deref(), Some("video.mp4"));

        handler.detach(&surface);
        assert_eq!(surface.src(), None);
    }

    #[test]
    fn test_attach_media_stream_object() {
        let surface = HeadlessSurface::new();
        let handler = NativeStreamHandler::with_support(MediaStreamType::MediaStreamObject, true);
        let camera = MediaObject::new("camera");
        let stream = MediaStream::object(MediaStreamType::MediaStreamObject, camera.clone());

        handler.attach(&surface, &stream).unwrap();
        assert_eq!(surface.src_object(), Some(camera));

        handler.detach(&surface);
        assert_eq!(surface.src_object(), None);
    }

    #[test]
    fn test_rejects_other_types() {
        let handler = NativeStreamHandler::with_support(MediaStreamType::Mp4, true);
        assert!(!handler.can_handle_stream(&MediaStream::new(MediaStreamType::Webm, "a.webm")));
    }
}
