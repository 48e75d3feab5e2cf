//! Source handlers
//!
//! A source handler recognizes one source shape and turns it into a typed
//! [`MediaStream`] descriptor. The registry is a priority-ordered sequence:
//! caller registrations are prepended and the first match wins.

mod descriptor;
mod url_source;

pub use descriptor::MediaStreamSourceHandler;
pub use url_source::{infer_stream_type, UrlSourceHandler};

use crate::{Error, MediaSource, MediaStream, Result};
use tracing::debug;

/// Trait for source handlers
pub trait MediaSourceHandler {
    /// Handler name for logs and listings
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether this handler recognizes the source's shape
    fn can_handle_source(&self, src: &MediaSource) -> bool;

    /// Convert a recognized source into a stream descriptor
    fn get_media_stream(&self, src: &MediaSource) -> Result<MediaStream>;
}

/// Priority-ordered source handlers
pub struct SourceHandlerRegistry {
    handlers: Vec<Box<dyn MediaSourceHandler>>,
}

impl SourceHandlerRegistry {
    /// Registry holding the built-in handlers
    pub fn with_builtins() -> Self {
        Self {
            handlers: vec![
                Box::new(MediaStreamSourceHandler),
                Box::new(UrlSourceHandler),
            ],
        }
    }

    /// Prepend a handler, giving it the highest priority
    pub fn register(&mut self, handler: Box<dyn MediaSourceHandler>) {
        debug!(handler = handler.name(), "Source handler registered");
        self.handlers.insert(0, handler);
    }

    /// Handlers in priority order
    pub fn handlers(&self) -> &[Box<dyn MediaSourceHandler>] {
        &self.handlers
    }

    /// First handler recognizing the source
    pub fn resolve(&self, src: &MediaSource) -> Result<&dyn MediaSourceHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.can_handle_source(src))
            .map(|handler| handler.as_ref())
            .ok_or_else(|| Error::NoCompatibleSourceHandler {
                src: src.to_string(),
            })
    }
}

impl Default for SourceHandlerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MediaStreamType;

    /// Claims every URL as DASH
    struct EverythingIsDash;

    impl MediaSourceHandler for EverythingIsDash {
        fn name(&self) -> &str {
            "everything-is-dash"
        }

        fn can_handle_source(&self, src: &MediaSource) -> bool {
            matches!(src, MediaSource::Url(_))
        }

        fn get_media_stream(&self, src: &MediaSource) -> Result<MediaStream> {
            Ok(MediaStream::new(MediaStreamType::Dash, src.to_string()))
        }
    }

    #[test]
    fn test_builtin_order() {
        let registry = SourceHandlerRegistry::with_builtins();
        let names: Vec<&str> = registry.handlers().iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["media-stream", "url"]);
    }

    #[test]
    fn test_registered_handler_wins() {
        let mut registry = SourceHandlerRegistry::with_builtins();
        registry.register(Box::new(EverythingIsDash));

        let src = MediaSource::from("video.mp4");
        let handler = registry.resolve(&src).unwrap();
        assert_eq!(handler.name(), "everything-is-dash");
        assert_eq!(
            handler.get_media_stream(&src).unwrap().stream_type,
            MediaStreamType::Dash
        );
    }

    #[test]
    fn test_unrecognized_source() {
        let registry = SourceHandlerRegistry::with_builtins();
        let err = registry.resolve(&MediaSource::from("notes.txt")).err().unwrap();
        assert_eq!(
            err,
            Error::NoCompatibleSourceHandler {
                src: "notes.txt".into()
            }
        );
    }
}
