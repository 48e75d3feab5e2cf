//! Stream handlers
//!
//! A stream handler binds a typed [`MediaStream`] to a rendering surface and
//! unbinds it again. Platform support is decided once, when the handler is
//! constructed or registered; unsupported handlers never enter the registry.

mod engine;
mod native;

pub use engine::EngineStreamHandler;
pub use native::NativeStreamHandler;

use crate::capabilities::Capabilities;
use crate::engine::StreamEngines;
use crate::surface::RenderingSurface;
use crate::{Error, MediaStream, MediaStreamType, Result};
use std::rc::Rc;
use tracing::{debug, warn};

/// Trait for stream handlers
pub trait MediaStreamHandler {
    /// Handler name for logs and listings
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether the platform can run this handler
    fn is_supported(&self) -> bool;

    /// Whether this handler can play the descriptor
    fn can_handle_stream(&self, stream: &MediaStream) -> bool;

    /// Bind the stream to the surface
    fn attach(&self, surface: &dyn RenderingSurface, stream: &MediaStream) -> Result<()>;

    /// Unbind from the surface and release everything acquired by `attach`
    fn detach(&self, surface: &dyn RenderingSurface);
}

/// Priority-ordered stream handlers
pub struct StreamHandlerRegistry {
    handlers: Vec<Rc<dyn MediaStreamHandler>>,
}

impl StreamHandlerRegistry {
    /// Registry holding the supported built-in handlers.
    ///
    /// Default priority: native HLS, HLS engine, DASH engine, native MP4,
    /// native WEBM.
    pub fn with_builtins(capabilities: &Capabilities, engines: StreamEngines) -> Self {
        let StreamEngines { hls, dash } = engines;

        let mut builtins: Vec<Rc<dyn MediaStreamHandler>> = vec![Rc::new(
            NativeStreamHandler::new(MediaStreamType::Hls, capabilities),
        )];

        #[cfg(feature = "hls")]
        builtins.push(Rc::new(EngineStreamHandler::hls(capabilities, hls)));
        #[cfg(not(feature = "hls"))]
        drop(hls);

        #[cfg(feature = "dash")]
        builtins.push(Rc::new(EngineStreamHandler::dash(capabilities, dash)));
        #[cfg(not(feature = "dash"))]
        drop(dash);

        builtins.push(Rc::new(NativeStreamHandler::new(
            MediaStreamType::Mp4,
            capabilities,
        )));
        builtins.push(Rc::new(NativeStreamHandler::new(
            MediaStreamType::Webm,
            capabilities,
        )));

        let handlers: Vec<Rc<dyn MediaStreamHandler>> = builtins
            .into_iter()
            .filter(|handler| {
                let supported = handler.is_supported();
                debug!(handler = handler.name(), supported, "Built-in stream handler");
                supported
            })
            .collect();

        Self { handlers }
    }

    /// An empty registry, for callers supplying every handler themselves
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Prepend a handler, giving it the highest priority.
    ///
    /// Support is checked once, here; an unsupported handler is not added
    /// and `false` is returned.
    pub fn register(&mut self, handler: Rc<dyn MediaStreamHandler>) -> bool {
        if !handler.is_supported() {
            warn!(handler = handler.name(), "Ignoring unsupported stream handler");
            return false;
        }

        debug!(handler = handler.name(), "Stream handler registered");
        self.handlers.insert(0, handler);
        true
    }

    /// Handlers in priority order
    pub fn handlers(&self) -> &[Rc<dyn MediaStreamHandler>] {
        &self.handlers
    }

    /// First handler able to play the descriptor
    pub fn resolve(&self, stream: &MediaStream) -> Result<Rc<dyn MediaStreamHandler>> {
        self.handlers
            .iter()
            .find(|handler| handler.can_handle_stream(stream))
            .cloned()
            .ok_or_else(|| Error::NoCompatibleStreamHandler {
                stream_type: stream.stream_type,
                url: stream.url.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, EngineFactory, EngineSession};

    struct NullEngine;

    impl EngineFactory for NullEngine {
        fn name(&self) -> &str {
            "null"
        }

        fn create(&self) -> Box<dyn EngineSession> {
            Box::new(NullSession)
        }
    }

    struct NullSession;

    impl EngineSession for NullSession {
        fn load_source(&mut self, _url: &str) -> std::result::Result<(), EngineError> {
            Ok(())
        }

        fn attach_media(
            &mut self,
            _surface: &dyn RenderingSurface,
        ) -> std::result::Result<(), EngineError> {
            Ok(())
        }

        fn destroy(&mut self, _surface: &dyn RenderingSurface) {}
    }

    fn names(registry: &StreamHandlerRegistry) -> Vec<String> {
        registry
            .handlers()
            .iter()
            .map(|h| h.name().to_string())
            .collect()
    }

    #[test]
    fn test_builtin_priority_order() {
        let engines = StreamEngines::new().with_hls(NullEngine).with_dash(NullEngine);
        let registry = StreamHandlerRegistry::with_builtins(&Capabilities::all(), engines);

        assert_eq!(
            names(&registry),
            vec!["native-hls", "hls-engine", "dash-engine", "native-mp4", "native-webm"]
        );
    }

    #[test]
    fn test_unsupported_builtins_are_excluded() {
        let caps = Capabilities {
            mse: false,
            mp4: true,
            ..Capabilities::none()
        };
        let engines = StreamEngines::new().with_hls(NullEngine).with_dash(NullEngine);
        let registry = StreamHandlerRegistry::with_builtins(&caps, engines);

        assert_eq!(names(&registry), vec!["native-mp4"]);
    }

    #[test]
    fn test_engine_handlers_need_a_factory() {
        let registry = StreamHandlerRegistry::with_builtins(&Capabilities::all(), StreamEngines::new());
        assert_eq!(names(&registry), vec!["native-hls", "native-mp4", "native-webm"]);
    }

    #[test]
    fn test_register_prepends() {
        let mut registry = StreamHandlerRegistry::with_builtins(&Capabilities::all(), StreamEngines::new());
        let custom = NativeStreamHandler::with_support(MediaStreamType::Mp4, true);
        assert!(registry.register(Rc::new(custom)));

        let stream = MediaStream::new(MediaStreamType::Mp4, "video.mp4");
        let handler = registry.resolve(&stream).unwrap();
        assert!(Rc::ptr_eq(&handler, &registry.handlers()[0]));
    }

    #[test]
    fn test_register_rejects_unsupported() {
        let mut registry = StreamHandlerRegistry::empty();
        let unsupported = NativeStreamHandler::with_support(MediaStreamType::Webm, false);

        assert!(!registry.register(Rc::new(unsupported)));
        assert!(registry.handlers().is_empty());
    }

    #[test]
    fn test_no_compatible_stream_handler() {
        let registry = StreamHandlerRegistry::with_builtins(&Capabilities::none(), StreamEngines::new());
        let stream = MediaStream::new(MediaStreamType::Dash, "manifest.mpd");

        let err = registry.resolve(&stream).err().unwrap();
        assert_eq!(
            err,
            Error::NoCompatibleStreamHandler {
                stream_type: MediaStreamType::Dash,
                url: "manifest.mpd".into(),
            }
        );
    }
}
