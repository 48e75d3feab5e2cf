//! Player controller - composition root
//!
//! Coordinates:
//! - Source and surface assignment
//! - Resolution against the source and stream handler registries
//! - The attach/detach lifecycle
//! - Native event relay and the error channel

use crate::{
    attachment::AttachmentManager,
    config::ControllerConfig,
    engine::StreamEngines,
    events::{publish_error, NativeEventBridge, PlayerEvent},
    resolver::{resolve, Resolution},
    source::{MediaSourceHandler, SourceHandlerRegistry},
    stream::{MediaStreamHandler, StreamHandlerRegistry},
    surface::{playback_state, DeferredResult, PlaybackRequest, RenderingSurface},
    types::*,
    Error, Result,
};
use std::rc::Rc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Routes media sources to stream handlers on a single rendering surface.
///
/// Single-threaded: every operation runs to completion on the caller's
/// thread. Deferred play/pause results are driven on the ambient tokio
/// runtime and their failures published on the event stream.
pub struct PlayerController {
    /// Unique controller ID
    id: ControllerId,
    /// Controller configuration
    config: ControllerConfig,
    /// Current rendering surface
    surface: Option<Rc<dyn RenderingSurface>>,
    /// Current source
    source: Option<MediaSource>,
    source_handlers: SourceHandlerRegistry,
    stream_handlers: StreamHandlerRegistry,
    /// Attached-handler slot
    attachment: AttachmentManager,
    /// Native event relay
    bridge: NativeEventBridge,
    /// Event broadcaster
    events: broadcast::Sender<PlayerEvent>,
}

impl PlayerController {
    /// Create a controller without streaming engines
    pub fn new(config: ControllerConfig) -> Result<Self> {
        Self::with_engines(config, StreamEngines::new())
    }

    /// Create a controller whose HLS/DASH handlers delegate to the given engines
    pub fn with_engines(config: ControllerConfig, engines: StreamEngines) -> Result<Self> {
        config.validate()?;

        let (events, _) = broadcast::channel(config.event_capacity);
        let bridge = NativeEventBridge::new(config.native_events.clone(), events.clone());
        let stream_handlers = StreamHandlerRegistry::with_builtins(&config.capabilities, engines);

        let id = ControllerId::new();
        info!(
            controller_id = %id,
            stream_handlers = stream_handlers.handlers().len(),
            "Controller created"
        );

        Ok(Self {
            id,
            config,
            surface: None,
            source: None,
            source_handlers: SourceHandlerRegistry::with_builtins(),
            stream_handlers,
            attachment: AttachmentManager::new(),
            bridge,
            events,
        })
    }

    /// Get controller ID
    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Subscribe to playback events and errors
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    // Source

    /// Assign a source and bind it to the current surface.
    ///
    /// Re-assigning the current source is a no-op, and an empty URL clears
    /// the source. If resolution fails the previous source and attachment
    /// are kept.
    #[instrument(skip(self), fields(controller_id = %self.id))]
    pub fn set_source(&mut self, src: MediaSource) -> Result<()> {
        if is_empty_url(&src) {
            debug!("Empty source, clearing");
            self.clear_source();
            return Ok(());
        }

        if self.source.as_ref() == Some(&src) {
            debug!("Source unchanged");
            return Ok(());
        }

        let Some(surface) = self.surface.clone() else {
            // Nothing to attach to yet
            self.attachment.detach();
            self.source = Some(src);
            return Ok(());
        };

        let resolution = resolve(&src, &self.source_handlers, &self.stream_handlers)
            .inspect_err(|e| warn!(error = %e, "Source resolution failed"))?;

        self.attachment.detach();
        self.source = Some(src);
        self.attachment
            .attach(resolution.stream_handler, surface, resolution.stream)
    }

    /// Remove the current source, detaching its handler
    #[instrument(skip(self), fields(controller_id = %self.id))]
    pub fn clear_source(&mut self) {
        self.attachment.detach();
        self.source = None;
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    // Surface

    /// Assign the rendering surface.
    ///
    /// The same surface is a no-op. Otherwise native events move to the new
    /// surface, the attached handler is detached from the old one, and the
    /// current source is resolved again against the new surface.
    #[instrument(skip(self, surface), fields(controller_id = %self.id, surface = %surface.id()))]
    pub fn set_surface(&mut self, surface: Rc<dyn RenderingSurface>) -> Result<()> {
        if self.surface.as_ref().map(|s| s.id()) == Some(surface.id()) {
            return Ok(());
        }

        self.release_surface();

        self.bridge.subscribe(&surface);
        self.surface = Some(surface);
        info!("Surface assigned");

        self.connect_source()
    }

    /// Remove the rendering surface
    #[instrument(skip(self), fields(controller_id = %self.id))]
    pub fn clear_surface(&mut self) {
        self.release_surface();
    }

    pub fn surface(&self) -> Option<&Rc<dyn RenderingSurface>> {
        self.surface.as_ref()
    }

    // Playback

    /// Snapshot of the surface's playback fields, or the default without a surface
    pub fn playback_state(&self) -> PlaybackState {
        playback_state(self.surface.as_deref())
    }

    /// Request playback. Without a surface this does nothing.
    #[instrument(skip(self), fields(controller_id = %self.id))]
    pub fn play(&self) -> Result<()> {
        let Some(surface) = &self.surface else {
            return Ok(());
        };
        let request = surface.play();
        self.settle("play", request)
    }

    /// Request a pause. Without a surface this does nothing.
    #[instrument(skip(self), fields(controller_id = %self.id))]
    pub fn pause(&self) -> Result<()> {
        let Some(surface) = &self.surface else {
            return Ok(());
        };
        let request = surface.pause();
        self.settle("pause", request)
    }

    /// Resolve a source against the current registries without attaching it
    pub fn resolve(&self, src: &MediaSource) -> Result<Resolution> {
        resolve(src, &self.source_handlers, &self.stream_handlers)
    }

    // Handlers

    pub fn source_handlers(&self) -> &[Box<dyn MediaSourceHandler>] {
        self.source_handlers.handlers()
    }

    /// Register a source handler ahead of every existing one
    pub fn register_source_handler(&mut self, handler: Box<dyn MediaSourceHandler>) {
        self.source_handlers.register(handler);
    }

    pub fn stream_handlers(&self) -> &[Rc<dyn MediaStreamHandler>] {
        self.stream_handlers.handlers()
    }

    /// Register a stream handler ahead of every existing one.
    ///
    /// Returns false if the handler reports itself unsupported.
    pub fn register_stream_handler(&mut self, handler: Rc<dyn MediaStreamHandler>) -> bool {
        self.stream_handlers.register(handler)
    }

    /// The currently attached stream handler
    pub fn attached_handler(&self) -> Option<&Rc<dyn MediaStreamHandler>> {
        self.attachment.handler()
    }

    /// The stream currently attached
    pub fn attached_stream(&self) -> Option<&MediaStream> {
        self.attachment.stream()
    }

    /// Detach the current handler and release the surface
    #[instrument(skip(self), fields(controller_id = %self.id))]
    pub fn teardown(&mut self) {
        self.release_surface();
        info!("Controller torn down");
    }

    // Private helpers

    fn connect_source(&mut self) -> Result<()> {
        let (Some(src), Some(surface)) = (&self.source, &self.surface) else {
            return Ok(());
        };

        let resolution = resolve(src, &self.source_handlers, &self.stream_handlers)
            .inspect_err(|e| warn!(error = %e, "Source resolution failed"))?;

        self.attachment
            .attach(resolution.stream_handler, surface.clone(), resolution.stream)
    }

    fn release_surface(&mut self) {
        if let Some(old) = self.surface.take() {
            self.bridge.unsubscribe(old.as_ref());
        }
        self.attachment.detach();
    }

    fn settle(
        &self,
        operation: &'static str,
        request: std::result::Result<PlaybackRequest, crate::surface::SurfaceError>,
    ) -> Result<()> {
        match request {
            Ok(PlaybackRequest::Completed) => Ok(()),
            Ok(PlaybackRequest::Deferred(pending)) => {
                self.drive_deferred(operation, pending);
                Ok(())
            }
            Err(e) => {
                let err = Error::playback(operation, e);
                warn!(error = %err, "Playback request failed");
                publish_error(&self.events, &err);
                Err(err)
            }
        }
    }

    fn drive_deferred(&self, operation: &'static str, pending: DeferredResult) {
        let events = self.events.clone();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = pending.await {
                        let err = Error::playback(operation, e);
                        warn!(error = %err, "Deferred playback request failed");
                        publish_error(&events, &err);
                    }
                });
            }
            Err(_) => {
                let err = Error::playback(operation, "no async runtime to settle the request");
                warn!(error = %err, "Deferred playback request dropped");
                publish_error(&events, &err);
            }
        }
    }
}

fn is_empty_url(src: &MediaSource) -> bool {
    match src {
        MediaSource::Url(url) | MediaSource::TypedUrl { url, .. } => url.trim().is_empty(),
        _ => false,
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        self.release_surface();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Capabilities;
    use crate::headless::HeadlessSurface;

    fn controller() -> PlayerController {
        PlayerController::new(ControllerConfig::new(Capabilities::all())).unwrap()
    }

    #[test]
    fn test_controller_creation() {
        let controller = controller();
        assert!(controller.source().is_none());
        assert!(controller.surface().is_none());
        assert!(controller.attached_handler().is_none());
        assert_eq!(controller.source_handlers().len(), 2);
    }

    #[test]
    fn test_source_without_surface_is_stored() {
        let mut controller = controller();
        controller.set_source("video.mp4".into()).unwrap();

        assert_eq!(controller.source(), Some(&MediaSource::from("video.mp4")));
        assert!(controller.attached_handler().is_none());
    }

    #[test]
    fn test_surface_connects_pending_source() {
        let mut controller = controller();
        let surface = Rc::new(HeadlessSurface::new());

        controller.set_source("video.webm".into()).unwrap();
        controller.set_surface(surface.clone()).unwrap();

        assert_eq!(controller.attached_handler().unwrap().name(), "native-webm");
        assert_eq!(surface.src().as_deref(), Some("video.webm"));
    }

    #[test]
    fn test_clear_source_detaches() {
        let mut controller = controller();
        let surface = Rc::new(HeadlessSurface::new());
        controller.set_surface(surface.clone()).unwrap();
        controller.set_source("video.mp4".into()).unwrap();

        controller.clear_source();
        assert!(controller.attached_handler().is_none());
        assert_eq!(surface.src(), None);
    }

    #[test]
    fn test_play_without_surface_is_noop() {
        let controller = controller();
        assert!(controller.play().is_ok());
        assert!(controller.pause().is_ok());
    }

    #[test]
    fn test_deferred_without_runtime_is_reported() {
        let mut controller = controller();
        let mut rx = controller.subscribe();
        let surface = Rc::new(HeadlessSurface::new());
        controller.set_surface(surface.clone()).unwrap();

        surface.fail_next_request(crate::headless::InjectedFailure::Deferred("late".into()));
        assert!(controller.play().is_ok());

        match rx.try_recv().unwrap() {
            PlayerEvent::Error { code, .. } => assert_eq!(code, "PLAYBACK_FAILURE"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_deferred_failure_on_runtime() {
        tokio_test::block_on(async {
            let mut controller = controller();
            let mut rx = controller.subscribe();
            let surface = Rc::new(HeadlessSurface::new());
            controller.set_surface(surface.clone()).unwrap();

            surface.fail_next_request(crate::headless::InjectedFailure::Deferred("aborted".into()));
            assert!(controller.pause().is_ok());

            match rx.recv().await.unwrap() {
                PlayerEvent::Error { message, fatal, .. } => {
                    assert!(message.contains("aborted"));
                    assert!(!fatal);
                }
                other => panic!("unexpected event: {:?}", other),
            }
        });
    }

    #[test]
    fn test_drop_releases_surface() {
        let surface = Rc::new(HeadlessSurface::new());
        {
            let mut controller = controller();
            controller.set_surface(surface.clone()).unwrap();
            controller.set_source("video.mp4".into()).unwrap();
            assert!(surface.listener_count() > 0);
        }
        assert_eq!(surface.listener_count(), 0);
        assert_eq!(surface.src(), None);
    }
}
