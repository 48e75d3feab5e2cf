//! Engine-backed playback (HLS/DASH over Media Source Extensions)

use super::MediaStreamHandler;
use crate::capabilities::Capabilities;
use crate::engine::{EngineFactory, EngineSession};
use crate::surface::RenderingSurface;
use crate::{Error, MediaStream, MediaStreamType, Result};
use std::cell::RefCell;
use tracing::{info, warn};

/// Delegates one stream type to an external streaming engine.
///
/// A new engine session is created on every attach and destroyed on detach,
/// so nothing the engine allocated outlives the attachment.
pub struct EngineStreamHandler {
    stream_type: MediaStreamType,
    name: &'static str,
    factory: Option<Box<dyn EngineFactory>>,
    supported: bool,
    session: RefCell<Option<Box<dyn EngineSession>>>,
}

impl EngineStreamHandler {
    pub fn new(
        stream_type: MediaStreamType,
        name: &'static str,
        capabilities: &Capabilities,
        factory: Option<Box<dyn EngineFactory>>,
    ) -> Self {
        let supported = factory
            .as_ref()
            .map(|f| f.is_supported(capabilities))
            .unwrap_or(false);

        Self {
            stream_type,
            name,
            factory,
            supported,
            session: RefCell::new(None),
        }
    }

    /// HLS engine fallback for surfaces without native HLS
    #[cfg(feature = "hls")]
    pub fn hls(capabilities: &Capabilities, factory: Option<Box<dyn EngineFactory>>) -> Self {
        Self::new(MediaStreamType::Hls, "hls-engine", capabilities, factory)
    }

    /// DASH engine
    #[cfg(feature = "dash")]
    pub fn dash(capabilities: &Capabilities, factory: Option<Box<dyn EngineFactory>>) -> Self {
        Self::new(MediaStreamType::Dash, "dash-engine", capabilities, factory)
    }

    /// Whether an engine session is currently alive
    pub fn is_attached(&self) -> bool {
        self.session.borrow().is_some()
    }

    fn attach_failed(&self, reason: impl std::fmt::Display) -> Error {
        Error::AttachFailed {
            handler: self.name.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl MediaStreamHandler for EngineStreamHandler {
    fn name(&self) -> &str {
        self.name
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn can_handle_stream(&self, stream: &MediaStream) -> bool {
        stream.stream_type == self.stream_type
    }

    fn attach(&self, surface: &dyn RenderingSurface, stream: &MediaStream) -> Result<()> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| self.attach_failed("no engine available"))?;

        if self.is_attached() {
            return Err(Error::Internal(format!(
                "{} attached twice without detach",
                self.name
            )));
        }

        let url = stream
            .url
            .as_url()
            .ok_or_else(|| self.attach_failed("engine streams require a URL"))?;

        let mut session = factory.create();
        let loaded = session
            .load_source(url)
            .and_then(|_| session.attach_media(surface));

        if let Err(e) = loaded {
            warn!(handler = self.name, engine = factory.name(), error = %e, "Engine attach failed");
            session.destroy(surface);
            return Err(self.attach_failed(e));
        }

        info!(handler = self.name, engine = factory.name(), url, "Engine session attached");
        *self.session.borrow_mut() = Some(session);
        Ok(())
    }

    fn detach(&self, surface: &dyn RenderingSurface) {
        if let Some(mut session) = self.session.borrow_mut().take() {
            session.destroy(surface);
            info!(handler = self.name, "Engine session destroyed");
        }
    }
}
