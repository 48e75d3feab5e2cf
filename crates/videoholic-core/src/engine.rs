//! Streaming engine collaborator interface
//!
//! HLS and DASH playback on surfaces without native support is delegated to
//! an external engine (an MSE-based HLS or DASH player). The core never
//! buffers, decodes or adapts bitrate itself; it only creates an engine
//! session per attachment and destroys it on detach.

use crate::capabilities::Capabilities;
use crate::surface::RenderingSurface;
use thiserror::Error;

/// Failure reported by an engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Creates engine sessions
pub trait EngineFactory {
    /// Engine name for logs
    fn name(&self) -> &str;

    /// Whether the engine can run in the given environment.
    ///
    /// MSE-based engines need Media Source Extensions.
    fn is_supported(&self, capabilities: &Capabilities) -> bool {
        capabilities.mse
    }

    /// Create a fresh session for one attachment
    fn create(&self) -> Box<dyn EngineSession>;
}

/// One engine instance, alive for exactly one attach/detach pair.
///
/// The session owns everything the engine allocates while playing: media
/// buffers, surface listeners, bitrate adaptation timers.
pub trait EngineSession {
    fn load_source(&mut self, url: &str) -> Result<(), EngineError>;

    fn attach_media(&mut self, surface: &dyn RenderingSurface) -> Result<(), EngineError>;

    /// Release every resource held by the session, including its hold on
    /// the surface
    fn destroy(&mut self, surface: &dyn RenderingSurface);
}

/// Engine factories available to the built-in stream handlers
#[derive(Default)]
pub struct StreamEngines {
    pub hls: Option<Box<dyn EngineFactory>>,
    pub dash: Option<Box<dyn EngineFactory>>,
}

impl StreamEngines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hls(mut self, factory: impl EngineFactory + 'static) -> Self {
        self.hls = Some(Box::new(factory));
        self
    }

    pub fn with_dash(mut self, factory: impl EngineFactory + 'static) -> Self {
        self.dash = Some(Box::new(factory));
        self
    }
}

impl std::fmt::Debug for StreamEngines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamEngines")
            .field("hls", &self.hls.as_ref().map(|e| e.name().to_string()))
            .field("dash", &self.dash.as_ref().map(|e| e.name().to_string()))
            .finish()
    }
}
