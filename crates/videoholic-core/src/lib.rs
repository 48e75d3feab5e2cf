//! Videoholic Core - Playback Abstraction Layer
//!
//! Lets a caller hand an opaque media source (a URL, a pre-built stream) to a
//! rendering surface without knowing which delivery mechanism it needs:
//! - Source handlers turn a source into a typed stream descriptor
//! - Stream handlers bind a descriptor to the surface (native, HLS engine,
//!   DASH engine)
//! - The attachment lifecycle keeps at most one handler attached
//! - Native surface events are relayed as normalized player events
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Videoholic Core                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐           │
//! │  │    Source    │  │    Stream    │  │  Capability  │           │
//! │  │   Handlers   │  │   Handlers   │◄─┤    Probe     │           │
//! │  └──────┬───────┘  └──────┬───────┘  └──────────────┘           │
//! │         │                 │                                     │
//! │         └────────┬────────┘                                     │
//! │                  │                                              │
//! │           ┌──────┴──────┐      ┌──────────────┐                 │
//! │           │  Resolver   │─────►│  Attachment  │                 │
//! │           └──────┬──────┘      │   Manager    │                 │
//! │                  │             └──────┬───────┘                 │
//! │           ┌──────┴──────┐             │                         │
//! │           │   Player    │◄────────────┘                         │
//! │           │ Controller  │                                       │
//! │           └──────┬──────┘                                       │
//! │                  │                                              │
//! │           ┌──────┴──────┐      ┌──────────────┐                 │
//! │           │ Native Event│─────►│ PlayerEvent  │                 │
//! │           │   Bridge    │      │  broadcast   │                 │
//! │           └─────────────┘      └──────────────┘                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use videoholic_core::{
//!     Capabilities, ControllerConfig, HeadlessSurface, MediaStreamHandler, PlayerController,
//! };
//!
//! let mut controller = PlayerController::new(ControllerConfig::new(Capabilities::all())).unwrap();
//! controller.set_surface(Rc::new(HeadlessSurface::new())).unwrap();
//! controller.set_source("video.mp4".into()).unwrap();
//!
//! assert_eq!(controller.attached_handler().unwrap().name(), "native-mp4");
//! ```

pub mod attachment;
pub mod capabilities;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod headless;
pub mod resolver;
pub mod source;
pub mod stream;
pub mod surface;
pub mod types;

pub use attachment::AttachmentManager;
pub use capabilities::{Capabilities, CapabilityProbe};
pub use config::ControllerConfig;
pub use controller::PlayerController;
pub use engine::{EngineError, EngineFactory, EngineSession, StreamEngines};
pub use error::{Error, Result};
pub use events::{NativeEventBridge, NativeEventTable, PlaybackEventKind, PlayerEvent};
pub use headless::{HeadlessSurface, InjectedFailure};
pub use resolver::{resolve, Resolution};
pub use source::{
    MediaSourceHandler, MediaStreamSourceHandler, SourceHandlerRegistry, UrlSourceHandler,
};
pub use stream::{
    EngineStreamHandler, MediaStreamHandler, NativeStreamHandler, StreamHandlerRegistry,
};
pub use surface::{
    NativeEvent, NativeListener, PlaybackRequest, RenderingSurface, SurfaceError,
};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Videoholic Core initialized");
}
