//! Rendering surface collaborator interface
//!
//! The surface is the playback sink (a video element, a native window). The
//! core only needs play/pause, the current playback fields, source slots for
//! native handlers, and a native event subscription mechanism.

use crate::types::{MediaObject, PlaybackState, PlaybackStatus, SurfaceId};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use thiserror::Error;

/// Failure reported by the surface itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SurfaceError(pub String);

impl SurfaceError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Result of a play/pause request that completes later
pub type DeferredResult =
    Pin<Box<dyn Future<Output = std::result::Result<(), SurfaceError>> + Send + 'static>>;

/// Outcome of issuing a play/pause request to a surface
pub enum PlaybackRequest {
    /// The request took effect synchronously
    Completed,
    /// The request settles asynchronously.
    ///
    /// The future is driven with `tokio::spawn` on the caller's runtime, so
    /// it must be `Send`: it cannot capture the surface's own `Rc` state.
    /// A surface that settles on its own thread reports the outcome through
    /// a channel (e.g. a `tokio::sync::oneshot` receiver) moved into the
    /// future.
    Deferred(DeferredResult),
}

impl fmt::Debug for PlaybackRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackRequest::Completed => write!(f, "Completed"),
            PlaybackRequest::Deferred(_) => write!(f, "Deferred(..)"),
        }
    }
}

/// A native event raised by a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeEvent {
    /// Native event name (`timeupdate`, `pause`, ...)
    pub event_type: String,
    /// Surface that raised the event
    pub target: SurfaceId,
}

impl NativeEvent {
    pub fn new(event_type: impl Into<String>, target: SurfaceId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
        }
    }
}

/// Callback registered with a surface for native events.
///
/// Identity is the allocation: removing a listener requires the same handle
/// that was added.
#[derive(Clone)]
pub struct NativeListener(Rc<dyn Fn(&NativeEvent) -> crate::Result<()>>);

impl NativeListener {
    pub fn new(f: impl Fn(&NativeEvent) -> crate::Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &NativeEvent) -> crate::Result<()> {
        (self.0)(event)
    }

    pub fn same_as(&self, other: &NativeListener) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NativeListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeListener({:p})", Rc::as_ptr(&self.0))
    }
}

/// The playback sink
pub trait RenderingSurface {
    /// Stable identity of this surface
    fn id(&self) -> SurfaceId;

    fn play(&self) -> std::result::Result<PlaybackRequest, SurfaceError>;

    fn pause(&self) -> std::result::Result<PlaybackRequest, SurfaceError>;

    fn current_time(&self) -> f64;

    /// Duration in seconds; NaN while unknown, infinite for live streams
    fn duration(&self) -> f64;

    fn muted(&self) -> bool;

    fn playback_rate(&self) -> f64;

    fn paused(&self) -> bool;

    fn volume(&self) -> f64;

    /// Set or clear the progressive source URL
    fn set_src(&self, src: Option<&str>);

    /// Set or clear a pre-built media stream object
    fn set_src_object(&self, object: Option<MediaObject>);

    fn add_event_listener(&self, event_type: &str, listener: &NativeListener);

    fn remove_event_listener(&self, event_type: &str, listener: &NativeListener);
}

/// Derive a playback snapshot from a surface, or the default without one
pub fn playback_state(surface: Option<&dyn RenderingSurface>) -> PlaybackState {
    let Some(surface) = surface else {
        return PlaybackState::default();
    };

    let duration = surface.duration();

    PlaybackState {
        current_time: surface.current_time(),
        duration: if duration.is_nan() { 0.0 } else { duration },
        muted: surface.muted(),
        playback_rate: surface.playback_rate(),
        status: if surface.paused() {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Playing
        },
        volume: surface.volume(),
    }
}
