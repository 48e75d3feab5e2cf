//! Headless rendering surface
//!
//! An in-memory surface that keeps the playback fields a media element would
//! expose and dispatches native events to its listeners. Used by the CLI and
//! for driving controllers in tests without a real renderer.

use crate::surface::{
    NativeEvent, NativeListener, PlaybackRequest, RenderingSurface, SurfaceError,
};
use crate::types::{MediaObject, SurfaceId};
use std::cell::{Cell, RefCell};
use tracing::debug;

/// How the next play/pause request should fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure {
    /// Fail synchronously
    Immediate(String),
    /// Return a deferred request that rejects
    Deferred(String),
}

/// In-memory rendering surface
pub struct HeadlessSurface {
    id: SurfaceId,
    src: RefCell<Option<String>>,
    src_object: RefCell<Option<MediaObject>>,
    current_time: Cell<f64>,
    duration: Cell<f64>,
    muted: Cell<bool>,
    playback_rate: Cell<f64>,
    paused: Cell<bool>,
    volume: Cell<f64>,
    listeners: RefCell<Vec<(String, NativeListener)>>,
    next_failure: RefCell<Option<InjectedFailure>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            id: SurfaceId::new(),
            src: RefCell::new(None),
            src_object: RefCell::new(None),
            current_time: Cell::new(0.0),
            duration: Cell::new(f64::NAN),
            muted: Cell::new(false),
            playback_rate: Cell::new(1.0),
            paused: Cell::new(true),
            volume: Cell::new(1.0),
            listeners: RefCell::new(Vec::new()),
            next_failure: RefCell::new(None),
        }
    }

    /// Current progressive source, if any
    pub fn src(&self) -> Option<String> {
        self.src.borrow().clone()
    }

    /// Current media stream object, if any
    pub fn src_object(&self) -> Option<MediaObject> {
        self.src_object.borrow().clone()
    }

    /// Event names with at least one listener, sorted
    pub fn subscribed_events(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .listeners
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Make the next play or pause request fail
    pub fn fail_next_request(&self, failure: InjectedFailure) {
        *self.next_failure.borrow_mut() = Some(failure);
    }

    /// Dispatch a native event to every listener registered for it.
    ///
    /// Returns the listener results in registration order.
    pub fn dispatch(&self, event_type: &str) -> Vec<crate::Result<()>> {
        let event = NativeEvent::new(event_type, self.id);

        // Listeners may touch the surface, so release the borrow first
        let targets: Vec<NativeListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(name, _)| name == event_type)
            .map(|(_, listener)| listener.clone())
            .collect();

        targets.iter().map(|listener| listener.call(&event)).collect()
    }

    pub fn set_current_time(&self, time: f64) {
        self.current_time.set(time);
        self.dispatch("timeupdate");
    }

    pub fn set_duration(&self, duration: f64) {
        self.duration.set(duration);
        self.dispatch("durationchange");
    }

    pub fn set_volume(&self, volume: f64) {
        self.volume.set(volume.clamp(0.0, 1.0));
        self.dispatch("volumechange");
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
        self.dispatch("volumechange");
    }

    pub fn set_playback_rate(&self, rate: f64) {
        self.playback_rate.set(rate);
        self.dispatch("ratechange");
    }

    /// Simulate reaching the end of the media
    pub fn end(&self) {
        if self.duration.get().is_finite() {
            self.current_time.set(self.duration.get());
        }
        self.paused.set(true);
        self.dispatch("ended");
    }

    fn take_failure(&self) -> Option<InjectedFailure> {
        self.next_failure.borrow_mut().take()
    }

    fn request(&self, paused: bool, event_type: &str) -> Result<PlaybackRequest, SurfaceError> {
        match self.take_failure() {
            Some(InjectedFailure::Immediate(msg)) => Err(SurfaceError(msg)),
            Some(InjectedFailure::Deferred(msg)) => Ok(PlaybackRequest::Deferred(Box::pin(
                async move { Err(SurfaceError(msg)) },
            ))),
            None => {
                self.paused.set(paused);
                self.dispatch(event_type);
                Ok(PlaybackRequest::Completed)
            }
        }
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderingSurface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn play(&self) -> Result<PlaybackRequest, SurfaceError> {
        self.request(false, "play")
    }

    fn pause(&self) -> Result<PlaybackRequest, SurfaceError> {
        self.request(true, "pause")
    }

    fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn muted(&self) -> bool {
        self.muted.get()
    }

    fn playback_rate(&self) -> f64 {
        self.playback_rate.get()
    }

    fn paused(&self) -> bool {
        self.paused.get()
    }

    fn volume(&self) -> f64 {
        self.volume.get()
    }

    fn set_src(&self, src: Option<&str>) {
        debug!(surface = %self.id, ?src, "Surface source set");
        *self.src.borrow_mut() = src.map(str::to_string);
        // A new source resets the media element
        self.current_time.set(0.0);
        self.duration.set(f64::NAN);
        self.paused.set(true);
    }

    fn set_src_object(&self, object: Option<MediaObject>) {
        *self.src_object.borrow_mut() = object;
    }

    fn add_event_listener(&self, event_type: &str, listener: &NativeListener) {
        let mut listeners = self.listeners.borrow_mut();
        let exists = listeners
            .iter()
            .any(|(name, l)| name == event_type && l.same_as(listener));
        if !exists {
            listeners.push((event_type.to_string(), listener.clone()));
        }
    }

    fn remove_event_listener(&self, event_type: &str, listener: &NativeListener) {
        self.listeners
            .borrow_mut()
            .retain(|(name, l)| !(name == event_type && l.same_as(listener)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_listener_registration_is_idempotent() {
        let surface = HeadlessSurface::new();
        let listener = NativeListener::new(|_| Ok(()));

        surface.add_event_listener("pause", &listener);
        surface.add_event_listener("pause", &listener);
        assert_eq!(surface.listener_count(), 1);

        surface.remove_event_listener("pause", &listener);
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn test_dispatch_reaches_matching_listeners_only() {
        let surface = HeadlessSurface::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let listener = NativeListener::new(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        surface.add_event_listener("timeupdate", &listener);
        surface.set_current_time(3.0);
        surface.set_volume(0.5);

        assert_eq!(hits.get(), 1);
        assert_eq!(surface.current_time(), 3.0);
    }

    #[test]
    fn test_play_and_pause_toggle_paused() {
        let surface = HeadlessSurface::new();
        assert!(surface.paused());

        assert!(matches!(surface.play(), Ok(PlaybackRequest::Completed)));
        assert!(!surface.paused());

        assert!(matches!(surface.pause(), Ok(PlaybackRequest::Completed)));
        assert!(surface.paused());
    }

    #[test]
    fn test_injected_immediate_failure() {
        let surface = HeadlessSurface::new();
        surface.fail_next_request(InjectedFailure::Immediate("NotAllowedError".into()));

        let err = surface.play().unwrap_err();
        assert_eq!(err.0, "NotAllowedError");
        assert!(surface.paused());

        // Only the next request fails
        assert!(surface.play().is_ok());
    }
}
