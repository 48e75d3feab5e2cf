//! Native event bridge
//!
//! Subscribes a single listener to every native event named in the mapping
//! table and republishes each one as a [`PlayerEvent`] carrying a fresh
//! playback snapshot. The same listener handle is used for subscribing and
//! unsubscribing, so surface replacement never leaves a stale subscription.

use crate::surface::{playback_state, NativeEvent, NativeListener, RenderingSurface};
use crate::types::{PlaybackState, SurfaceId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, error, trace};

/// Normalized playback event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackEventKind {
    Play,
    Playing,
    Pause,
    TimeUpdate,
    DurationChange,
    VolumeChange,
    RateChange,
    Seeking,
    Seeked,
    Waiting,
    LoadedMetadata,
    CanPlay,
    Ended,
    MediaError,
}

/// Events published to controller subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// A relayed native playback event
    Playback {
        kind: PlaybackEventKind,
        state: PlaybackState,
    },

    /// An error reported through the error channel
    Error {
        code: &'static str,
        message: String,
        fatal: bool,
    },
}

impl From<&Error> for PlayerEvent {
    fn from(err: &Error) -> Self {
        PlayerEvent::Error {
            code: err.error_code(),
            message: err.to_string(),
            fatal: err.is_fatal(),
        }
    }
}

/// Native event name to normalized event kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeEventTable {
    entries: BTreeMap<String, PlaybackEventKind>,
}

impl NativeEventTable {
    pub fn new(entries: impl IntoIterator<Item = (String, PlaybackEventKind)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, native: &str) -> Option<PlaybackEventKind> {
        self.entries.get(native).copied()
    }

    /// Native event names, in subscription order
    pub fn native_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NativeEventTable {
    fn default() -> Self {
        use PlaybackEventKind::*;

        let defaults = [
            ("play", Play),
            ("playing", Playing),
            ("pause", Pause),
            ("timeupdate", TimeUpdate),
            ("durationchange", DurationChange),
            ("volumechange", VolumeChange),
            ("ratechange", RateChange),
            ("seeking", Seeking),
            ("seeked", Seeked),
            ("waiting", Waiting),
            ("loadedmetadata", LoadedMetadata),
            ("canplay", CanPlay),
            ("ended", Ended),
            ("error", MediaError),
        ];

        Self::new(defaults.into_iter().map(|(name, kind)| (name.to_string(), kind)))
    }
}

/// Publish an error on the event stream
pub(crate) fn publish_error(events: &broadcast::Sender<PlayerEvent>, err: &Error) {
    // No subscribers is not a failure
    let _ = events.send(PlayerEvent::from(err));
}

struct BridgeState {
    table: NativeEventTable,
    events: broadcast::Sender<PlayerEvent>,
    surface: RefCell<Option<(SurfaceId, Weak<dyn RenderingSurface>)>>,
}

impl BridgeState {
    fn relay(&self, event: &NativeEvent) -> Result<()> {
        let surface = match &*self.surface.borrow() {
            Some((id, surface)) if *id == event.target => surface.upgrade(),
            _ => {
                trace!(event = %event.event_type, "Ignoring event from a foreign surface");
                return Ok(());
            }
        };

        let Some(kind) = self.table.get(&event.event_type) else {
            let err = Error::UnmappedNativeEvent {
                event: event.event_type.clone(),
            };
            error!(event = %event.event_type, "Native event has no mapping; table out of sync with subscriptions");
            publish_error(&self.events, &err);
            return Err(err);
        };

        let state = playback_state(surface.as_deref());
        let _ = self.events.send(PlayerEvent::Playback { kind, state });
        Ok(())
    }
}

/// Relays a surface's native events as [`PlayerEvent`]s
pub struct NativeEventBridge {
    state: Rc<BridgeState>,
    listener: NativeListener,
}

impl NativeEventBridge {
    pub fn new(table: NativeEventTable, events: broadcast::Sender<PlayerEvent>) -> Self {
        let state = Rc::new(BridgeState {
            table,
            events,
            surface: RefCell::new(None),
        });

        let relay_state = Rc::downgrade(&state);
        let listener = NativeListener::new(move |event| match relay_state.upgrade() {
            Some(state) => state.relay(event),
            None => Ok(()),
        });

        Self { state, listener }
    }

    /// Subscribe every mapped native event on the surface and make it the
    /// bridge's current target
    pub fn subscribe(&self, surface: &Rc<dyn RenderingSurface>) {
        for name in self.state.table.native_names() {
            surface.add_event_listener(name, &self.listener);
        }
        *self.state.surface.borrow_mut() = Some((surface.id(), Rc::downgrade(surface)));
        debug!(surface = %surface.id(), events = self.state.table.len(), "Native events subscribed");
    }

    /// Remove every subscription from the surface
    pub fn unsubscribe(&self, surface: &dyn RenderingSurface) {
        for name in self.state.table.native_names() {
            surface.remove_event_listener(name, &self.listener);
        }

        let mut current = self.state.surface.borrow_mut();
        if matches!(&*current, Some((id, _)) if *id == surface.id()) {
            *current = None;
        }
        debug!(surface = %surface.id(), "Native events unsubscribed");
    }

    /// Deliver a native event as if the subscribed surface raised it
    pub fn handle(&self, event: &NativeEvent) -> Result<()> {
        self.listener.call(event)
    }
}
