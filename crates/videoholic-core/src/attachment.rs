//! Attachment lifecycle
//!
//! Owns the single attached-handler slot. Two states, Detached and
//! Attached; there is no direct Attached -> Attached transition, detach
//! always runs before the next attach.

use crate::stream::MediaStreamHandler;
use crate::surface::RenderingSurface;
use crate::{MediaStream, Result};
use std::rc::Rc;
use tracing::{info, warn};

enum AttachmentState {
    Detached,
    Attached {
        handler: Rc<dyn MediaStreamHandler>,
        surface: Rc<dyn RenderingSurface>,
        stream: MediaStream,
    },
}

/// Sole writer of the attached-handler slot
pub struct AttachmentManager {
    state: AttachmentState,
}

impl AttachmentManager {
    pub fn new() -> Self {
        Self {
            state: AttachmentState::Detached,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, AttachmentState::Attached { .. })
    }

    /// The attached handler, if any
    pub fn handler(&self) -> Option<&Rc<dyn MediaStreamHandler>> {
        match &self.state {
            AttachmentState::Attached { handler, .. } => Some(handler),
            AttachmentState::Detached => None,
        }
    }

    /// The stream the attached handler is playing, if any
    pub fn stream(&self) -> Option<&MediaStream> {
        match &self.state {
            AttachmentState::Attached { stream, .. } => Some(stream),
            AttachmentState::Detached => None,
        }
    }

    /// Attach a handler to a surface.
    ///
    /// Anything still attached is detached first. If the handler's attach
    /// fails the manager stays Detached.
    pub fn attach(
        &mut self,
        handler: Rc<dyn MediaStreamHandler>,
        surface: Rc<dyn RenderingSurface>,
        stream: MediaStream,
    ) -> Result<()> {
        self.detach();

        if let Err(e) = handler.attach(surface.as_ref(), &stream) {
            warn!(handler = handler.name(), stream = %stream, error = %e, "Attach failed");
            return Err(e);
        }

        info!(handler = handler.name(), surface = %surface.id(), stream = %stream, "Stream handler attached");
        self.state = AttachmentState::Attached {
            handler,
            surface,
            stream,
        };
        Ok(())
    }

    /// Detach the current handler from the surface it was attached to.
    ///
    /// Returns whether a handler was detached.
    pub fn detach(&mut self) -> bool {
        match std::mem::replace(&mut self.state, AttachmentState::Detached) {
            AttachmentState::Attached {
                handler, surface, ..
            } => {
                handler.detach(surface.as_ref());
                info!(handler = handler.name(), surface = %surface.id(), "Stream handler detached");
                true
            }
            AttachmentState::Detached => false,
        }
    }
}

impl Default for AttachmentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AttachmentManager {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use crate::stream::NativeStreamHandler;
    use crate::{Error, MediaStreamType};

    struct Refusing;

    impl MediaStreamHandler for Refusing {
        fn is_supported(&self) -> bool {
            true
        }

        fn can_handle_stream(&self, _stream: &MediaStream) -> bool {
            true
        }

        fn attach(&self, _surface: &dyn RenderingSurface, _stream: &MediaStream) -> Result<()> {
            Err(Error::AttachFailed {
                handler: "refusing".into(),
                reason: "decoder busy".into(),
            })
        }

        fn detach(&self, _surface: &dyn RenderingSurface) {
            panic!("never attached, must not be detached");
        }
    }

    #[test]
    fn test_attach_then_detach() {
        let headless = Rc::new(HeadlessSurface::new());
        let mut manager = AttachmentManager::new();
        let handler = Rc::new(NativeStreamHandler::with_support(MediaStreamType::Mp4, true));

        manager
            .attach(handler, headless.clone(), MediaStream::new(MediaStreamType::Mp4, "a.mp4"))
            .unwrap();
        assert!(manager.is_attached());
        assert_eq!(headless.src().as_deref(), Some("a.mp4"));

        assert!(manager.detach());
        assert!(!manager.is_attached());
        assert_eq!(headless.src(), None);

        // Nothing left to detach
        assert!(!manager.detach());
    }

    #[test]
    fn test_failed_attach_stays_detached() {
        let headless = Rc::new(HeadlessSurface::new());
        let mut manager = AttachmentManager::new();

        let result = manager.attach(
            Rc::new(Refusing),
            headless,
            MediaStream::new(MediaStreamType::Mp4, "a.mp4"),
        );
        assert!(result.is_err());
        assert!(!manager.is_attached());
    }

    #[test]
    fn test_drop_detaches() {
        let headless = Rc::new(HeadlessSurface::new());
        {
            let mut manager = AttachmentManager::new();
            let handler = Rc::new(NativeStreamHandler::with_support(MediaStreamType::Webm, true));
            manager
                .attach(handler, headless.clone(), MediaStream::new(MediaStreamType::Webm, "a.webm"))
                .unwrap();
        }
        assert_eq!(headless.src(), None);
    }
}
