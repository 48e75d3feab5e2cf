//! Error types for Videoholic Core

use crate::types::MediaStreamType;
use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, Error>;

/// Controller error types
///
/// Errors are `Clone` so they can travel on the broadcast event stream as
/// well as through `Result` returns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Resolution errors
    #[error("couldn't find a compatible source handler for src - {src}")]
    NoCompatibleSourceHandler { src: String },

    #[error("couldn't find a compatible stream handler for {stream_type} stream - {url}")]
    NoCompatibleStreamHandler {
        stream_type: MediaStreamType,
        url: String,
    },

    #[error("stream handler {handler} failed to attach: {reason}")]
    AttachFailed { handler: String, reason: String },

    // Native event bridge errors
    #[error("received a native event without a handler: {event}")]
    UnmappedNativeEvent { event: String },

    // Playback errors
    #[error("video error during {operation}: {reason}")]
    PlaybackOperationFailure {
        operation: &'static str,
        reason: String,
    },

    // Configuration errors
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a play/pause failure, whatever its underlying cause
    pub fn playback(operation: &'static str, reason: impl std::fmt::Display) -> Self {
        Error::PlaybackOperationFailure {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error indicates an internal consistency defect
    /// rather than a problem with the caller's input
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnmappedNativeEvent { .. } | Error::Internal(_))
    }

    /// Returns the error code published on the event stream
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::NoCompatibleSourceHandler { .. } => "NO_SOURCE_HANDLER",
            Error::NoCompatibleStreamHandler { .. } => "NO_STREAM_HANDLER",
            Error::AttachFailed { .. } => "ATTACH_FAILED",
            Error::UnmappedNativeEvent { .. } => "UNMAPPED_NATIVE_EVENT",
            Error::PlaybackOperationFailure { .. } => "PLAYBACK_FAILURE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Internal(_) => "INTERNAL",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}
