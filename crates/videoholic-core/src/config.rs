//! Controller configuration

use crate::capabilities::Capabilities;
use crate::events::NativeEventTable;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default capacity of the event broadcast channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Environment capability flags, fixed for the controller's lifetime
    pub capabilities: Capabilities,
    /// Native events to subscribe to and their normalized names
    pub native_events: NativeEventTable,
    /// Buffered events per subscriber before the slowest one lags
    pub event_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::none(),
            native_events: NativeEventTable::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ControllerConfig {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Default::default()
        }
    }

    /// Load and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ControllerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.native_events.is_empty() {
            return Err(Error::InvalidConfig(
                "native event table must not be empty".into(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(Error::InvalidConfig(
                "event capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PlaybackEventKind;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.capabilities, Capabilities::none());
        assert_eq!(config.event_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let config = ControllerConfig::from_json(
            r#"{
                "capabilities": { "mse": true, "mp4": true },
                "native_events": { "pause": "pause", "ended": "ended" }
            }"#,
        )
        .unwrap();

        assert!(config.capabilities.mse);
        assert!(!config.capabilities.hls);
        assert_eq!(config.native_events.len(), 2);
        assert_eq!(config.native_events.get("ended"), Some(PlaybackEventKind::Ended));
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn test_rejects_empty_event_table() {
        let err = ControllerConfig::from_json(r#"{ "native_events": {} }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_rejects_zero_capacity() {
        assert!(ControllerConfig::from_json(r#"{ "event_capacity": 0 }"#).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = ControllerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
