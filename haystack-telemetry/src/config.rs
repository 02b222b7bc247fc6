//! Telemetry configuration

use crate::{Payload, Result, Telemetry, TelemetryError};
use serde::{Deserialize, Serialize};

/// Environment variable that switches telemetry off
pub const TELEMETRY_ENV_VAR: &str = "HAYSTACK_TELEMETRY_ENABLED";

/// Whether events should leave the process at all.
///
/// Can be embedded in a larger serde config:
///
/// ```rust
/// use haystack_telemetry::TelemetryConfig;
///
/// let config: TelemetryConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
/// assert!(!config.enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl TelemetryConfig {
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Read [`TELEMETRY_ENV_VAR`]; unset or unrecognised values keep the default
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(TELEMETRY_ENV_VAR).ok().as_deref())
    }

    fn from_env_value(raw: Option<&str>) -> Self {
        let enabled = raw.and_then(parse_flag).unwrap_or(true);
        Self { enabled }
    }

    /// Put this config in front of a sink
    pub fn gate<T: Telemetry>(self, inner: T) -> Gated<T> {
        Gated::new(self, inner)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A sink that only forwards while its config is enabled
#[derive(Debug, Clone)]
pub struct Gated<T> {
    config: TelemetryConfig,
    inner: T,
}

impl<T: Telemetry> Gated<T> {
    pub fn new(config: TelemetryConfig, inner: T) -> Self {
        Self { config, inner }
    }

    pub fn config(&self) -> TelemetryConfig {
        self.config
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Telemetry> Telemetry for Gated<T> {
    fn send_event(&self, event: &str, payload: &Payload) -> Result<()> {
        if !self.config.enabled {
            return Err(TelemetryError::Disabled);
        }
        self.inner.send_event(event, payload)
    }
}
