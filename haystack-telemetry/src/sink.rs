//! The sink trait and the simple in-process sinks

use crate::{Payload, Result};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination for custom events.
///
/// Implementations must not block for long: they are called synchronously
/// from error constructors. Anything slow belongs behind a
/// [`ChannelTelemetry`](crate::ChannelTelemetry).
pub trait Telemetry: Send + Sync {
    /// Send one named event
    fn send_event(&self, event: &str, payload: &Payload) -> Result<()>;
}

impl<T: Telemetry + ?Sized> Telemetry for &T {
    fn send_event(&self, event: &str, payload: &Payload) -> Result<()> {
        (**self).send_event(event, payload)
    }
}

impl<T: Telemetry + ?Sized> Telemetry for Arc<T> {
    fn send_event(&self, event: &str, payload: &Payload) -> Result<()> {
        (**self).send_event(event, payload)
    }
}

impl<T: Telemetry + ?Sized> Telemetry for Box<T> {
    fn send_event(&self, event: &str, payload: &Payload) -> Result<()> {
        (**self).send_event(event, payload)
    }
}

/// One recorded event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub name: String,
    pub payload: Payload,
}

// =============================================================================
// NoopTelemetry
// =============================================================================

/// Accepts and drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn send_event(&self, _event: &str, _payload: &Payload) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// TracingTelemetry
// =============================================================================

/// Logs every event at `info` on the `haystack::telemetry` target.
///
/// Handy when no collector is configured but events should still be visible
/// with `RUST_LOG=haystack::telemetry=info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn send_event(&self, event: &str, payload: &Payload) -> Result<()> {
        tracing::info!(target: "haystack::telemetry", event, payload = %payload, "custom event");
        Ok(())
    }
}

// =============================================================================
// RecordingTelemetry
// =============================================================================

/// Keeps every event in memory.
///
/// Clones share the same buffer, so a clone can be handed to a component
/// while the original is kept around for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingTelemetry {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// Remove and return all events so far
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        // a panicking reader must not take the recorder down with it
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Telemetry for RecordingTelemetry {
    fn send_event(&self, event: &str, payload: &Payload) -> Result<()> {
        self.lock().push(Event {
            name: event.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}
