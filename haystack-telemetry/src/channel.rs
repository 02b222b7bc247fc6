//! Non-blocking hand-off to a background task

use crate::{Event, Payload, Result, Telemetry, TelemetryError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sink that queues events on an unbounded channel.
///
/// `send_event` never waits; a [`Forwarder`] drains the queue into the real
/// sink on its own task.
#[derive(Debug, Clone)]
pub struct ChannelTelemetry {
    tx: mpsc::UnboundedSender<Event>,
}

/// Receiving half of a [`ChannelTelemetry`]
#[derive(Debug)]
pub struct Forwarder {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl ChannelTelemetry {
    pub fn new() -> (Self, Forwarder) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, Forwarder { rx })
    }

    /// Create a channel and spawn its forwarder on the current tokio runtime.
    ///
    /// The task ends once every `ChannelTelemetry` clone is dropped and
    /// resolves to the number of events delivered.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn<T>(sink: T) -> (Self, JoinHandle<usize>)
    where
        T: Telemetry + 'static,
    {
        let (telemetry, forwarder) = Self::new();
        let handle = tokio::spawn(forwarder.run(sink));
        (telemetry, handle)
    }
}

impl Telemetry for ChannelTelemetry {
    fn send_event(&self, event: &str, payload: &Payload) -> Result<()> {
        self.tx
            .send(Event {
                name: event.to_string(),
                payload: payload.clone(),
            })
            .map_err(|_| TelemetryError::ChannelClosed)
    }
}

impl Forwarder {
    /// Forward queued events until all senders are gone
    pub async fn run<T: Telemetry>(mut self, sink: T) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.rx.recv().await {
            match sink.send_event(&event.name, &event.payload) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::debug!(event = %event.name, error = %err, "dropping telemetry event");
                }
            }
        }
        delivered
    }
}
