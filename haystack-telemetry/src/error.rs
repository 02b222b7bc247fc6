//! Errors a telemetry sink may report back

use thiserror::Error;

/// Why a sink did not accept an event.
///
/// Callers raising haystack errors drop these on the floor; they exist so a
/// sink can still be tested and composed on its own.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry is disabled")]
    Disabled,

    #[error("telemetry channel closed")]
    ChannelClosed,

    #[error("telemetry transport failed: {0}")]
    Transport(#[source] anyhow::Error),
}

impl TelemetryError {
    /// Wrap any transport failure
    pub fn transport(err: impl Into<anyhow::Error>) -> Self {
        TelemetryError::Transport(err.into())
    }
}
