//! # haystack-telemetry
//!
//! The sink side of haystack error reporting.
//!
//! Every haystack error sends one custom event when it is constructed. This
//! crate only defines where that event goes: the [`Telemetry`] trait plus a
//! handful of sinks. Delivery, batching and retries belong to whatever sits
//! behind a sink, never to the code raising the error.
//!
//! ## Sinks
//!
//! - [`NoopTelemetry`]: drops every event
//! - [`TracingTelemetry`]: logs events through `tracing`
//! - [`RecordingTelemetry`]: keeps events in memory, mostly for tests
//! - [`ChannelTelemetry`]: hands events to a tokio task without blocking
//! - [`Gated`]: applies a [`TelemetryConfig`] in front of any other sink
//!
//! ## Usage
//!
//! ```rust
//! use haystack_telemetry::{Payload, RecordingTelemetry, Telemetry};
//!
//! let sink = RecordingTelemetry::new();
//! sink.send_event("PipelineError raised", &Payload::new().with("message", "boom"))
//!     .unwrap();
//!
//! assert_eq!(sink.events()[0].name, "PipelineError raised");
//! ```

mod channel;
mod config;
mod error;
mod payload;
mod sink;

pub use channel::{ChannelTelemetry, Forwarder};
pub use config::{Gated, TelemetryConfig, TELEMETRY_ENV_VAR};
pub use error::TelemetryError;
pub use payload::Payload;
pub use sink::{Event, NoopTelemetry, RecordingTelemetry, Telemetry, TracingTelemetry};

/// Result type alias for sink operations
pub type Result<T> = std::result::Result<T, TelemetryError>;
