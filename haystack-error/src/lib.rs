//! # haystack-error
//!
//! Unified error reporting for haystack pipelines, document stores and nodes.
//!
//! ## Design
//!
//! - **ErrorKind**: Where the failure came from (e.g. PipelineConfig, Filter, OpenAI)
//! - **Kind defaults**: Each kind fixes its docs link, whether its message may be
//!   reported, and whether it carries a status code
//! - **Telemetry on construction**: Building an error sends one `"{kind} raised"`
//!   event; messages that may contain user data are left out
//! - **Cause**: Wrapped lower-level errors stay reachable, including their attributes
//!
//! ## Usage
//!
//! ```rust
//! use haystack_error::{Capability, ErrorKind, Reporter};
//! use haystack_telemetry::RecordingTelemetry;
//!
//! let telemetry = RecordingTelemetry::new();
//! let reporter = Reporter::new(telemetry.clone());
//!
//! fn write(reporter: &Reporter) -> haystack_error::Result<()> {
//!     Err(reporter.duplicate_document("doc-1"))
//! }
//!
//! let err = write(&reporter).unwrap_err();
//! assert!(err.is(ErrorKind::DocumentStore));
//! assert!(err.has_capability(Capability::InvalidValue));
//!
//! // document store messages are never sent
//! assert!(telemetry.events()[0].payload.is_empty());
//! ```
//!
//! ## Principles
//!
//! - Errors are immutable once built; re-wrapping builds a new error
//! - Telemetry failures never replace the error being reported
//! - Redaction only affects telemetry, `Display` always shows the full message

mod error;
mod gate;
mod kind;
mod property;
mod reporter;

pub use error::{Error, ErrorBuilder};
pub use gate::{redact, MESSAGE_KEY};
pub use kind::{
    Capability, ErrorKind, KindSpec, MODELING_DOCS, PIPELINE_CONFIG_DOCS, PIPELINE_DOCS,
    RATE_LIMIT_STATUS, UnknownKind,
};
pub use property::{Annotated, Property, PropertyError};
pub use reporter::Reporter;

pub use haystack_telemetry as telemetry;

/// Result type alias using haystack Error
pub type Result<T> = std::result::Result<T, Error>;
