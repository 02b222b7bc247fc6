//! The main Error type for haystack

use crate::gate;
use crate::property::{Annotated, Property, PropertyError};
use crate::{Capability, ErrorKind};
use haystack_telemetry::{Payload, Telemetry};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Any error generated by haystack.
///
/// This error type provides:
/// - `kind`: Which member of the taxonomy this is
/// - `message`: Human-readable description (optional)
/// - `docs_link`: Where to read up on the failure, defaulted per kind
/// - `report_message`: Whether the message went out with the telemetry event
/// - `status_code`: Remote API status, only on remote API kinds
/// - `cause`: The wrapped lower-level error (if any)
///
/// Errors are built with [`Error::builder`]; building sends exactly one
/// telemetry event named `"{kind} raised"`. There are no setters: wrapping
/// an error at a higher layer builds a new one with the old one as cause.
///
/// # Example
///
/// ```rust
/// use haystack_error::{Error, ErrorKind};
/// use haystack_telemetry::RecordingTelemetry;
///
/// let telemetry = RecordingTelemetry::new();
/// let err = Error::builder(ErrorKind::PipelineConfig)
///     .message("missing field 'nodes'")
///     .build(&telemetry);
///
/// assert_eq!(
///     err.to_string(),
///     "missing field 'nodes'\n\nCheck out the documentation at \
///      https://docs.haystack.deepset.ai/docs/pipelines#yaml-file-definitions"
/// );
/// assert_eq!(telemetry.events()[0].name, "PipelineConfigError raised");
/// ```
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    docs_link: Option<String>,
    report_message: bool,
    status_code: Option<u16>,
    cause: Option<Arc<anyhow::Error>>,
}

/// Collects the fields of an [`Error`] before it is raised.
///
/// Anything left unset falls back to the kind's defaults.
#[derive(Debug)]
#[must_use = "an ErrorBuilder does nothing until built"]
pub struct ErrorBuilder {
    kind: ErrorKind,
    message: Option<String>,
    docs_link: Option<Option<String>>,
    report_message: Option<bool>,
    status_code: Option<u16>,
    cause: Option<Arc<anyhow::Error>>,
}

impl ErrorBuilder {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            docs_link: None,
            report_message: None,
            status_code: None,
            cause: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Override the kind's documentation link
    pub fn docs_link(mut self, docs_link: impl Into<String>) -> Self {
        self.docs_link = Some(Some(docs_link.into()));
        self
    }

    /// Drop the kind's documentation link
    pub fn no_docs_link(mut self) -> Self {
        self.docs_link = Some(None);
        self
    }

    /// Override whether the message is sent with the telemetry event
    pub fn report_message(mut self, report_message: bool) -> Self {
        self.report_message = Some(report_message);
        self
    }

    /// Set the remote API status code.
    ///
    /// Ignored on kinds without a status code, and on kinds whose status code
    /// is fixed.
    pub fn status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Wrap a lower-level error
    pub fn cause(mut self, cause: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.cause.is_none(), "cause already set");
        self.cause = Some(Arc::new(cause.into()));
        self
    }

    /// Wrap a lower-level error that is also held elsewhere
    pub fn shared_cause(mut self, cause: Arc<anyhow::Error>) -> Self {
        debug_assert!(self.cause.is_none(), "cause already set");
        self.cause = Some(cause);
        self
    }

    /// Build the error and report it.
    ///
    /// The telemetry event is sent before the error is returned, whether or
    /// not the caller goes on to propagate it. Failures and panics inside the
    /// sink are logged and dropped.
    pub fn build(self, telemetry: &dyn Telemetry) -> Error {
        let spec = self.kind.spec();
        let report_message = self.report_message.unwrap_or(spec.report_message);

        send(
            telemetry,
            self.kind,
            gate::redact(report_message, self.message.as_deref()),
        );

        let status_code = match spec.fixed_status_code {
            Some(fixed) => Some(fixed),
            None if spec.has_status_code() => self.status_code,
            None => None,
        };

        Error {
            kind: self.kind,
            message: self.message,
            docs_link: self
                .docs_link
                .unwrap_or_else(|| spec.docs_link.map(str::to_string)),
            report_message,
            status_code,
            cause: self.cause,
        }
    }
}

fn send(telemetry: &dyn Telemetry, kind: ErrorKind, payload: Payload) {
    let event = kind.event_name();
    let sent = panic::catch_unwind(AssertUnwindSafe(|| telemetry.send_event(&event, &payload)));

    match sent {
        Ok(Ok(())) => tracing::trace!(event = %event, "telemetry event sent"),
        Ok(Err(err)) => tracing::debug!(event = %event, error = %err, "telemetry event dropped"),
        Err(_) => tracing::debug!(event = %event, "telemetry sink panicked, event dropped"),
    }
}

impl Error {
    /// Start building an error of the given kind
    pub fn builder(kind: ErrorKind) -> ErrorBuilder {
        ErrorBuilder::new(kind)
    }

    /// Build and report an error with just a message
    pub fn new(kind: ErrorKind, message: impl Into<String>, telemetry: &dyn Telemetry) -> Self {
        Self::builder(kind).message(message).build(telemetry)
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn docs_link(&self) -> Option<&str> {
        self.docs_link.as_deref()
    }

    /// Whether the message was sent with the telemetry event
    pub fn report_message(&self) -> bool {
        self.report_message
    }

    /// Remote API status code, on kinds that carry one
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Get the wrapped error (if any)
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_deref()
    }

    /// Get a shared handle to the wrapped error (if any)
    pub fn shared_cause(&self) -> Option<Arc<anyhow::Error>> {
        self.cause.clone()
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Whether this error is `kind` or one of its descendants
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind.is_a(kind)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.kind.has_capability(capability)
    }

    /// Start building a new error of `kind` that wraps this one
    pub fn wrap(self, kind: ErrorKind) -> ErrorBuilder {
        Self::builder(kind).cause(self)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Read a named attribute, falling back to the cause.
    ///
    /// The error's own fields answer first. Any other name, `message` when no
    /// message was set, and `status_code` on kinds without one, are looked up
    /// on the cause and its answer is returned unchanged. Without a cause the
    /// lookup fails with [`PropertyError::NotFound`].
    pub fn property(&self, name: &str) -> Result<Property, PropertyError> {
        if let Some(value) = self.own_property(name) {
            return Ok(value);
        }

        match &self.cause {
            Some(cause) => cause_property(cause, name),
            None => Err(PropertyError::not_found(name)),
        }
    }

    fn own_property(&self, name: &str) -> Option<Property> {
        match name {
            "kind" => Some(Property::from(self.kind.as_str())),
            "message" => self.message.as_deref().map(Property::from),
            "docs_link" => Some(self.docs_link.as_deref().map_or(Property::Null, Property::from)),
            "report_message" => Some(Property::Bool(self.report_message)),
            "status_code" if self.kind.spec().has_status_code() => {
                Some(self.status_code.map_or(Property::Null, Property::from))
            }
            _ => None,
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// The user-facing text of this error.
    ///
    /// A missing message renders as the empty string; with a docs link, only
    /// the documentation hint is left.
    pub fn render(&self) -> String {
        let message = self.message.as_deref().unwrap_or_default();
        match &self.docs_link {
            Some(link) if message.is_empty() => format!("Check out the documentation at {}", link),
            Some(link) => format!("{}\n\nCheck out the documentation at {}", message, link),
            None => message.to_string(),
        }
    }
}

fn cause_property(cause: &anyhow::Error, name: &str) -> Result<Property, PropertyError> {
    if let Some(err) = cause.downcast_ref::<Error>() {
        return err.property(name);
    }
    if let Some(annotated) = cause.downcast_ref::<Annotated>() {
        return annotated.property(name);
    }
    Err(PropertyError::not_found(name))
}

// =============================================================================
// Display - the rendered message
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;

        if let Some(message) = &self.message {
            writeln!(f)?;
            writeln!(f, "    Message: {}", message)?;
        }

        if let Some(status_code) = self.status_code {
            writeln!(f, "    Status: {}", status_code)?;
        }

        if let Some(docs_link) = &self.docs_link {
            writeln!(f, "    Docs: {}", docs_link)?;
        }

        if let Some(cause) = &self.cause {
            writeln!(f)?;
            writeln!(f, "    Cause: {:?}", cause)?;
        }

        Ok(())
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| &**e as &(dyn std::error::Error + 'static))
    }
}
