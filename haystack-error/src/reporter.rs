//! A telemetry handle with one constructor per error kind

use crate::{Error, ErrorBuilder, ErrorKind};
use haystack_telemetry::{NoopTelemetry, Telemetry, TelemetryConfig, TracingTelemetry};
use std::fmt;
use std::sync::Arc;

/// Raises errors against a fixed telemetry sink.
///
/// Components keep a `Reporter` instead of threading a sink through every
/// failure site. Cloning is cheap and clones share the sink.
///
/// ```rust
/// use haystack_error::Reporter;
/// use haystack_telemetry::RecordingTelemetry;
///
/// let telemetry = RecordingTelemetry::new();
/// let reporter = Reporter::new(telemetry.clone());
///
/// let err = reporter.openai_rate_limit("slow down");
/// assert_eq!(err.status_code(), Some(429));
/// assert_eq!(telemetry.events()[0].name, "OpenAIRateLimitError raised");
/// ```
#[derive(Clone)]
pub struct Reporter {
    telemetry: Arc<dyn Telemetry>,
}

impl Reporter {
    pub fn new(telemetry: impl Telemetry + 'static) -> Self {
        Self {
            telemetry: Arc::new(telemetry),
        }
    }

    pub fn from_shared(telemetry: Arc<dyn Telemetry>) -> Self {
        Self { telemetry }
    }

    /// Reporter that sends nowhere
    pub fn noop() -> Self {
        Self::new(NoopTelemetry)
    }

    /// Log events through `tracing` unless `HAYSTACK_TELEMETRY_ENABLED` turns them off
    pub fn from_env() -> Self {
        Self::from_config(TelemetryConfig::from_env())
    }

    /// Log events through `tracing` while `config` is enabled
    pub fn from_config(config: TelemetryConfig) -> Self {
        Self::new(config.gate(TracingTelemetry))
    }

    pub fn telemetry(&self) -> &dyn Telemetry {
        &*self.telemetry
    }

    /// Build and report an error from a builder
    pub fn raise(&self, builder: ErrorBuilder) -> Error {
        builder.build(self.telemetry())
    }

    /// Build and report an error of any kind with just a message
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> Error {
        Error::new(kind, message, self.telemetry())
    }

    // =========================================================================
    // Convenience constructors
    // =========================================================================

    pub fn haystack(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::Haystack, message)
    }

    pub fn modeling(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::Modeling, message)
    }

    pub fn pipeline(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::Pipeline, message)
    }

    pub fn pipeline_schema(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::PipelineSchema, message)
    }

    pub fn pipeline_config(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::PipelineConfig, message)
    }

    pub fn document_store(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::DocumentStore, message)
    }

    pub fn filter(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::Filter, message)
    }

    pub fn pinecone_document_store(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::PineconeDocumentStore, message)
    }

    /// Create a DuplicateDocument error for the given document id
    pub fn duplicate_document(&self, id: impl fmt::Display) -> Error {
        self.error(
            ErrorKind::DuplicateDocument,
            format!("document with id '{}' already exists", id),
        )
    }

    pub fn node(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::Node, message)
    }

    pub fn audio_node(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::AudioNode, message)
    }

    /// Create an OpenAI error, with the HTTP status if one was received
    pub fn openai(&self, message: impl Into<String>, status_code: Option<u16>) -> Error {
        self.remote_api(ErrorKind::OpenAI, message, status_code)
    }

    /// Create an OpenAIRateLimit error (status 429)
    pub fn openai_rate_limit(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::OpenAIRateLimit, message)
    }

    /// Create a Cohere error, with the HTTP status if one was received
    pub fn cohere(&self, message: impl Into<String>, status_code: Option<u16>) -> Error {
        self.remote_api(ErrorKind::Cohere, message, status_code)
    }

    pub fn image_to_text(&self, message: impl Into<String>) -> Error {
        self.error(ErrorKind::ImageToText, message)
    }

    fn remote_api(
        &self,
        kind: ErrorKind,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Error {
        let mut builder = Error::builder(kind).message(message);
        if let Some(status_code) = status_code {
            builder = builder.status_code(status_code);
        }
        self.raise(builder)
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}
