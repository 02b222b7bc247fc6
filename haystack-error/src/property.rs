//! Named diagnostic attributes and causes that carry them

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Value of a diagnostic attribute
pub type Property = serde_json::Value;

/// Failure to read a diagnostic attribute
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("no attribute '{name}'")]
    NotFound { name: String },
}

impl PropertyError {
    pub fn not_found(name: impl Into<String>) -> Self {
        PropertyError::NotFound { name: name.into() }
    }
}

/// A foreign error with named attributes attached.
///
/// Wrap a lower-level error in this before using it as a cause when callers
/// should be able to reach its fields through
/// [`Error::property`](crate::Error::property):
///
/// ```rust
/// use haystack_error::{Annotated, Error, ErrorKind};
/// use haystack_telemetry::NoopTelemetry;
///
/// let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
/// let err = Error::builder(ErrorKind::Cohere)
///     .message("rerank failed")
///     .cause(Annotated::new(io).with_property("retry_after", 30))
///     .build(&NoopTelemetry);
///
/// assert_eq!(err.property("retry_after").unwrap(), 30);
/// ```
pub struct Annotated {
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
    properties: BTreeMap<String, Property>,
}

impl Annotated {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self {
            source: source.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Attach an attribute (chainable)
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Property>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn property(&self, name: &str) -> Result<Property, PropertyError> {
        self.properties
            .get(name)
            .cloned()
            .ok_or_else(|| PropertyError::not_found(name))
    }

    pub fn properties(&self) -> &BTreeMap<String, Property> {
        &self.properties
    }
}

impl fmt::Display for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl fmt::Debug for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotated")
            .field("source", &self.source)
            .field("properties", &self.properties)
            .finish()
    }
}

impl std::error::Error for Annotated {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_annotated_lookup() {
        let err = Annotated::new("connection reset")
            .with_property("status_code", 503)
            .with_property("provider", "cohere");

        assert_eq!(err.property("status_code").unwrap(), json!(503));
        assert_eq!(err.property("provider").unwrap(), json!("cohere"));
        assert_eq!(
            err.property("body").unwrap_err(),
            PropertyError::not_found("body")
        );
        assert_eq!(err.properties().len(), 2);
    }

    #[test]
    fn test_annotated_is_transparent() {
        let err = Annotated::new("connection reset");
        assert_eq!(err.to_string(), "connection reset");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            PropertyError::not_found("token_count").to_string(),
            "no attribute 'token_count'"
        );
    }
}
