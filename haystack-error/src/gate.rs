//! What an error is allowed to tell telemetry

use haystack_telemetry::Payload;

/// Payload key holding the error message
pub const MESSAGE_KEY: &str = "message";

/// Build the telemetry payload for an error.
///
/// The message is included only when `report_message` is set; kinds whose
/// messages may contain documents or user input pass `false` and send an
/// empty payload. A missing message is left out rather than sent as an empty
/// string.
pub fn redact(report_message: bool, message: Option<&str>) -> Payload {
    match message {
        Some(message) if report_message => Payload::new().with(MESSAGE_KEY, message),
        _ => Payload::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_message_is_sent() {
        let payload = redact(true, Some("missing field 'nodes'"));
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get(MESSAGE_KEY), Some("missing field 'nodes'"));
    }

    #[test]
    fn test_unreported_message_is_dropped() {
        assert!(redact(false, Some("document 'secret contract' exists")).is_empty());
    }

    #[test]
    fn test_missing_message() {
        assert!(redact(true, None).is_empty());
        assert!(redact(false, None).is_empty());
    }
}
