use haystack_error::telemetry::{Payload, RecordingTelemetry, Telemetry, TelemetryError};
use haystack_error::{
    redact, Annotated, Capability, Error, ErrorKind, PropertyError, Reporter, MESSAGE_KEY,
};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};

const SECRET: &str = "contract for ACME Corp, salary 120k";

#[test]
fn every_kind_sends_exactly_one_named_event() {
    for kind in ErrorKind::ALL {
        let telemetry = RecordingTelemetry::new();
        let _err = Error::new(kind, "something failed", &telemetry);

        let events = telemetry.events();
        assert_eq!(events.len(), 1, "{kind}");
        assert_eq!(events[0].name, format!("{} raised", kind.as_str()));
    }
}

#[test]
fn redacted_families_send_empty_payloads() {
    for kind in ErrorKind::ALL {
        let telemetry = RecordingTelemetry::new();
        let _err = Error::new(kind, SECRET, &telemetry);
        let payload = &telemetry.events()[0].payload;

        let redacted = kind.is_a(ErrorKind::DocumentStore)
            || kind.has_capability(Capability::RemoteApi);
        if redacted {
            assert!(payload.is_empty(), "{kind} leaked its message");
        } else {
            assert_eq!(payload, &Payload::new().with("message", SECRET), "{kind}");
        }
    }
}

#[test]
fn recorded_payload_matches_gate() {
    for kind in ErrorKind::ALL {
        let telemetry = RecordingTelemetry::new();
        let err = Error::new(kind, "index 'docs' is read-only", &telemetry);

        let expected = redact(err.report_message(), err.message());
        assert_eq!(telemetry.events()[0].payload, expected, "{kind}");
        assert_eq!(
            expected.get(MESSAGE_KEY).is_some(),
            kind.reports_message(),
            "{kind}"
        );
    }
}

#[test]
fn kind_names_round_trip_through_serde() {
    let kinds: Vec<ErrorKind> = ErrorKind::ALL.to_vec();
    let json = serde_json::to_value(&kinds).unwrap();
    assert_eq!(json[6], json!("FilterError"));

    for (value, kind) in json.as_array().unwrap().iter().zip(&kinds) {
        let name = value.as_str().unwrap();
        assert_eq!(ErrorKind::from_name(name), Some(*kind));
    }
    let back: Vec<ErrorKind> = serde_json::from_value(json).unwrap();
    assert_eq!(back, kinds);
}

#[test]
fn redaction_never_hides_the_message_from_the_user() {
    let reporter = Reporter::new(RecordingTelemetry::new());
    let err = reporter.document_store(SECRET);
    assert_eq!(err.to_string(), SECRET);
}

#[test]
fn config_error_renders_docs_hint() {
    let reporter = Reporter::noop();
    let err = reporter.pipeline_config("missing field 'nodes'");

    assert_eq!(
        err.render(),
        "missing field 'nodes'\n\nCheck out the documentation at \
         https://docs.haystack.deepset.ai/docs/pipelines#yaml-file-definitions"
    );
}

#[test]
fn docs_link_can_be_overridden() {
    let err = Error::builder(ErrorKind::Modeling)
        .message("unknown model type")
        .docs_link("https://docs.haystack.deepset.ai/docs/models")
        .build(&RecordingTelemetry::new());

    assert_eq!(
        err.render(),
        "unknown model type\n\nCheck out the documentation at https://docs.haystack.deepset.ai/docs/models"
    );
}

#[test]
fn rate_limit_is_always_429() {
    let telemetry = RecordingTelemetry::new();
    for requested in [200, 500, 503] {
        let err = Error::builder(ErrorKind::OpenAIRateLimit)
            .message("too many requests")
            .status_code(requested)
            .build(&telemetry);
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.property("status_code").unwrap(), json!(429));
    }
}

#[test]
fn duplicate_document_is_both_store_and_invalid_value() {
    let err = Reporter::noop().duplicate_document("a1b2");

    assert!(err.has_capability(Capability::DocumentStore));
    assert!(err.has_capability(Capability::InvalidValue));
    assert!(err.is(ErrorKind::DocumentStore));

    let caught = |err: &Error| err.has_capability(Capability::InvalidValue);
    assert!(caught(&err));
}

#[test]
fn attribute_lookup_reaches_through_layers() {
    let reporter = Reporter::noop();
    let http = Annotated::new(io::Error::new(io::ErrorKind::Other, "503 Service Unavailable"))
        .with_property("retry_after", 20)
        .with_property("request_id", "req-81");

    let api = reporter.raise(
        Error::builder(ErrorKind::OpenAI)
            .message("completion failed")
            .status_code(503)
            .cause(http),
    );
    let node = reporter.raise(api.wrap(ErrorKind::Node).message("PromptNode failed"));
    let pipeline = reporter.raise(node.wrap(ErrorKind::Pipeline).message("run aborted"));

    assert_eq!(pipeline.property("status_code").unwrap(), json!(503));
    assert_eq!(pipeline.property("request_id").unwrap(), json!("req-81"));
    assert_eq!(pipeline.property("message").unwrap(), json!("run aborted"));
    assert_eq!(
        pipeline.property("no_such_field").unwrap_err(),
        PropertyError::not_found("no_such_field")
    );
}

#[test]
fn shared_cause_stays_usable_elsewhere() {
    let reporter = Reporter::noop();
    let original = Arc::new(anyhow::Error::new(
        Annotated::new("timeout").with_property("elapsed_ms", 30_000),
    ));

    let err = reporter.raise(
        Error::builder(ErrorKind::ImageToText)
            .message("captioning failed")
            .shared_cause(original.clone()),
    );

    assert_eq!(original.to_string(), "timeout");
    assert_eq!(err.property("elapsed_ms").unwrap(), json!(30_000));
    assert!(Arc::ptr_eq(&original, &err.shared_cause().unwrap()));
}

#[test]
fn errors_cross_threads() {
    let err = Reporter::noop().node("worker failed");
    let handle = std::thread::spawn(move || err.render());
    assert_eq!(handle.join().unwrap(), "worker failed");
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct Unreachable;

impl Telemetry for Unreachable {
    fn send_event(&self, _event: &str, _payload: &Payload) -> haystack_error::telemetry::Result<()> {
        Err(TelemetryError::ChannelClosed)
    }
}

#[test]
fn dropped_events_are_logged_not_raised() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let err = tracing::subscriber::with_default(subscriber, || {
        Error::new(ErrorKind::Filter, "bad filter", &Unreachable)
    });

    assert_eq!(err.kind(), ErrorKind::Filter);
    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("telemetry event dropped"));
    assert!(output.contains("FilterError raised"));
}
