use serde_json::json;

use super::*;

#[test]
fn api_url_joins_without_double_slash() {
    assert_eq!(api_url("http://localhost:3000/", "/healthz"), "http://localhost:3000/healthz");
    assert_eq!(api_url("http://localhost:3000", "/api/chat"), "http://localhost:3000/api/chat");
}

#[test]
fn error_message_prefers_error_field() {
    assert_eq!(error_message(&json!({"error": "Admin access required"})), "Admin access required");
    assert_eq!(error_message(&json!({"detail": 1})), r#"{"detail":1}"#);
    assert_eq!(error_message(&Value::Null), "null");
}

#[test]
fn authed_client_requires_token() {
    let ctx = CliContext { base_url: "http://localhost".into(), session_token: None };
    assert!(matches!(authed_client(&ctx), Err(CliError::MissingSessionToken)));
}

#[test]
fn console_sink_records_reply() {
    let mut transcript = Transcript::new();
    transcript.begin_turn("hi").unwrap();
    {
        let mut sink = ConsoleSink { transcript: &mut transcript };
        sink.on_delta("Hel");
        sink.on_delta("lo");
        sink.on_done();
    }
    assert_eq!(transcript.last_reply(), Some("Hello"));
    assert!(!transcript.is_streaming());
}

#[test]
fn transport_errors_render_user_messages() {
    let err = CliError::from(TransportError::RateLimited);
    assert_eq!(err.to_string(), "Rate limit exceeded. Please try again in a few moments.");
    let err = CliError::from(PincodeError::InvalidFormat);
    assert_eq!(err.to_string(), "Please enter a valid 6-digit pincode");
}
