use super::*;

#[test]
fn success_statuses_are_not_errors() {
    assert_eq!(TransportError::from_status(200), None);
    assert_eq!(TransportError::from_status(204), None);
}

#[test]
fn rate_limit_and_unavailable_are_distinguished() {
    assert_eq!(TransportError::from_status(429), Some(TransportError::RateLimited));
    assert_eq!(TransportError::from_status(402), Some(TransportError::Unavailable));
    assert_eq!(TransportError::from_status(500), Some(TransportError::Http(500)));
    assert_eq!(TransportError::from_status(401), Some(TransportError::Http(401)));
}

#[test]
fn status_maps_back() {
    assert_eq!(TransportError::RateLimited.status(), 429);
    assert_eq!(TransportError::Unavailable.status(), 402);
    assert_eq!(TransportError::Http(503).status(), 503);
}

#[test]
fn chat_request_wire_shape() {
    let req = ChatRequest { messages: vec![ChatMessage::user("hi")], pincode: "110001".into() };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "messages": [{ "role": "user", "content": "hi" }],
            "pincode": "110001"
        })
    );
}

#[test]
fn chat_request_pincode_defaults_to_empty() {
    let req: ChatRequest = serde_json::from_str(r#"{"messages":[]}"#).unwrap();
    assert!(req.pincode.is_empty());
}

#[test]
fn role_rejects_unknown_values() {
    let err = serde_json::from_str::<ChatMessage>(r#"{"role":"system","content":"x"}"#);
    assert!(err.is_err());
}
