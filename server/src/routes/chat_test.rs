use std::sync::Arc;

use axum::body::to_bytes;
use wire::ChatMessage;

use super::*;
use crate::state::test_helpers::{MockStore, MockUpstream, test_app_state, user};

fn auth_user() -> AuthUser {
    AuthUser { user: user("u@example.test") }
}

fn hello() -> ChatRequest {
    ChatRequest { messages: vec![ChatMessage::user("hello")], pincode: String::new() }
}

#[tokio::test]
async fn chat_relays_event_stream() {
    let upstream = Arc::new(MockUpstream::streaming(vec![
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\ndata: [DONE]\n",
    ]));
    let state = test_app_state(Arc::new(MockStore::default()), Some(upstream));

    let response = chat(State(state), auth_user(), Json(hello())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let mut sink: Vec<String> = Vec::new();
    let mut parser = wire::SseParser::new();
    parser.push(std::str::from_utf8(&body).unwrap(), &mut sink);
    assert_eq!(sink, vec!["Hel".to_string(), "lo".to_string()]);
}

#[tokio::test]
async fn unconfigured_provider_is_payment_required() {
    let state = test_app_state(Arc::new(MockStore::default()), None);
    let err = chat(State(state), auth_user(), Json(hello())).await.err().unwrap();
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed.error, "AI service is not configured");
}

#[tokio::test]
async fn provider_402_is_passed_through() {
    let upstream = Arc::new(MockUpstream::failing(402));
    let state = test_app_state(Arc::new(MockStore::default()), Some(upstream));
    let err = chat(State(state), auth_user(), Json(hello())).await.err().unwrap();
    assert_eq!(err.into_response().status(), StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn provider_500_is_bad_gateway() {
    let upstream = Arc::new(MockUpstream::failing(500));
    let state = test_app_state(Arc::new(MockStore::default()), Some(upstream));
    let err = chat(State(state), auth_user(), Json(hello())).await.err().unwrap();
    assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
}
