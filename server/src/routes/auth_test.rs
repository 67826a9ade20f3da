use std::sync::Arc;

use axum::http::HeaderValue;
use axum::http::header::COOKIE;

use super::*;
use crate::state::test_helpers::{MockStore, test_app_state};

fn headers(pairs: &[(axum::http::HeaderName, &'static str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.insert(name.clone(), HeaderValue::from_static(value));
    }
    map
}

// =============================================================================
// session_token
// =============================================================================

#[test]
fn bearer_header_is_read() {
    let h = headers(&[(AUTHORIZATION, "Bearer abc123")]);
    assert_eq!(session_token(&h).as_deref(), Some("abc123"));
}

#[test]
fn cookie_is_read_when_no_header() {
    let h = headers(&[(COOKIE, "theme=dark; session_token=tok-1")]);
    assert_eq!(session_token(&h).as_deref(), Some("tok-1"));
}

#[test]
fn bearer_wins_over_cookie() {
    let h = headers(&[(AUTHORIZATION, "Bearer from-header"), (COOKIE, "session_token=from-cookie")]);
    assert_eq!(session_token(&h).as_deref(), Some("from-header"));
}

#[test]
fn missing_or_blank_tokens_are_none() {
    assert_eq!(session_token(&HeaderMap::new()), None);
    assert_eq!(session_token(&headers(&[(AUTHORIZATION, "Bearer   ")])), None);
    assert_eq!(session_token(&headers(&[(AUTHORIZATION, "Basic dXNlcg==")])), None);
    assert_eq!(session_token(&headers(&[(COOKIE, "session_token=")])), None);
}

// =============================================================================
// authenticate
// =============================================================================

#[tokio::test]
async fn no_token_is_anonymous_without_db() {
    let state = test_app_state(Arc::new(MockStore::default()), None);
    let caller = authenticate(&state, &HeaderMap::new()).await.unwrap();
    assert!(caller.is_none());
}
