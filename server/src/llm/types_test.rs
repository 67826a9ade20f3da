use super::*;

#[test]
fn upstream_status_only_for_api_response() {
    let err = LlmError::ApiResponse { status: 429, body: "slow down".into() };
    assert_eq!(err.upstream_status(), Some(429));
    assert_eq!(LlmError::ApiRequest("timeout".into()).upstream_status(), None);
    assert_eq!(LlmError::Stream("reset".into()).upstream_status(), None);
}

#[test]
fn display_messages() {
    assert_eq!(
        LlmError::MissingApiKey { var: "OPENAI_API_KEY".into() }.to_string(),
        "missing API key: env var OPENAI_API_KEY not set"
    );
    assert_eq!(
        LlmError::ApiResponse { status: 500, body: String::new() }.to_string(),
        "API response error: status 500"
    );
    assert_eq!(LlmError::ConfigParse("bad".into()).to_string(), "config parse failed: bad");
}
