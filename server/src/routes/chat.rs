//! Chat route: relays the provider's SSE stream to the browser.

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use wire::{ChatRequest, ErrorBody};

use super::auth::AuthUser;
use crate::services::chat::{self, ChatProxyError};
use crate::state::AppState;

impl IntoResponse for ChatProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// `POST /api/chat`: stream a completion as `text/event-stream`.
///
/// A malformed JSON body is rejected by the extractor with 4xx before the
/// provider is contacted.
pub async fn chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ChatProxyError> {
    let stream = chat::open_chat_stream(&state, &auth.user, request).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/event-stream"), (header::CACHE_CONTROL, "no-cache")],
        Body::from_stream(stream),
    )
        .into_response())
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
