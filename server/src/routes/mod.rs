//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API and the streaming chat endpoint under a
//! single Axum router. The browser app is served separately and calls these
//! routes cross-origin, hence the permissive CORS layer.

pub mod auth;
pub mod chat;
pub mod outbreaks;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full API router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/outbreaks", get(outbreaks::by_pincode))
        .route("/api/outbreaks/recent", get(outbreaks::recent))
        .route("/api/admin/outbreaks", get(outbreaks::admin_list))
        .route("/api/admin/outbreaks/upload", post(outbreaks::upload))
        .route("/api/admin/outbreaks/{id}", delete(outbreaks::admin_delete))
        .route("/api/chat", post(chat::chat))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
