//! Auth routes: session token extraction and the current-user endpoint.
//!
//! Tokens arrive either as `Authorization: Bearer <token>` (CLI, API
//! clients) or as the `session_token` cookie set by the identity platform.
//! The header wins when both are present.

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;

use crate::services::outbreak::AppRole;
use crate::services::session::{self, SessionUser};
use crate::state::AppState;

const COOKIE_NAME: &str = "session_token";

/// Session token from the bearer header, falling back to the cookie.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_owned());
    }

    let jar = CookieJar::from_headers(headers);
    jar.get(COOKIE_NAME)
        .map(Cookie::value)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Resolve the caller, if any.
///
/// # Errors
///
/// Returns the database error if the session lookup fails.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Option<SessionUser>, sqlx::Error> {
    match session_token(headers) {
        Some(token) => session::validate_session(&state.pool, &token).await,
        None => Ok(None),
    }
}

// =============================================================================
// AUTH EXTRACTORS
// =============================================================================

/// Authenticated user. Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: SessionUser,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user = authenticate(&app_state, &parts.headers)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user })
    }
}

/// Authenticated user holding the admin role. Rejects with 401 or 403.
pub struct AdminUser {
    pub user: SessionUser,
}

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser { user } = AuthUser::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);
        match app_state.outbreaks.has_role(user.id, AppRole::Admin).await {
            Ok(true) => Ok(Self { user }),
            Ok(false) => Err(StatusCode::FORBIDDEN),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "role lookup failed");
                Err(StatusCode::FORBIDDEN)
            }
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: SessionUser,
    pub is_admin: bool,
}

/// `GET /api/auth/me`: current user and whether they can reach the admin pages.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Json<MeResponse> {
    let is_admin = state
        .outbreaks
        .has_role(auth.user.id, AppRole::Admin)
        .await
        .unwrap_or(false);
    Json(MeResponse { user: auth.user, is_admin })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
