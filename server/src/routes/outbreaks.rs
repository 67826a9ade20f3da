//! Outbreak routes: public lookups, admin listing and deletion, CSV upload.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use uuid::Uuid;
use wire::{ErrorBody, OutbreakRecord, UploadResponse};

use super::auth::{self, AdminUser};
use crate::services::ingest::{self, IngestError};
use crate::services::outbreak::{self, OutbreakError};
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: i64 = 6;
const MAX_LIST_LIMIT: i64 = 100;

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: message.into() }))
}

pub(crate) fn outbreak_error_to_status(err: &OutbreakError) -> StatusCode {
    match err {
        OutbreakError::InvalidPincode(_) => StatusCode::BAD_REQUEST,
        OutbreakError::NotFound(_) => StatusCode::NOT_FOUND,
        OutbreakError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn ingest_error_to_status(err: &IngestError) -> StatusCode {
    match err {
        IngestError::Unauthenticated => StatusCode::UNAUTHORIZED,
        IngestError::Forbidden => StatusCode::FORBIDDEN,
        IngestError::InvalidPayload => StatusCode::BAD_REQUEST,
        IngestError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn outbreak_api_error(err: OutbreakError) -> ApiError {
    let status = outbreak_error_to_status(&err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "outbreak query failed");
    }
    api_error(status, err.to_string())
}

fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(0, MAX_LIST_LIMIT)
}

// =============================================================================
// PUBLIC LOOKUPS
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PincodeQuery {
    #[serde(default)]
    pub pincode: String,
    pub limit: Option<i64>,
}

/// `GET /api/outbreaks?pincode=&limit=`: alerts for one area, newest first.
pub async fn by_pincode(
    State(state): State<AppState>,
    Query(query): Query<PincodeQuery>,
) -> Result<Json<Vec<OutbreakRecord>>, ApiError> {
    let rows = outbreak::find_by_pincode(state.outbreaks.as_ref(), &query.pincode, query.limit.map(clamp_limit))
        .await
        .map_err(outbreak_api_error)?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// `GET /api/outbreaks/recent?limit=`: latest alerts across all areas.
pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<OutbreakRecord>>, ApiError> {
    let limit = clamp_limit(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT));
    let rows = state
        .outbreaks
        .list_recent(limit)
        .await
        .map_err(|e| outbreak_api_error(e.into()))?;
    Ok(Json(rows))
}

// =============================================================================
// ADMIN
// =============================================================================

/// `GET /api/admin/outbreaks`: every record, newest first.
pub async fn admin_list(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<OutbreakRecord>>, ApiError> {
    let rows = state
        .outbreaks
        .list_all()
        .await
        .map_err(|e| outbreak_api_error(e.into()))?;
    Ok(Json(rows))
}

/// `DELETE /api/admin/outbreaks/{id}`: remove one record.
pub async fn admin_delete(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    outbreak::delete_outbreak(state.outbreaks.as_ref(), id)
        .await
        .map_err(outbreak_api_error)?;
    tracing::info!(user_id = %admin.user.id, %id, "admin deleted outbreak record");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/admin/outbreaks/upload`: bulk insert client-parsed CSV rows.
///
/// The body is read raw so authentication and role checks run before the
/// payload is inspected.
pub async fn upload(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let caller = match auth::authenticate(&state, &headers).await {
        Ok(caller) => caller,
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match ingest::ingest(state.outbreaks.as_ref(), caller.as_ref(), &body).await {
        Ok(count) => Json(UploadResponse { success: true, count }).into_response(),
        Err(e) => {
            let status = ingest_error_to_status(&e);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(error = %e, "outbreak upload failed");
            }
            api_error(status, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
#[path = "outbreaks_test.rs"]
mod tests;
