use std::sync::Arc;

use super::*;
use crate::state::test_helpers::{MockStore, record, test_app_state};

#[test]
fn outbreak_error_to_status_maps_variants() {
    let err = OutbreakError::InvalidPincode(wire::PincodeError::Empty);
    assert_eq!(outbreak_error_to_status(&err), StatusCode::BAD_REQUEST);

    let err = OutbreakError::NotFound(Uuid::nil());
    assert_eq!(outbreak_error_to_status(&err), StatusCode::NOT_FOUND);

    let err = OutbreakError::Database(sqlx::Error::PoolTimedOut);
    assert_eq!(outbreak_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn ingest_error_to_status_maps_variants() {
    assert_eq!(ingest_error_to_status(&IngestError::Unauthenticated), StatusCode::UNAUTHORIZED);
    assert_eq!(ingest_error_to_status(&IngestError::Forbidden), StatusCode::FORBIDDEN);
    assert_eq!(ingest_error_to_status(&IngestError::InvalidPayload), StatusCode::BAD_REQUEST);
    assert_eq!(
        ingest_error_to_status(&IngestError::Database(sqlx::Error::PoolTimedOut)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn clamp_limit_bounds() {
    assert_eq!(clamp_limit(-3), 0);
    assert_eq!(clamp_limit(6), 6);
    assert_eq!(clamp_limit(10_000), MAX_LIST_LIMIT);
}

#[tokio::test]
async fn by_pincode_returns_matching_records() {
    let store = Arc::new(MockStore::with_records(vec![
        record("110001", "Dengue", 12, "2024-01-01"),
        record("560034", "Malaria", 3, "2024-01-02"),
    ]));
    let state = test_app_state(store, None);

    let query = PincodeQuery { pincode: "110001".into(), limit: None };
    let Json(rows) = by_pincode(State(state), Query(query)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].disease_name, "Dengue");
}

#[tokio::test]
async fn by_pincode_invalid_input_is_bad_request_with_message() {
    let state = test_app_state(Arc::new(MockStore::default()), None);

    let query = PincodeQuery { pincode: "11".into(), limit: None };
    let (status, Json(body)) = by_pincode(State(state), Query(query)).await.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "Please enter a valid 6-digit pincode");
}

#[tokio::test]
async fn recent_defaults_to_six() {
    let records = (1..=9)
        .map(|day| record("110001", "Dengue", day, &format!("2024-01-0{day}")))
        .collect();
    let state = test_app_state(Arc::new(MockStore::with_records(records)), None);

    let Json(rows) = recent(State(state), Query(RecentQuery { limit: None })).await.unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].date, "2024-01-09");
}

#[tokio::test]
async fn upload_without_token_is_unauthorized_and_untouched() {
    let store = Arc::new(MockStore::default());
    let state = test_app_state(store.clone(), None);

    let response = upload(State(state), HeaderMap::new(), Bytes::from_static(br#"{"data":[{}]}"#)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.table_calls(), 0);
}
