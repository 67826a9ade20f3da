use super::*;
use crate::state::test_helpers::{MockStore, record};

#[test]
fn app_role_names_match_schema() {
    assert_eq!(AppRole::Admin.as_str(), "admin");
    assert_eq!(AppRole::User.as_str(), "user");
}

#[tokio::test]
async fn find_by_pincode_filters_and_orders_newest_first() {
    let store = MockStore::with_records(vec![
        record("110001", "Dengue", 12, "2024-01-01"),
        record("560034", "Malaria", 3, "2024-03-01"),
        record("110001", "Cholera", 5, "2024-02-15"),
    ]);

    let rows = find_by_pincode(&store, " 110001 ", None).await.unwrap();
    let diseases: Vec<&str> = rows.iter().map(|r| r.disease_name.as_str()).collect();
    assert_eq!(diseases, vec!["Cholera", "Dengue"]);
}

#[tokio::test]
async fn find_by_pincode_applies_limit() {
    let store = MockStore::with_records(vec![
        record("110001", "Dengue", 12, "2024-01-01"),
        record("110001", "Cholera", 5, "2024-02-15"),
    ]);

    let rows = find_by_pincode(&store, "110001", Some(1)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].disease_name, "Cholera");
}

#[tokio::test]
async fn find_by_pincode_rejects_bad_input_before_query() {
    let store = MockStore::default();

    let err = find_by_pincode(&store, "", None).await.unwrap_err();
    assert!(matches!(err, OutbreakError::InvalidPincode(PincodeError::Empty)));
    assert_eq!(err.to_string(), "Please enter a pincode");

    let err = find_by_pincode(&store, "1100", None).await.unwrap_err();
    assert!(matches!(err, OutbreakError::InvalidPincode(PincodeError::InvalidFormat)));

    assert_eq!(store.table_calls(), 0);
}

#[tokio::test]
async fn find_by_pincode_unknown_pincode_is_empty() {
    let store = MockStore::with_records(vec![record("110001", "Dengue", 12, "2024-01-01")]);
    let rows = find_by_pincode(&store, "999999", None).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn delete_outbreak_removes_existing_record() {
    let existing = record("110001", "Dengue", 12, "2024-01-01");
    let id: Uuid = existing.id.parse().unwrap();
    let store = MockStore::with_records(vec![existing]);

    delete_outbreak(&store, id).await.unwrap();
    assert!(store.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_outbreak_missing_is_not_found() {
    let store = MockStore::default();
    let id = Uuid::new_v4();
    let err = delete_outbreak(&store, id).await.unwrap_err();
    assert!(matches!(err, OutbreakError::NotFound(missing) if missing == id));
}
