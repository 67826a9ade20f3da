//! Admin CSV ingestion.
//!
//! DESIGN
//! ======
//! The client parses the file and posts `{"data": [row, ...]}`. This service
//! trusts none of it: every field is re-coerced here before the batch insert.
//!
//! ERROR HANDLING
//! ==============
//! Checks run in a fixed order and each precedes any `disease_data` access:
//! authentication, admin role, payload shape. Storage failures surface the
//! database error text and roll back the whole batch.

use serde_json::Value;
use wire::parse_leading_int;

use super::outbreak::{AppRole, NewOutbreak, OutbreakStore};
use super::session::SessionUser;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Unauthorized")]
    Unauthenticated,
    #[error("Admin access required")]
    Forbidden,
    #[error("Invalid CSV data")]
    InvalidPayload,
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Authorize the caller, validate `body`, and insert its rows.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// See [`IngestError`]. No rows are written unless every check passes.
pub async fn ingest(
    store: &dyn OutbreakStore,
    caller: Option<&SessionUser>,
    body: &[u8],
) -> Result<usize, IngestError> {
    let user = caller.ok_or(IngestError::Unauthenticated)?;

    match store.has_role(user.id, AppRole::Admin).await {
        Ok(true) => {}
        Ok(false) => return Err(IngestError::Forbidden),
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "role lookup failed; denying upload");
            return Err(IngestError::Forbidden);
        }
    }

    let rows = parse_payload(body)?;
    let records: Vec<NewOutbreak> = rows.iter().map(normalize_row).collect();
    let count = store.insert_batch(&records).await?;

    tracing::info!(user_id = %user.id, count, "outbreak rows ingested");
    Ok(count)
}

/// Extract the non-empty `data` array from a JSON body.
///
/// # Errors
///
/// [`IngestError::InvalidPayload`] for invalid JSON, a missing or non-array
/// `data`, or an empty array.
pub fn parse_payload(body: &[u8]) -> Result<Vec<Value>, IngestError> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| IngestError::InvalidPayload)?;
    match payload.get("data") {
        Some(Value::Array(rows)) if !rows.is_empty() => Ok(rows.clone()),
        _ => Err(IngestError::InvalidPayload),
    }
}

// =============================================================================
// COERCION
// =============================================================================

/// Normalize one submitted row. Non-object rows yield all-empty fields.
#[must_use]
pub fn normalize_row(row: &Value) -> NewOutbreak {
    NewOutbreak {
        pincode: coerce_text(row.get("pincode")),
        disease_name: coerce_text(row.get("disease_name")),
        cases: coerce_cases(row.get("cases")),
        date: coerce_date(row.get("date")),
        advice: coerce_text(row.get("advice")),
    }
}

/// Text for a loosely typed field. Missing, null, false, zero and empty
/// values become `""`; strings are trimmed.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(Value::Bool(true)) => "true".to_owned(),
        Some(Value::Number(n)) => number_text(n),
        _ => String::new(),
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return if i == 0 { String::new() } else { i.to_string() };
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 || !f.is_finite() => String::new(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => String::new(),
    }
}

/// Case count: leading integer of the value's text, else 0. Negative counts
/// clamp to 0.
fn coerce_cases(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().and_then(truncate_f64)),
        Some(Value::String(s)) => parse_leading_int(s),
        _ => None,
    };
    parsed.unwrap_or(0).max(0)
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_f64(f: f64) -> Option<i64> {
    (f.is_finite() && f.abs() < 9.0e18).then(|| f.trunc() as i64)
}

/// Date text passed through for Postgres to parse. Blank or non-string
/// values become `None`, which the `NOT NULL` column rejects.
fn coerce_date(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
