//! Outbreak storage and queries.
//!
//! DESIGN
//! ======
//! All `disease_data` and `user_roles` access goes through the
//! [`OutbreakStore`] trait so the ingestion and admin flows can be exercised
//! against an in-memory mock. [`PgOutbreakStore`] is the production backend.
//!
//! Dates are rendered as `YYYY-MM-DD` in SQL (`to_char`) and row IDs as text,
//! so records map straight onto [`wire::OutbreakRecord`].

use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;
use wire::{OutbreakRecord, PincodeError};

/// Rows per `INSERT` statement. Five binds each keeps a chunk well under the
/// Postgres bind-parameter ceiling.
const INSERT_CHUNK_ROWS: usize = 1000;

// =============================================================================
// TYPES
// =============================================================================

/// Role names stored in `user_roles.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRole {
    Admin,
    User,
}

impl AppRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// A normalized row ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOutbreak {
    pub pincode: String,
    pub disease_name: String,
    pub cases: i64,
    /// Raw date text; Postgres parses it, so a bad value fails the batch.
    pub date: Option<String>,
    pub advice: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OutbreakError {
    #[error(transparent)]
    InvalidPincode(#[from] PincodeError),
    #[error("outbreak record not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Storage boundary for outbreak data and role checks.
#[async_trait::async_trait]
pub trait OutbreakStore: Send + Sync {
    /// Whether `user_id` holds `role` in `user_roles`.
    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, sqlx::Error>;

    /// Insert every row atomically; returns the number inserted.
    async fn insert_batch(&self, rows: &[NewOutbreak]) -> Result<usize, sqlx::Error>;

    /// Records for one pincode, newest first.
    async fn list_by_pincode(&self, pincode: &str, limit: Option<i64>) -> Result<Vec<OutbreakRecord>, sqlx::Error>;

    /// Latest records across all pincodes.
    async fn list_recent(&self, limit: i64) -> Result<Vec<OutbreakRecord>, sqlx::Error>;

    /// Every record, newest first.
    async fn list_all(&self) -> Result<Vec<OutbreakRecord>, sqlx::Error>;

    /// Delete one record; `false` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

// =============================================================================
// POSTGRES BACKEND
// =============================================================================

pub struct PgOutbreakStore {
    pool: PgPool,
}

impl PgOutbreakStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_RECORD: &str = "SELECT id::text AS id, pincode, disease_name, cases,
        to_char(date, 'YYYY-MM-DD') AS date, advice
     FROM disease_data";

fn record_from_row(row: &sqlx::postgres::PgRow) -> OutbreakRecord {
    OutbreakRecord {
        id: row.get("id"),
        pincode: row.get("pincode"),
        disease_name: row.get("disease_name"),
        cases: row.get("cases"),
        date: row.get("date"),
        advice: row.get("advice"),
    }
}

#[async_trait::async_trait]
impl OutbreakStore for PgOutbreakStore {
    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2) AS has_role")
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("has_role"))
    }

    async fn insert_batch(&self, rows: &[NewOutbreak]) -> Result<usize, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted: u64 = 0;
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = QueryBuilder::new("INSERT INTO disease_data (pincode, disease_name, cases, date, advice) ");
            builder.push_values(chunk, |mut b, row| {
                b.push_bind(&row.pincode)
                    .push_bind(&row.disease_name)
                    .push_bind(row.cases)
                    .push_bind(&row.date)
                    .push_unseparated("::date")
                    .push_bind(&row.advice);
            });
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        Ok(usize::try_from(inserted).unwrap_or(usize::MAX))
    }

    async fn list_by_pincode(&self, pincode: &str, limit: Option<i64>) -> Result<Vec<OutbreakRecord>, sqlx::Error> {
        let mut builder = QueryBuilder::new(SELECT_RECORD);
        builder.push(" WHERE pincode = ");
        builder.push_bind(pincode);
        builder.push(" ORDER BY date DESC, created_at DESC");
        if let Some(limit) = limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }
        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<OutbreakRecord>, sqlx::Error> {
        let rows = sqlx::query(&format!("{SELECT_RECORD} ORDER BY date DESC, created_at DESC LIMIT $1"))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn list_all(&self) -> Result<Vec<OutbreakRecord>, sqlx::Error> {
        let rows = sqlx::query(&format!("{SELECT_RECORD} ORDER BY date DESC, created_at DESC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM disease_data WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// SERVICE OPERATIONS
// =============================================================================

/// Look up alerts for a user-supplied pincode.
///
/// # Errors
///
/// [`OutbreakError::InvalidPincode`] before any query when the pincode is
/// blank or not six digits; [`OutbreakError::Database`] on query failure.
pub async fn find_by_pincode(
    store: &dyn OutbreakStore,
    raw_pincode: &str,
    limit: Option<i64>,
) -> Result<Vec<OutbreakRecord>, OutbreakError> {
    let pincode = wire::validate_pincode(raw_pincode)?;
    let limit = limit.map(|n| n.max(0));
    Ok(store.list_by_pincode(pincode, limit).await?)
}

/// Delete one outbreak record by ID.
///
/// # Errors
///
/// [`OutbreakError::NotFound`] when no row has `id`.
pub async fn delete_outbreak(store: &dyn OutbreakStore, id: Uuid) -> Result<(), OutbreakError> {
    if store.delete(id).await? {
        tracing::info!(%id, "outbreak record deleted");
        Ok(())
    } else {
        Err(OutbreakError::NotFound(id))
    }
}

#[cfg(test)]
#[path = "outbreak_test.rs"]
mod tests;
