//! Session lookup.
//!
//! ARCHITECTURE
//! ============
//! Sessions are issued by the external identity platform, which writes rows
//! into `sessions`. This service only resolves a presented token to its user;
//! issuing, refreshing, and revoking tokens happen elsewhere.

use sqlx::{PgPool, Row};
use uuid::Uuid;

/// User row returned from session validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SessionUser {
    /// Unique user identifier.
    pub id: Uuid,
    /// Sign-in email, if the identity platform recorded one.
    pub email: Option<String>,
    /// Display name, if set.
    pub full_name: Option<String>,
}

/// Validate a session token and return the associated user.
///
/// Expired sessions resolve to `None`, the same as unknown tokens.
///
/// # Errors
///
/// Returns the underlying database error if the lookup fails.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    if token.is_empty() {
        return Ok(None);
    }

    let row = sqlx::query(
        r"SELECT u.id, u.email, u.full_name
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionUser { id: r.get("id"), email: r.get("email"), full_name: r.get("full_name") }))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
