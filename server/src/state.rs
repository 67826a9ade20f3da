//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool for session lookups, the outbreak store, the
//! optional chat provider, and the chat rate limiter.

use std::sync::Arc;

use sqlx::PgPool;

use crate::llm::ChatUpstream;
use crate::rate_limit::RateLimiter;
use crate::services::outbreak::{OutbreakStore, PgOutbreakStore};

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub outbreaks: Arc<dyn OutbreakStore>,
    /// Optional chat provider. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn ChatUpstream>>,
    /// In-memory rate limiter for chat requests.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, llm: Option<Arc<dyn ChatUpstream>>) -> Self {
        let outbreaks: Arc<dyn OutbreakStore> = Arc::new(PgOutbreakStore::new(pool.clone()));
        Self { pool, outbreaks, llm, rate_limiter: RateLimiter::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
