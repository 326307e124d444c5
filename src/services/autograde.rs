use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::time::primitive_now_utc;
use crate::repositories;

/// Re-scores every student of an assignment. Must be safe to call repeatedly.
#[async_trait]
pub(crate) trait BulkAutograder: Send + Sync {
    /// Returns the number of per-student results written.
    async fn bulk_autograde(&self, assignment_id: &str) -> Result<u64>;
}

#[derive(Clone)]
pub(crate) struct PgBulkAutograder {
    pool: PgPool,
}

impl PgBulkAutograder {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BulkAutograder for PgBulkAutograder {
    async fn bulk_autograde(&self, assignment_id: &str) -> Result<u64> {
        repositories::autograde_results::refresh_for_assignment(
            &self.pool,
            assignment_id,
            primitive_now_utc(),
        )
        .await
        .with_context(|| format!("Failed to refresh autograde results for {assignment_id}"))
    }
}
