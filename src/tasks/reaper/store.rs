use std::collections::BTreeSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use super::window::ReconciliationWindow;
use crate::db::models::{Assignment, Course, Submission};
use crate::repositories;

/// Reads and bulk updates the reconcilers run against the submission store.
#[async_trait]
pub(crate) trait ReaperStore: Send + Sync {
    async fn reap_stale_submissions(
        &self,
        stale_before: PrimitiveDateTime,
        excluded_state: &str,
        reason: &str,
    ) -> Result<u64>;

    async fn list_courses(&self) -> Result<Vec<Course>>;

    async fn list_known_repos(&self, org_name: &str) -> Result<BTreeSet<String>>;

    async fn list_active_assignments(&self, window: &ReconciliationWindow)
        -> Result<Vec<Assignment>>;

    async fn list_unbuilt_submissions(&self, assignment_id: &str) -> Result<Vec<Submission>>;
}

#[derive(Clone)]
pub(crate) struct PgReaperStore {
    pool: PgPool,
}

impl PgReaperStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReaperStore for PgReaperStore {
    async fn reap_stale_submissions(
        &self,
        stale_before: PrimitiveDateTime,
        excluded_state: &str,
        reason: &str,
    ) -> Result<u64> {
        repositories::submissions::reap_stale(&self.pool, stale_before, excluded_state, reason)
            .await
            .context("Failed to mark stale submissions as processed")
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        repositories::courses::list_all(&self.pool).await.context("Failed to fetch courses")
    }

    async fn list_known_repos(&self, org_name: &str) -> Result<BTreeSet<String>> {
        let names = repositories::assignment_repos::list_names_by_org(&self.pool, org_name)
            .await
            .with_context(|| format!("Failed to fetch known repositories for org {org_name}"))?;
        Ok(names.into_iter().collect())
    }

    async fn list_active_assignments(
        &self,
        window: &ReconciliationWindow,
    ) -> Result<Vec<Assignment>> {
        repositories::assignments::list_active(&self.pool, window.now, window.due_after)
            .await
            .context("Failed to fetch active assignments")
    }

    async fn list_unbuilt_submissions(&self, assignment_id: &str) -> Result<Vec<Submission>> {
        repositories::submissions::list_unbuilt_by_assignment(&self.pool, assignment_id)
            .await
            .with_context(|| format!("Failed to fetch unbuilt submissions for {assignment_id}"))
    }
}
