use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::time::primitive_now_utc;
use crate::repositories;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RepairSummary {
    pub(crate) created: usize,
    pub(crate) unmatched: usize,
}

/// Creates internal records for hosted repositories the system never saw.
#[async_trait]
pub(crate) trait RepoRepair: Send + Sync {
    async fn create_missing_repo_records(
        &self,
        org_name: &str,
        missing: &[String],
    ) -> Result<RepairSummary>;
}

#[derive(Clone)]
pub(crate) struct PgRepoRepair {
    pool: PgPool,
    host: String,
}

impl PgRepoRepair {
    pub(crate) fn new(pool: PgPool, host: impl Into<String>) -> Self {
        Self { pool, host: host.into() }
    }
}

#[async_trait]
impl RepoRepair for PgRepoRepair {
    async fn create_missing_repo_records(
        &self,
        org_name: &str,
        missing: &[String],
    ) -> Result<RepairSummary> {
        let now = primitive_now_utc();
        let org_url = format!("https://{}/{org_name}", self.host);
        let mut summary = RepairSummary::default();

        for repo_name in missing {
            let repo_url = format!("{org_url}/{repo_name}");
            let created = repositories::assignment_repos::create_for_repo_name(
                &self.pool,
                repositories::assignment_repos::CreateAssignmentRepo {
                    id: &uuid::Uuid::new_v4().to_string(),
                    org_name,
                    org_url: &org_url,
                    repo_name,
                    repo_url: &repo_url,
                    created_at: now,
                },
            )
            .await
            .with_context(|| format!("Failed to create repo record for {org_name}/{repo_name}"))?;

            if created {
                summary.created += 1;
            } else {
                tracing::debug!(
                    org_name,
                    repo_name = %repo_name,
                    "No assignment/user matches repository"
                );
                summary.unmatched += 1;
            }
        }

        Ok(summary)
    }
}
