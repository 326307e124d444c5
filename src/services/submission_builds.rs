use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::time::primitive_now_utc;
use crate::db::models::Submission;
use crate::db::types::WAITING_FOR_RESOURCES;
use crate::repositories;

/// Creates the build artifact a submission needs before it can be graded.
#[async_trait]
pub(crate) trait BuildInitializer: Send + Sync {
    /// Returns the new build id, or `None` when the submission already had a
    /// build or was reaped by the time the claim ran.
    async fn init_submission(&self, submission: &Submission) -> Result<Option<String>>;

    /// Undoes [`init_submission`](Self::init_submission) if `build_id` is still
    /// the submission's current build.
    async fn release_build(&self, submission_id: &str, build_id: &str) -> Result<bool>;
}

#[derive(Clone)]
pub(crate) struct PgBuildInitializer {
    pool: PgPool,
}

impl PgBuildInitializer {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BuildInitializer for PgBuildInitializer {
    async fn init_submission(&self, submission: &Submission) -> Result<Option<String>> {
        let now = primitive_now_utc();
        let build_id = uuid::Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await.context("Failed to start build transaction")?;

        repositories::submission_builds::insert(&mut tx, &build_id, &submission.id, now)
            .await
            .context("Failed to insert submission build")?;

        let claimed = repositories::submissions::claim_build(
            &mut tx,
            &submission.id,
            &build_id,
            WAITING_FOR_RESOURCES,
            now,
        )
        .await
        .context("Failed to claim submission build")?;

        if !claimed {
            tx.rollback().await.context("Failed to roll back unclaimed build")?;
            return Ok(None);
        }

        let test_ids = repositories::assignments::list_test_ids(&mut tx, &submission.assignment_id)
            .await
            .context("Failed to list assignment tests")?;
        repositories::submission_builds::reset_test_results(&mut tx, &submission.id, &test_ids, now)
            .await
            .context("Failed to reset submission test results")?;

        tx.commit().await.context("Failed to commit submission build")?;

        Ok(Some(build_id))
    }

    async fn release_build(&self, submission_id: &str, build_id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await.context("Failed to start release transaction")?;

        let released = repositories::submissions::release_build(&mut tx, submission_id, build_id)
            .await
            .context("Failed to clear submission build")?;
        if released {
            repositories::submission_builds::delete(&mut tx, build_id)
                .await
                .context("Failed to delete released build")?;
        }

        tx.commit().await.context("Failed to commit build release")?;

        Ok(released)
    }
}
