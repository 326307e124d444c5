use std::sync::Arc;

use anyhow::{Context, Result};

use super::report::{ItemOutcome, Outcome};
use super::store::ReaperStore;
use super::window::ReconciliationWindow;
use crate::db::models::{Assignment, Submission};
use crate::services::job_queue::JobQueue;
use crate::services::submission_builds::BuildInitializer;

#[derive(Debug, Default)]
pub(crate) struct BuildReconciliation {
    pub(crate) assignments: Vec<Assignment>,
    pub(crate) enqueued: Vec<String>,
    pub(crate) outcomes: Vec<ItemOutcome>,
}

enum Rebuild {
    Enqueued,
    AlreadyClaimed,
}

/// Gives every unbuilt submission of an active assignment a build and a
/// place in the autograde pipeline.
pub(crate) struct AssignmentBuildReconciler {
    store: Arc<dyn ReaperStore>,
    builds: Arc<dyn BuildInitializer>,
    queue: Arc<dyn JobQueue>,
}

impl AssignmentBuildReconciler {
    pub(crate) fn new(
        store: Arc<dyn ReaperStore>,
        builds: Arc<dyn BuildInitializer>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self { store, builds, queue }
    }

    pub(crate) async fn reconcile_builds(
        &self,
        window: &ReconciliationWindow,
    ) -> Result<BuildReconciliation> {
        let assignments = self.store.list_active_assignments(window).await?;
        let mut result = BuildReconciliation::default();

        for assignment in &assignments {
            let submissions = match self.store.list_unbuilt_submissions(&assignment.id).await {
                Ok(submissions) => submissions,
                Err(err) => {
                    tracing::error!(
                        assignment_id = %assignment.id,
                        error = ?err,
                        "Failed to list unbuilt submissions"
                    );
                    result.outcomes.push(ItemOutcome::new(&assignment.id, Outcome::failed(&err)));
                    continue;
                }
            };

            let pending =
                submissions.iter().filter(|item| item.build_id.is_none() && !item.is_reaped());
            for submission in pending {
                let outcome = match self.rebuild(submission).await {
                    Ok(Rebuild::Enqueued) => {
                        result.enqueued.push(submission.id.clone());
                        Outcome::reconciled("build initialized and enqueued")
                    }
                    Ok(Rebuild::AlreadyClaimed) => {
                        Outcome::skipped("build initialized by a concurrent sweep")
                    }
                    Err(err) => {
                        tracing::error!(
                            submission_id = %submission.id,
                            assignment_id = %assignment.id,
                            error = ?err,
                            "Failed to rebuild submission"
                        );
                        Outcome::failed(&err)
                    }
                };
                result.outcomes.push(ItemOutcome::new(&submission.id, outcome));
            }
        }

        if !result.enqueued.is_empty() {
            tracing::info!(
                assignments = assignments.len(),
                enqueued = ?result.enqueued,
                "Enqueued submissions for autograding"
            );
            metrics::counter!("reaper_builds_enqueued_total")
                .increment(result.enqueued.len() as u64);
        }

        result.assignments = assignments;
        Ok(result)
    }

    /// Enqueues only when this call won the build claim. A failed enqueue
    /// gives the claim back so the next sweep retries the submission.
    async fn rebuild(&self, submission: &Submission) -> Result<Rebuild> {
        let Some(build_id) = self
            .builds
            .init_submission(submission)
            .await
            .context("Failed to initialize submission build")?
        else {
            return Ok(Rebuild::AlreadyClaimed);
        };

        if let Err(err) = self.queue.enqueue_autograde_pipeline(&submission.id).await {
            match self.builds.release_build(&submission.id, &build_id).await {
                Ok(released) => tracing::warn!(
                    submission_id = %submission.id,
                    build_id = %build_id,
                    released,
                    "Released build after enqueue failure"
                ),
                Err(release_err) => tracing::error!(
                    submission_id = %submission.id,
                    build_id = %build_id,
                    error = ?release_err,
                    "Failed to release build after enqueue failure"
                ),
            }
            return Err(err.context("Failed to enqueue autograde pipeline"));
        }

        Ok(Rebuild::Enqueued)
    }
}
