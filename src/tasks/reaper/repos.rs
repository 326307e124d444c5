use std::sync::Arc;

use anyhow::{Context, Result};

use super::report::{ItemOutcome, Outcome};
use super::store::ReaperStore;
use super::ReaperConfig;
use crate::db::models::Course;
use crate::services::github::{parse_org_name, RepoDirectory};
use crate::services::repo_repair::RepoRepair;

/// Finds repositories that exist on the hosting side but were never recorded
/// internally, and hands them to [`RepoRepair`].
pub(crate) struct RepoReconciler {
    store: Arc<dyn ReaperStore>,
    directory: Arc<dyn RepoDirectory>,
    repair: Arc<dyn RepoRepair>,
    org_host: String,
}

impl RepoReconciler {
    pub(crate) fn new(
        store: Arc<dyn ReaperStore>,
        directory: Arc<dyn RepoDirectory>,
        repair: Arc<dyn RepoRepair>,
        config: &ReaperConfig,
    ) -> Self {
        Self { store, directory, repair, org_host: config.org_host.clone() }
    }

    /// Reconciles every course. A failing course is recorded and never stops
    /// the ones after it.
    pub(crate) async fn reconcile_all(&self) -> Result<Vec<ItemOutcome>> {
        let courses = self.store.list_courses().await?;
        let mut outcomes = Vec::with_capacity(courses.len());

        for course in &courses {
            let outcome = match self.reconcile_org(course).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(
                        course_id = %course.id,
                        error = ?err,
                        "Repository reconciliation failed for course"
                    );
                    metrics::counter!("reaper_courses_failed_total").increment(1);
                    Outcome::failed(&err)
                }
            };
            outcomes.push(ItemOutcome::new(course.id.clone(), outcome));
        }

        Ok(outcomes)
    }

    pub(crate) async fn reconcile_org(&self, course: &Course) -> Result<Outcome> {
        let org_name = match parse_org_name(course.org_url.as_deref(), &self.org_host) {
            Ok(org_name) => org_name,
            Err(err) => {
                tracing::info!(
                    course_id = %course.id,
                    reason = %err,
                    "Skipping repository reconciliation for course"
                );
                return Ok(Outcome::skipped(err.to_string()));
            }
        };

        let hosted = self
            .directory
            .list_org_repos(&org_name)
            .await
            .with_context(|| format!("Failed to list hosted repositories for {org_name}"))?;
        let known = self.store.list_known_repos(&org_name).await?;

        let missing: Vec<String> = hosted.difference(&known).cloned().collect();
        if missing.is_empty() {
            return Ok(Outcome::reconciled(format!(
                "{org_name}: {} repositories already recorded",
                hosted.len()
            )));
        }

        let summary = self
            .repair
            .create_missing_repo_records(&org_name, &missing)
            .await
            .with_context(|| format!("Failed to repair repository records for {org_name}"))?;

        tracing::warn!(
            course_id = %course.id,
            org_name = %org_name,
            missing = missing.len(),
            created = summary.created,
            unmatched = summary.unmatched,
            "Created missing repository records"
        );
        metrics::counter!("reaper_repos_repaired_total").increment(summary.created as u64);

        Ok(Outcome::reconciled(format!(
            "{org_name}: {} missing, {} created, {} unmatched",
            missing.len(),
            summary.created,
            summary.unmatched
        )))
    }
}
