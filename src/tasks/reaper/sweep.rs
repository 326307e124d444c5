use std::sync::Arc;

use anyhow::Result;
use time::{Duration, PrimitiveDateTime};

use super::builds::AssignmentBuildReconciler;
use super::report::{
    SweepReport, STEP_BUILDS, STEP_REPOS, STEP_RESOURCE_REAP, STEP_SCORES,
    STEP_STALE_SUBMISSIONS,
};
use super::repos::RepoReconciler;
use super::scores::ScoreReconciler;
use super::stale::TimeoutReaper;
use super::store::{PgReaperStore, ReaperStore};
use super::window::ReconciliationWindow;
use super::ReaperConfig;
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::services::autograde::{BulkAutograder, PgBulkAutograder};
use crate::services::github::{GithubClient, RepoDirectory};
use crate::services::job_queue::{JobQueue, RedisJobQueue};
use crate::services::repo_repair::{PgRepoRepair, RepoRepair};
use crate::services::submission_builds::{BuildInitializer, PgBuildInitializer};

/// External systems a sweep talks to.
pub(crate) struct Collaborators {
    pub(crate) store: Arc<dyn ReaperStore>,
    pub(crate) directory: Arc<dyn RepoDirectory>,
    pub(crate) repair: Arc<dyn RepoRepair>,
    pub(crate) builds: Arc<dyn BuildInitializer>,
    pub(crate) autograder: Arc<dyn BulkAutograder>,
    pub(crate) queue: Arc<dyn JobQueue>,
}

pub(crate) struct Sweep {
    queue: Arc<dyn JobQueue>,
    stale: TimeoutReaper,
    repos: RepoReconciler,
    builds: AssignmentBuildReconciler,
    scores: ScoreReconciler,
    stats_reap_duration: Duration,
}

impl Sweep {
    pub(crate) fn new(config: &ReaperConfig, deps: Collaborators) -> Self {
        Self {
            stale: TimeoutReaper::new(deps.store.clone(), config),
            repos: RepoReconciler::new(deps.store.clone(), deps.directory, deps.repair, config),
            builds: AssignmentBuildReconciler::new(deps.store, deps.builds, deps.queue.clone()),
            scores: ScoreReconciler::new(deps.autograder),
            queue: deps.queue,
            stats_reap_duration: config.stats_reap_duration,
        }
    }

    pub(crate) fn from_state(state: &AppState) -> Result<Self> {
        let settings = state.settings();
        let config = ReaperConfig::from_settings(settings);
        let pool = state.db().clone();

        let deps = Collaborators {
            store: Arc::new(PgReaperStore::new(pool.clone())),
            directory: Arc::new(GithubClient::from_settings(settings)?),
            repair: Arc::new(PgRepoRepair::new(pool.clone(), config.org_host.clone())),
            builds: Arc::new(PgBuildInitializer::new(pool.clone())),
            autograder: Arc::new(PgBulkAutograder::new(pool)),
            queue: Arc::new(RedisJobQueue::new(
                state.redis().clone(),
                settings.reaper().queue_prefix.clone(),
            )),
        };

        Ok(Self::new(&config, deps))
    }

    pub(crate) async fn run(&self) -> SweepReport {
        self.run_at(primitive_now_utc()).await
    }

    /// Runs every step in order. A failed step is recorded in the report and
    /// the sweep moves on.
    #[tracing::instrument(name = "reaper_sweep", skip_all, fields(now = %format_primitive(now)))]
    pub(crate) async fn run_at(&self, now: PrimitiveDateTime) -> SweepReport {
        let mut report = SweepReport::new(now);

        match self.queue.enqueue_stale_resource_reap().await {
            Ok(()) => report.step_ok(STEP_RESOURCE_REAP, "stale resource reap enqueued"),
            Err(err) => report.step_failed(STEP_RESOURCE_REAP, &err),
        }

        match self.stale.reap_stale(now).await {
            Ok(reaped) => {
                report.stale_reaped = reaped;
                report.step_ok(STEP_STALE_SUBMISSIONS, format!("{reaped} submissions reaped"));
            }
            Err(err) => report.step_failed(STEP_STALE_SUBMISSIONS, &err),
        }

        match self.repos.reconcile_all().await {
            Ok(courses) => {
                report.step_ok(STEP_REPOS, format!("{} courses checked", courses.len()));
                report.courses = courses;
            }
            Err(err) => report.step_failed(STEP_REPOS, &err),
        }

        let window = ReconciliationWindow::ending_at(now, self.stats_reap_duration);
        let assignments = match self.builds.reconcile_builds(&window).await {
            Ok(builds) => {
                report.step_ok(
                    STEP_BUILDS,
                    format!(
                        "{} assignments active, {} submissions enqueued",
                        builds.assignments.len(),
                        builds.enqueued.len()
                    ),
                );
                report.submissions = builds.outcomes;
                report.enqueued = builds.enqueued;
                builds.assignments
            }
            Err(err) => {
                report.step_failed(STEP_BUILDS, &err);
                Vec::new()
            }
        };

        report.assignments = self.scores.reconcile_scores(&assignments).await;
        let attempted = report.assignments.len();
        let failed = report.assignments.iter().filter(|item| item.is_failure()).count();
        if attempted > 0 && failed == attempted {
            let err = anyhow::anyhow!("bulk autograde failed for all {attempted} assignments");
            report.step_failed(STEP_SCORES, &err);
        } else {
            let scored = attempted - failed;
            report.step_ok(STEP_SCORES, format!("{scored} of {attempted} assignments scored"));
        }

        metrics::counter!("reaper_sweeps_total").increment(1);

        report
    }
}
