use serde::Serialize;
use time::PrimitiveDateTime;

use crate::core::time::format_primitive;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum Outcome {
    Reconciled { detail: String },
    Skipped { reason: String },
    Failed { error: String },
}

impl Outcome {
    pub(crate) fn reconciled(detail: impl Into<String>) -> Self {
        Self::Reconciled { detail: detail.into() }
    }

    pub(crate) fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped { reason: reason.into() }
    }

    pub(crate) fn failed(err: &anyhow::Error) -> Self {
        Self::Failed { error: format!("{err:#}") }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ItemOutcome {
    pub(crate) item_id: String,
    #[serde(flatten)]
    pub(crate) outcome: Outcome,
}

impl ItemOutcome {
    pub(crate) fn new(item_id: impl Into<String>, outcome: Outcome) -> Self {
        Self { item_id: item_id.into(), outcome }
    }

    pub(crate) fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }

    pub(crate) fn is_skipped(&self) -> bool {
        matches!(self.outcome, Outcome::Skipped { .. })
    }
}

pub(crate) const STEP_RESOURCE_REAP: &str = "resource_reap";
pub(crate) const STEP_STALE_SUBMISSIONS: &str = "stale_submissions";
pub(crate) const STEP_REPOS: &str = "repos";
pub(crate) const STEP_BUILDS: &str = "builds";
pub(crate) const STEP_SCORES: &str = "scores";

/// Everything one sweep did, item by item. Failures are data here, never errors.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SweepReport {
    pub(crate) started_at: String,
    pub(crate) steps: Vec<ItemOutcome>,
    pub(crate) stale_reaped: u64,
    pub(crate) courses: Vec<ItemOutcome>,
    pub(crate) submissions: Vec<ItemOutcome>,
    pub(crate) enqueued: Vec<String>,
    pub(crate) assignments: Vec<ItemOutcome>,
}

impl SweepReport {
    pub(crate) fn new(now: PrimitiveDateTime) -> Self {
        Self {
            started_at: format_primitive(now),
            steps: Vec::new(),
            stale_reaped: 0,
            courses: Vec::new(),
            submissions: Vec::new(),
            enqueued: Vec::new(),
            assignments: Vec::new(),
        }
    }

    pub(crate) fn step_ok(&mut self, step: &'static str, detail: impl Into<String>) {
        self.steps.push(ItemOutcome::new(step, Outcome::reconciled(detail)));
    }

    pub(crate) fn step_failed(&mut self, step: &'static str, err: &anyhow::Error) {
        tracing::error!(step, error = ?err, "Reaper step failed; continuing with the next step");
        self.steps.push(ItemOutcome::new(step, Outcome::failed(err)));
    }

    #[cfg(test)]
    pub(crate) fn step(&self, step: &str) -> Option<&Outcome> {
        self.steps.iter().find(|item| item.item_id == step).map(|item| &item.outcome)
    }

    pub(crate) fn failure_count(&self) -> usize {
        [&self.steps, &self.courses, &self.submissions, &self.assignments]
            .into_iter()
            .flatten()
            .filter(|item| item.is_failure())
            .count()
    }

    pub(crate) fn log(&self) {
        let courses_skipped = self.courses.iter().filter(|item| item.is_skipped()).count();

        tracing::info!(
            started_at = %self.started_at,
            stale_reaped = self.stale_reaped,
            courses = self.courses.len(),
            courses_skipped,
            enqueued = self.enqueued.len(),
            assignments_scored = self.assignments.len(),
            failures = self.failure_count(),
            "Reaper sweep finished"
        );

        match serde_json::to_string(self) {
            Ok(json) => tracing::debug!(report = %json, "Reaper sweep report"),
            Err(err) => tracing::warn!(error = %err, "Failed to serialize sweep report"),
        }
    }
}
