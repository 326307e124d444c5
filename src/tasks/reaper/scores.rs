use std::sync::Arc;

use super::report::{ItemOutcome, Outcome};
use crate::db::models::Assignment;
use crate::services::autograde::BulkAutograder;

/// Recomputes aggregate scores for assignments, whether or not anything was
/// rebuilt for them this sweep.
pub(crate) struct ScoreReconciler {
    autograder: Arc<dyn BulkAutograder>,
}

impl ScoreReconciler {
    pub(crate) fn new(autograder: Arc<dyn BulkAutograder>) -> Self {
        Self { autograder }
    }

    pub(crate) async fn reconcile_scores(&self, assignments: &[Assignment]) -> Vec<ItemOutcome> {
        let mut outcomes = Vec::with_capacity(assignments.len());

        for assignment in assignments {
            let outcome = match self.autograder.bulk_autograde(&assignment.id).await {
                Ok(refreshed) => {
                    metrics::counter!("reaper_bulk_autograde_total").increment(1);
                    Outcome::reconciled(format!("{refreshed} results refreshed"))
                }
                Err(err) => {
                    tracing::error!(
                        assignment_id = %assignment.id,
                        error = ?err,
                        "Bulk autograde failed"
                    );
                    Outcome::failed(&err)
                }
            };
            outcomes.push(ItemOutcome::new(&assignment.id, outcome));
        }

        outcomes
    }
}
