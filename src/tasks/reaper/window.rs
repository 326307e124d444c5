use time::{Duration, PrimitiveDateTime};

use crate::db::models::Assignment;

/// Assignments stay eligible for reconciliation from release until
/// `stats_reap_duration` after their due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReconciliationWindow {
    pub(crate) now: PrimitiveDateTime,
    pub(crate) due_after: PrimitiveDateTime,
}

impl ReconciliationWindow {
    pub(crate) fn ending_at(now: PrimitiveDateTime, stats_reap_duration: Duration) -> Self {
        let due_after = now.checked_sub(stats_reap_duration).unwrap_or(PrimitiveDateTime::MIN);
        Self { now, due_after }
    }

    pub(crate) fn contains(&self, assignment: &Assignment) -> bool {
        assignment.release_date <= self.now && assignment.due_date > self.due_after
    }
}
