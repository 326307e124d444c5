use std::sync::Arc;

use anyhow::Result;
use time::{Duration, PrimitiveDateTime};

use super::store::ReaperStore;
use super::ReaperConfig;
use crate::core::time::format_primitive;
use crate::db::types::REAPED_AFTER_TIMEOUT;

/// Retires submissions whose pipeline stopped reporting progress.
pub(crate) struct TimeoutReaper {
    store: Arc<dyn ReaperStore>,
    timeout_threshold: Duration,
    excluded_state: String,
}

impl TimeoutReaper {
    pub(crate) fn new(store: Arc<dyn ReaperStore>, config: &ReaperConfig) -> Self {
        Self {
            store,
            timeout_threshold: config.timeout_threshold,
            excluded_state: config.excluded_state.clone(),
        }
    }

    /// Returns how many submissions this call moved to the reaped state.
    pub(crate) async fn reap_stale(&self, now: PrimitiveDateTime) -> Result<u64> {
        let stale_before =
            now.checked_sub(self.timeout_threshold).unwrap_or(PrimitiveDateTime::MIN);

        let reaped = self
            .store
            .reap_stale_submissions(stale_before, &self.excluded_state, REAPED_AFTER_TIMEOUT)
            .await?;

        if reaped > 0 {
            tracing::warn!(
                reaped,
                stale_before = %format_primitive(stale_before),
                "Reaped stale submissions"
            );
        }
        metrics::counter!("submissions_reaped_total").increment(reaped);

        Ok(reaped)
    }
}
