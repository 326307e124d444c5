use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    describe();
    Ok(())
}

fn describe() {
    metrics::describe_counter!("reaper_sweeps_total", "Completed reconciliation sweeps");
    metrics::describe_counter!(
        "submissions_reaped_total",
        "Submissions moved to a terminal state after timing out"
    );
    metrics::describe_counter!(
        "reaper_courses_failed_total",
        "Courses whose repository reconciliation failed"
    );
    metrics::describe_counter!(
        "reaper_repos_repaired_total",
        "Repository records created for repos missing internally"
    );
    metrics::describe_counter!(
        "reaper_builds_enqueued_total",
        "Submissions initialized and sent to the autograde pipeline"
    );
    metrics::describe_counter!(
        "reaper_bulk_autograde_total",
        "Assignments re-scored by bulk autograde"
    );
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

/// One-shot runs have no scrape endpoint, so the final snapshot goes to the log.
pub(crate) fn log_snapshot() {
    if let Some(rendered) = render() {
        tracing::debug!(metrics = %rendered, "Reaper metrics snapshot");
    }
}
