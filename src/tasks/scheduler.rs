use anyhow::Result;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::core::state::AppState;
use crate::tasks::reaper::Sweep;

/// Sweeps on a fixed interval until a shutdown signal arrives. A sweep in
/// progress finishes before the loop exits.
pub(crate) async fn run(state: AppState, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    let sweep = Sweep::from_state(&state)?;
    let period = Duration::from_secs(state.settings().reaper().interval_seconds);

    let mut tick = interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval_seconds = period.as_secs(), "Reaper scheduler started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tick.tick() => {
                let report = sweep.run().await;
                report.log();
                crate::core::metrics::log_snapshot();
            }
        }
    }

    tracing::info!("Reaper scheduler stopped");

    Ok(())
}
