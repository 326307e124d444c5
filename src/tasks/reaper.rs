mod builds;
mod report;
mod repos;
mod scores;
mod stale;
mod store;
mod sweep;
mod window;

use time::Duration;

use crate::core::config::Settings;
use crate::core::time::{days, minutes};

pub(crate) use sweep::Sweep;

#[cfg(test)]
pub(crate) use store::ReaperStore;
#[cfg(test)]
pub(crate) use sweep::Collaborators;
#[cfg(test)]
pub(crate) use window::ReconciliationWindow;

#[derive(Debug, Clone)]
pub(crate) struct ReaperConfig {
    pub(crate) timeout_threshold: Duration,
    pub(crate) stats_reap_duration: Duration,
    pub(crate) excluded_state: String,
    pub(crate) org_host: String,
}

impl ReaperConfig {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        let reaper = settings.reaper();
        Self {
            timeout_threshold: minutes(reaper.timeout_minutes),
            stats_reap_duration: days(reaper.stats_reap_days),
            excluded_state: reaper.excluded_state.clone(),
            org_host: settings.github().host.clone(),
        }
    }
}
