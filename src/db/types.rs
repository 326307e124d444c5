//! Submission `state` is a free-form label; these are the values the reaper
//! reads or writes.

pub(crate) const REGRADING_STATE: &str = "regrading";
pub(crate) const REAPED_AFTER_TIMEOUT: &str = "Reaped after timeout";
pub(crate) const WAITING_FOR_RESOURCES: &str = "Waiting for resources...";
