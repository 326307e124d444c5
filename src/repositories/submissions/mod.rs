mod commands;
mod queries;
mod types;

pub(crate) use commands::{claim_build, reap_stale, release_build};
pub(crate) use queries::list_unbuilt_by_assignment;

#[cfg(test)]
pub(crate) use types::COLUMNS;
