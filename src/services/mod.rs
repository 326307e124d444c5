pub(crate) mod autograde;
pub(crate) mod github;
pub(crate) mod job_queue;
pub(crate) mod repo_repair;
pub(crate) mod submission_builds;
