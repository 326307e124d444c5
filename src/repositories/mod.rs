pub(crate) mod assignment_repos;
pub(crate) mod assignments;
pub(crate) mod autograde_results;
pub(crate) mod courses;
pub(crate) mod submission_builds;
pub(crate) mod submissions;
