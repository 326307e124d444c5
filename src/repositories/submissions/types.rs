pub(crate) const COLUMNS: &str = "\
    id, owner_id, assignment_id, assignment_repo_id, commit_sha, processed, state, build_id, \
    last_updated, created_at";
