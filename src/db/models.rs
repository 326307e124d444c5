use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::REAPED_AFTER_TIMEOUT;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) org_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assignment {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) name: String,
    pub(crate) unique_code: String,
    pub(crate) release_date: PrimitiveDateTime,
    pub(crate) due_date: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: String,
    pub(crate) owner_id: Option<String>,
    pub(crate) assignment_id: String,
    pub(crate) assignment_repo_id: Option<String>,
    pub(crate) commit_sha: String,
    pub(crate) processed: bool,
    pub(crate) state: String,
    pub(crate) build_id: Option<String>,
    pub(crate) last_updated: PrimitiveDateTime,
    pub(crate) created_at: PrimitiveDateTime,
}

impl Submission {
    /// Reaped submissions are terminal; nothing in the sweep touches them again.
    pub(crate) fn is_reaped(&self) -> bool {
        self.processed && self.state == REAPED_AFTER_TIMEOUT
    }
}
