use sqlx::PgPool;

use crate::db::models::Submission;
use crate::db::types::REAPED_AFTER_TIMEOUT;

use super::types::COLUMNS;

/// Submissions still waiting for a build. Reaped submissions are terminal and
/// never come back here.
pub(crate) async fn list_unbuilt_by_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS}
         FROM submissions
         WHERE assignment_id = $1
           AND build_id IS NULL
           AND NOT (processed AND state = $2)
         ORDER BY created_at"
    ))
    .bind(assignment_id)
    .bind(REAPED_AFTER_TIMEOUT)
    .fetch_all(pool)
    .await
}
