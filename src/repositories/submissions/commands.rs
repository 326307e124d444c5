use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::types::REAPED_AFTER_TIMEOUT;

/// Marks every unprocessed submission last touched before `stale_before` as
/// processed in one statement. Concurrent callers serialize on the row locks
/// and re-check the predicate, so each row is reaped by at most one of them.
pub(crate) async fn reap_stale(
    pool: &PgPool,
    stale_before: PrimitiveDateTime,
    excluded_state: &str,
    reason: &str,
) -> Result<u64, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE submissions
         SET processed = TRUE,
             state = $1
         WHERE processed = FALSE
           AND state <> $2
           AND last_updated < $3",
    )
    .bind(reason)
    .bind(excluded_state)
    .bind(stale_before)
    .execute(pool)
    .await?;

    Ok(updated.rows_affected())
}

/// Points the submission at `build_id` only if it has no build yet and was not
/// reaped in the meantime.
pub(crate) async fn claim_build(
    executor: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    submission_id: &str,
    build_id: &str,
    state: &str,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE submissions
         SET build_id = $1,
             processed = FALSE,
             state = $2,
             last_updated = $3
         WHERE id = $4
           AND build_id IS NULL
           AND NOT (processed AND state = $5)",
    )
    .bind(build_id)
    .bind(state)
    .bind(now)
    .bind(submission_id)
    .bind(REAPED_AFTER_TIMEOUT)
    .execute(&mut **executor)
    .await?;

    Ok(updated.rows_affected() > 0)
}

pub(crate) async fn release_build(
    executor: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    submission_id: &str,
    build_id: &str,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE submissions
         SET build_id = NULL
         WHERE id = $1
           AND build_id = $2",
    )
    .bind(submission_id)
    .bind(build_id)
    .execute(&mut **executor)
    .await?;

    Ok(updated.rows_affected() > 0)
}
