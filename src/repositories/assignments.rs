use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Assignment;

const COLUMNS: &str = "id, course_id, name, unique_code, release_date, due_date";

/// Assignments already released whose due date falls after `due_after`.
pub(crate) async fn list_active(
    pool: &PgPool,
    now: PrimitiveDateTime,
    due_after: PrimitiveDateTime,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {COLUMNS}
         FROM assignments
         WHERE release_date <= $1
           AND due_date > $2
         ORDER BY due_date, id"
    ))
    .bind(now)
    .bind(due_after)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_test_ids(
    executor: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    assignment_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id
         FROM assignment_tests
         WHERE assignment_id = $1
         ORDER BY name",
    )
    .bind(assignment_id)
    .fetch_all(&mut **executor)
    .await
}
