use sqlx::PgPool;

use crate::db::models::Course;

const COURSE_COLUMNS: &str = "id, name, org_url";

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await
}
