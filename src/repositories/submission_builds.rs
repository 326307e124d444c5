use time::PrimitiveDateTime;

pub(crate) async fn insert(
    executor: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: &str,
    submission_id: &str,
    created_at: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO submission_builds (id, submission_id, created_at)
         VALUES ($1, $2, $3)",
    )
    .bind(id)
    .bind(submission_id)
    .bind(created_at)
    .execute(&mut **executor)
    .await?;

    Ok(())
}

pub(crate) async fn delete(
    executor: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM submission_builds WHERE id = $1")
        .bind(id)
        .execute(&mut **executor)
        .await?;

    Ok(())
}

/// Replaces the submission's test results with one pending row per test.
pub(crate) async fn reset_test_results(
    executor: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    submission_id: &str,
    test_ids: &[String],
    created_at: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM submission_test_results WHERE submission_id = $1")
        .bind(submission_id)
        .execute(&mut **executor)
        .await?;

    for test_id in test_ids {
        sqlx::query(
            "INSERT INTO submission_test_results (
                id, submission_id, assignment_test_id, passed, message, created_at
             ) VALUES ($1, $2, $3, NULL, NULL, $4)",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(submission_id)
        .bind(test_id)
        .bind(created_at)
        .execute(&mut **executor)
        .await?;
    }

    Ok(())
}
