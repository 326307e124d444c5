use sqlx::PgPool;
use time::PrimitiveDateTime;

/// Recomputes each student's best processed submission for the assignment.
/// Re-running with unchanged test results rewrites identical rows.
pub(crate) async fn refresh_for_assignment(
    pool: &PgPool,
    assignment_id: &str,
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let updated = sqlx::query(
        "WITH stats AS (
            SELECT s.id AS submission_id,
                   s.owner_id,
                   s.created_at,
                   (COUNT(r.id) FILTER (WHERE r.passed IS TRUE))::INT AS tests_passed,
                   COUNT(r.id)::INT AS tests_total
            FROM submissions s
            LEFT JOIN submission_test_results r ON r.submission_id = s.id
            WHERE s.assignment_id = $1
              AND s.owner_id IS NOT NULL
              AND s.processed = TRUE
            GROUP BY s.id, s.owner_id, s.created_at
        ),
        best AS (
            SELECT DISTINCT ON (owner_id) owner_id, submission_id, tests_passed, tests_total
            FROM stats
            ORDER BY owner_id, tests_passed DESC, created_at DESC
        )
        INSERT INTO autograde_results (
            assignment_id, owner_id, submission_id, tests_passed, tests_total, updated_at
        )
        SELECT $1, owner_id, submission_id, tests_passed, tests_total, $2
        FROM best
        ON CONFLICT (assignment_id, owner_id) DO UPDATE
        SET submission_id = EXCLUDED.submission_id,
            tests_passed = EXCLUDED.tests_passed,
            tests_total = EXCLUDED.tests_total,
            updated_at = EXCLUDED.updated_at",
    )
    .bind(assignment_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(updated.rows_affected())
}
