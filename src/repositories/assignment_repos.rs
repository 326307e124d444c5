use sqlx::PgPool;
use time::PrimitiveDateTime;

/// Organization names compare case-insensitively.
pub(crate) async fn list_names_by_org(
    pool: &PgPool,
    org_name: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT repo_name
         FROM assignment_repos
         WHERE lower(org_name) = lower($1)",
    )
    .bind(org_name)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateAssignmentRepo<'a> {
    pub(crate) id: &'a str,
    pub(crate) org_name: &'a str,
    /// `https://<host>/<org>` of the course the repo must belong to.
    pub(crate) org_url: &'a str,
    pub(crate) repo_name: &'a str,
    pub(crate) repo_url: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
}

/// Inserts the record for a hosted repo named `<unique_code>-<github_username>`,
/// attributing it to the matching assignment of the course that owns the org and
/// to the matching user. Returns `false` when the name matches no assignment/user
/// pair in that course or the record already exists.
pub(crate) async fn create_for_repo_name(
    pool: &PgPool,
    params: CreateAssignmentRepo<'_>,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query(
        "INSERT INTO assignment_repos (
            id, owner_id, assignment_id, org_name, repo_name, repo_url, created_at
         )
         SELECT $1, u.id, a.id, $2, $3, $4, $5
         FROM assignments a
         JOIN courses c ON c.id = a.course_id
                       AND lower(rtrim(btrim(c.org_url), '/')) = lower($6)
         JOIN users u ON u.github_username IS NOT NULL
                     AND $3 = a.unique_code || '-' || u.github_username
         ORDER BY length(a.unique_code) DESC
         LIMIT 1
         ON CONFLICT (org_name, repo_name) DO NOTHING",
    )
    .bind(params.id)
    .bind(params.org_name)
    .bind(params.repo_name)
    .bind(params.repo_url)
    .bind(params.created_at)
    .bind(params.org_url)
    .execute(pool)
    .await?;

    Ok(inserted.rows_affected() > 0)
}
