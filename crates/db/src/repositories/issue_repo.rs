//! Repository for the `issues` table.

use civic_core::contract::{NewIssue, UpdateIssue};
use civic_core::types::DbId;
use sqlx::PgPool;

use crate::models::issue::IssueRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, category, image, location, status, user_id, created_at";

/// Newest first; `id` breaks ties between rows created in the same instant.
const ORDER: &str = "ORDER BY created_at DESC, id DESC";

/// Provides CRUD operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// Insert a new issue, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewIssue) -> Result<IssueRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO issues (title, description, category, image, location, status, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category.as_str())
            .bind(&input.image)
            .bind(&input.location)
            .bind(input.status.as_str())
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find an issue by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<IssueRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues WHERE id = $1");
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every issue, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<IssueRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues {ORDER}");
        sqlx::query_as::<_, IssueRow>(&query).fetch_all(pool).await
    }

    /// List the issues filed by one user, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<IssueRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues WHERE user_id = $1 {ORDER}");
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update an issue. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIssue,
    ) -> Result<Option<IssueRow>, sqlx::Error> {
        let query = format!(
            "UPDATE issues SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                image = COALESCE($5, image),
                location = COALESCE($6, location),
                status = COALESCE($7, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category.map(|c| c.as_str()))
            .bind(&input.image)
            .bind(&input.location)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an issue. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count issues per stored status text.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM issues GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }
}
