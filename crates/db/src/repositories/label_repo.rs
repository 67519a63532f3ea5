//! Repository for the `labels` table.

use annolab_core::label::{DEFAULT_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR};
use annolab_core::types::DbId;
use sqlx::PgPool;

use crate::models::label::{CreateLabel, Label};

/// Column list for labels queries.
const COLUMNS: &str = "id, project_id, text, prefix_key, suffix_key, \
    background_color, text_color, created_at, updated_at";

/// Provides CRUD operations for labels.
pub struct LabelRepo;

impl LabelRepo {
    /// Insert a new label, returning the created row. Omitted colors
    /// fall back to the platform defaults.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateLabel,
    ) -> Result<Label, sqlx::Error> {
        let query = format!(
            "INSERT INTO labels
                (project_id, text, prefix_key, suffix_key, background_color, text_color)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6), COALESCE($7, $8))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Label>(&query)
            .bind(project_id)
            .bind(&input.text)
            .bind(&input.prefix_key)
            .bind(&input.suffix_key)
            .bind(&input.background_color)
            .bind(DEFAULT_BACKGROUND_COLOR)
            .bind(&input.text_color)
            .bind(DEFAULT_TEXT_COLOR)
            .fetch_one(pool)
            .await
    }

    /// Find a label by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Label>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM labels WHERE id = $1");
        sqlx::query_as::<_, Label>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all labels of a project, oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Label>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM labels
             WHERE project_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Label>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Check whether another label in the project already uses this
    /// shortcut key combination.
    pub async fn shortcut_exists(
        pool: &PgPool,
        project_id: DbId,
        prefix_key: Option<&str>,
        suffix_key: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM labels
                WHERE project_id = $1
                  AND prefix_key IS NOT DISTINCT FROM $2
                  AND suffix_key IS NOT DISTINCT FROM $3
             )",
        )
        .bind(project_id)
        .bind(prefix_key)
        .bind(suffix_key)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Delete a label by ID, cascading to span annotations that use it.
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
